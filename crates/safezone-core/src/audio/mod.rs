pub(crate) mod capture;
mod recorder;
pub(crate) mod wav;

pub use recorder::MicrophoneRecorder;
