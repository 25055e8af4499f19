use crate::{CoreResult, SosError};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::JoinHandle,
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Maximum samples to buffer (5 minutes at 48kHz mono).
///
/// An SOS capture window is seconds long; this only bounds memory if a
/// recording is never stopped.
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Sample layout of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CaptureFormat {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Interleaved f32 samples from a finished capture.
#[derive(Debug)]
pub(crate) struct CapturedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) format: CaptureFormat,
}

/// Append to the ring buffer, dropping the oldest samples past the cap.
pub(crate) fn push_bounded(buf: &mut VecDeque<f32>, data: &[f32]) {
    buf.extend(data.iter().copied());
    while buf.len() > MAX_BUFFER_SAMPLES {
        buf.pop_front();
    }
}

/// Whether the host has a default input device.
pub(crate) fn input_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Capture running on its own thread.
///
/// cpal streams are not `Send` on every backend, so the stream is built,
/// played and dropped on a dedicated thread. This handle only holds the
/// shared buffer and the stop channel, and can move between tasks.
pub(crate) struct CaptureThread {
    samples: Arc<Mutex<VecDeque<f32>>>,
    shutdown: Arc<AtomicBool>,
    stop_tx: mpsc::Sender<()>,
    worker: JoinHandle<()>,
    format: CaptureFormat,
}

impl CaptureThread {
    /// Open the default input device and start capturing. Blocks until the
    /// stream is playing or has failed.
    #[track_caller]
    #[instrument]
    pub(crate) fn spawn() -> CoreResult<Self> {
        let samples = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES)));
        let shutdown = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<CoreResult<CaptureFormat>>();

        let thread_samples = Arc::clone(&samples);
        let thread_shutdown = Arc::clone(&shutdown);

        let worker = std::thread::Builder::new()
            .name("sos-audio-capture".to_string())
            .spawn(move || {
                let stream = match build_stream(&thread_samples, &thread_shutdown) {
                    Ok((stream, format)) => {
                        let _ = ready_tx.send(Ok(format));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Returns on stop() or when the handle is dropped.
                let _ = stop_rx.recv();

                thread_shutdown.store(true, Ordering::Release);
                drop(stream);
                debug!("Capture stream dropped");
            })
            .map_err(|e| SosError::RecordingStartFailed {
                reason: format!("Failed to spawn capture thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let format = ready_rx
            .recv()
            .map_err(|e| SosError::RecordingStartFailed {
                reason: format!("Capture thread exited before starting: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        info!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Audio capture started"
        );

        Ok(Self {
            samples,
            shutdown,
            stop_tx,
            worker,
            format,
        })
    }

    /// Stop the stream, join the thread and drain the buffer.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn stop(self) -> CoreResult<CapturedAudio> {
        // Callback must stop writing before the buffer is drained, even if a
        // backend fires once more while the stream is being dropped.
        self.shutdown.store(true, Ordering::Release);
        let _ = self.stop_tx.send(());

        self.worker
            .join()
            .map_err(|_| SosError::RecordingStopFailed {
                reason: "Capture thread panicked".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| SosError::RecordingStopFailed {
                reason: format!("Failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .drain(..)
            .collect();

        info!(sample_count = samples.len(), "Audio capture stopped");

        Ok(CapturedAudio {
            samples,
            format: self.format,
        })
    }
}

#[track_caller]
fn build_stream(
    samples: &Arc<Mutex<VecDeque<f32>>>,
    shutdown: &Arc<AtomicBool>,
) -> CoreResult<(Stream, CaptureFormat)> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or(SosError::RecordingStartFailed {
            reason: "No microphone found".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let supported = device
        .default_input_config()
        .map_err(|e| SosError::DeviceError {
            reason: format!("Failed to get config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let format = CaptureFormat {
        sample_rate: supported.sample_rate(),
        channels: supported.channels(),
    };
    let config: cpal::StreamConfig = supported.into();

    debug!(device_id = ?device.id(), "Opening input device");

    let samples = Arc::clone(samples);
    let shutdown = Arc::clone(shutdown);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if shutdown.load(Ordering::Acquire) {
                    return;
                }
                // A poisoned lock still holds valid samples.
                let mut buf = samples.lock().unwrap_or_else(|e| {
                    error!("Sample buffer lock poisoned, recovering: {}", e);
                    e.into_inner()
                });
                push_bounded(&mut buf, data);
            },
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| SosError::RecordingStartFailed {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    stream.play().map_err(|e| SosError::RecordingStartFailed {
        reason: format!("Failed to start stream: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok((stream, format))
}
