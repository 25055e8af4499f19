mod capture;
mod recorder;
mod wav;
