mod audio;
mod sos;
