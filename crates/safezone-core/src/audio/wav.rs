use crate::{CoreResult, SosError, audio::capture::CaptureFormat};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;

pub(crate) const WAV_MIME_TYPE: &str = "audio/wav";

/// Average interleaved frames down to one channel.
pub(crate) fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = usize::from(channels.max(1));
    if channels == 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Encode interleaved f32 samples as an in-memory 16-bit PCM WAV file.
#[track_caller]
pub(crate) fn encode_wav(samples: &[f32], format: CaptureFormat) -> CoreResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());

    let mut writer =
        hound::WavWriter::new(&mut cursor, spec).map_err(|e| SosError::EncodingError {
            reason: format!("Failed to create WAV writer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    for &sample in samples {
        writer
            .write_sample(to_pcm16(sample))
            .map_err(|e| SosError::EncodingError {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    writer.finalize().map_err(|e| SosError::EncodingError {
        reason: format!("Failed to finalize WAV: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(cursor.into_inner())
}
