use crate::audio::{
    capture::CaptureFormat,
    wav::{downmix, encode_wav},
};

const SAMPLE_RATE: u32 = 16_000;

/// WHAT: Stereo frames average down to mono
/// WHY: Low quality recordings are mono to keep alerts small
#[test]
fn given_stereo_samples_when_downmixing_then_frames_averaged() {
    // Given: Two stereo frames
    let stereo = [0.5f32, -0.5, 1.0, 0.0];

    // When: Downmixing to mono
    let mono = downmix(&stereo, 2);

    // Then: One sample per frame, channel average
    assert_eq!(mono.len(), 2);
    assert!(mono[0].abs() < f32::EPSILON);
    assert!((mono[1] - 0.5).abs() < f32::EPSILON);
}

/// WHAT: Mono input passes through downmix unchanged
/// WHY: No work or precision loss for single-channel devices
#[test]
fn given_mono_samples_when_downmixing_then_unchanged() {
    let mono = [0.1f32, 0.2, 0.3];
    assert_eq!(downmix(&mono, 1), mono.to_vec());
}

/// WHAT: Encoded artifact is a readable 16-bit WAV file
/// WHY: The dispatcher forwards it as audio/wav to contacts
#[test]
#[allow(clippy::unwrap_used)]
fn given_samples_when_encoding_then_valid_wav_with_matching_spec() {
    // Given: One second of silence plus a clipped peak
    let mut samples = vec![0.0f32; SAMPLE_RATE as usize];
    samples.push(2.0);
    let format = CaptureFormat {
        sample_rate: SAMPLE_RATE,
        channels: 1,
    };

    // When: Encoding to WAV
    let bytes = encode_wav(&samples, format).unwrap();

    // Then: hound reads back the same spec, length, and clamped peak
    assert_eq!(&bytes[0..4], b"RIFF");
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.len(), samples.len());
    assert_eq!(decoded.last().copied(), Some(i16::MAX));
}
