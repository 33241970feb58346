//! 16-bit PCM WAV output.
//!
//! Samples are clamped to `[-1, 1]` and scaled by `i16::MAX`. Files carry no
//! metadata chunks, so identical buffers always produce identical bytes.

use std::io::Cursor;
use std::path::Path;

use crate::error::{AudioError, AudioResult};
use crate::mixer::StereoOutput;
use crate::synth::validate_sample_rate;

/// Result of encoding a WAV file.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the sample data, for comparing renders.
    pub pcm_hash: String,
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames (samples per channel).
    pub num_frames: usize,
}

/// Converts a float sample to 16-bit PCM.
#[inline]
pub fn to_pcm16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16
}

fn encode(samples: &[f64], channels: u16, sample_rate: u32) -> AudioResult<WavResult> {
    validate_sample_rate(sample_rate)?;
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut pcm = Vec::with_capacity(samples.len() * 2);
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            let v = to_pcm16(s);
            pcm.extend_from_slice(&v.to_le_bytes());
            writer.write_sample(v)?;
        }
        writer.finalize()?;
    }

    Ok(WavResult {
        wav_data: cursor.into_inner(),
        pcm_hash: blake3::hash(&pcm).to_hex().to_string(),
        channels,
        sample_rate,
        num_frames: samples.len() / usize::from(channels),
    })
}

/// Encodes a mono buffer.
pub fn encode_mono(samples: &[f64], sample_rate: u32) -> AudioResult<WavResult> {
    encode(samples, 1, sample_rate)
}

/// Encodes a stereo bus as interleaved frames.
pub fn encode_stereo(stereo: &StereoOutput, sample_rate: u32) -> AudioResult<WavResult> {
    if stereo.left.len() != stereo.right.len() {
        return Err(AudioError::invalid_param(
            "stereo",
            format!(
                "channel lengths differ ({} vs {})",
                stereo.left.len(),
                stereo.right.len()
            ),
        ));
    }
    encode(&stereo.interleaved(), 2, sample_rate)
}

/// Writes a mono WAV file.
pub fn write_mono(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32) -> AudioResult<WavResult> {
    let result = encode_mono(samples, sample_rate)?;
    std::fs::write(path.as_ref(), &result.wav_data)?;
    Ok(result)
}

/// Writes a stereo WAV file.
pub fn write_stereo(
    path: impl AsRef<Path>,
    stereo: &StereoOutput,
    sample_rate: u32,
) -> AudioResult<WavResult> {
    let result = encode_stereo(stereo, sample_rate)?;
    std::fs::write(path.as_ref(), &result.wav_data)?;
    Ok(result)
}
