//! Format validators for generated files.
//!
//! Each validator parses the bytes with a real decoder and reports the header
//! fields tests care about.

use std::io::Cursor;

use midly::{Smf, Timing};
use thiserror::Error;

/// A file failed format validation.
#[derive(Debug, Error)]
#[error("invalid {format}: {message}")]
pub struct FormatError {
    /// Format name ("WAV", "MIDI").
    pub format: &'static str,
    /// What was wrong.
    pub message: String,
}

impl FormatError {
    fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

/// Information extracted from a WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Samples per channel.
    pub num_frames: u32,
}

/// Validate a 16-bit PCM WAV file and read its header.
pub fn validate_wav(data: &[u8]) -> Result<WavInfo, FormatError> {
    let reader = hound::WavReader::new(Cursor::new(data))
        .map_err(|e| FormatError::new("WAV", e.to_string()))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(FormatError::new(
            "WAV",
            format!(
                "expected 16-bit integer PCM, got {:?} at {} bits",
                spec.sample_format, spec.bits_per_sample
            ),
        ));
    }
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames: reader.duration(),
    })
}

/// Information extracted from a Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiInfo {
    /// Number of tracks, tempo track included.
    pub tracks: usize,
    /// Ticks per quarter note.
    pub ticks_per_quarter: u16,
    /// Note-on events with non-zero velocity per track.
    pub note_ons: Vec<usize>,
    /// Track names, in order (empty for unnamed tracks).
    pub track_names: Vec<String>,
}

/// Validate a metrical Standard MIDI File and summarize its tracks.
pub fn validate_midi(data: &[u8]) -> Result<MidiInfo, FormatError> {
    let smf = Smf::parse(data).map_err(|e| FormatError::new("MIDI", e.to_string()))?;
    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(t) => t.as_int(),
        Timing::Timecode(..) => return Err(FormatError::new("MIDI", "timecode timing")),
    };

    let mut note_ons = Vec::with_capacity(smf.tracks.len());
    let mut track_names = Vec::with_capacity(smf.tracks.len());
    for track in &smf.tracks {
        let mut count = 0;
        let mut name = String::new();
        for event in track {
            match event.kind {
                midly::TrackEventKind::Midi {
                    message: midly::MidiMessage::NoteOn { vel, .. },
                    ..
                } if vel.as_int() > 0 => count += 1,
                midly::TrackEventKind::Meta(midly::MetaMessage::TrackName(bytes)) => {
                    name = String::from_utf8_lossy(bytes).into_owned();
                }
                _ => {}
            }
        }
        note_ons.push(count);
        track_names.push(name);
    }

    Ok(MidiInfo {
        tracks: smf.tracks.len(),
        ticks_per_quarter,
        note_ons,
        track_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage() {
        assert!(validate_wav(b"RIFF....").is_err());
        let err = validate_midi(b"not midi").unwrap_err();
        assert_eq!(err.format, "MIDI");
    }

    #[test]
    fn test_validate_wav() {
        let wav = chordloom_backend_audio::wav::encode_mono(&[0.0, 0.5, -0.5], 8000).unwrap();
        let info = validate_wav(&wav.wav_data).unwrap();
        assert_eq!(
            info,
            WavInfo {
                channels: 1,
                sample_rate: 8000,
                bits_per_sample: 16,
                num_frames: 3,
            }
        );
    }
}
