//! Render parameters for the oscillator synthesizer and the stem mixer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::note::{BASS, DRUMS, MELODY};

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default base seed for noise oscillators.
pub const DEFAULT_NOISE_SEED: u32 = 42;

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Pure sine.
    Sine,
    /// Sign of a sine.
    Square,
    /// Symmetric triangle.
    Triangle,
    /// Rising sawtooth.
    #[default]
    Saw,
    /// Seeded uniform white noise.
    Noise,
}

impl Waveform {
    /// Lowercase name as used in config files.
    pub const fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Saw => "saw",
            Waveform::Noise => "noise",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            "saw" | "sawtooth" => Ok(Waveform::Saw),
            "noise" => Ok(Waveform::Noise),
            other => Err(format!("unknown waveform '{}'", other)),
        }
    }
}

/// ADSR amplitude envelope, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Envelope {
    /// Attack time.
    pub attack: f64,
    /// Decay time.
    pub decay: f64,
    /// Sustain level (0.0 to 1.0).
    pub sustain: f64,
    /// Release time.
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.05,
            sustain: 0.85,
            release: 0.05,
        }
    }
}

/// Fully resolved render settings for one part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartRender {
    /// Oscillator waveform.
    pub wave: Waveform,
    /// Linear gain applied before velocity scaling.
    pub gain: f64,
    /// Stereo position, 0.0 = left, 0.5 = center, 1.0 = right.
    pub pan: f64,
}

impl Default for PartRender {
    fn default() -> Self {
        Self {
            wave: Waveform::Saw,
            gain: 0.22,
            pan: 0.5,
        }
    }
}

/// Per-part overrides; unset fields fall back to [`RenderOptions::defaults`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartRenderOverrides {
    /// Waveform override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave: Option<Waveform>,
    /// Gain override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
    /// Pan override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<f64>,
}

impl PartRenderOverrides {
    /// Overrides with every field set.
    pub fn full(wave: Waveform, gain: f64, pan: f64) -> Self {
        Self {
            wave: Some(wave),
            gain: Some(gain),
            pan: Some(pan),
        }
    }

    /// Applies these overrides on top of `base`.
    pub fn apply(&self, base: PartRender) -> PartRender {
        PartRender {
            wave: self.wave.unwrap_or(base.wave),
            gain: self.gain.unwrap_or(base.gain),
            pan: self.pan.unwrap_or(base.pan),
        }
    }
}

/// Render configuration for the stem mixer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Settings for parts without overrides.
    pub defaults: PartRender,
    /// Overrides keyed by part name.
    pub per_part: BTreeMap<String, PartRenderOverrides>,
    /// Amplitude envelope shared by every note.
    pub envelope: Envelope,
    /// Base seed from which each part's noise seed is derived.
    pub noise_seed: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let mut per_part = BTreeMap::new();
        per_part.insert(
            MELODY.to_string(),
            PartRenderOverrides::full(Waveform::Triangle, 0.22, 0.65),
        );
        per_part.insert(
            BASS.to_string(),
            PartRenderOverrides::full(Waveform::Saw, 0.28, 0.35),
        );
        per_part.insert(
            DRUMS.to_string(),
            PartRenderOverrides::full(Waveform::Noise, 0.14, 0.5),
        );
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            defaults: PartRender::default(),
            per_part,
            envelope: Envelope::default(),
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }
}

impl RenderOptions {
    /// Resolved settings for a part: its overrides merged over the defaults.
    pub fn for_part(&self, name: &str) -> PartRender {
        self.per_part
            .get(name)
            .map(|o| o.apply(self.defaults))
            .unwrap_or(self.defaults)
    }
}
