//! Generation settings: the merged config and command-line values, validated
//! into typed controls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chordloom_backend_music::theory::parse_anchor;
use chordloom_spec::{ChordSymbol, GridResolution, Key, Mode, RenderOptions, Tempo};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::config::deep_merge;
use crate::controls::{
    canonical_key, canonical_mode, parse_duration, parse_markers, split_anchor, Marker,
};

/// An anchor written as one string or as a list of symbols.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnchorValue {
    /// `"Am-G-C-F"`.
    Text(String),
    /// `[Am, G, C, F]`.
    List(Vec<String>),
}

impl AnchorValue {
    /// The individual chord symbols.
    pub fn symbols(&self) -> Vec<String> {
        match self {
            AnchorValue::Text(text) => split_anchor(text),
            AnchorValue::List(items) => items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// A length written as a number of seconds or as a duration string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    /// `60`.
    Seconds(u32),
    /// `"1:30"`, `"90s"`, `"1m30s"`.
    Text(String),
}

/// Raw settings after merging; every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Key name.
    pub key: Option<String>,
    /// Mode name.
    pub mode: Option<String>,
    /// Tempo in beats per minute.
    pub bpm: Option<f64>,
    /// Anchor progression.
    pub anchor: Option<AnchorValue>,
    /// Reference MIDI file for groove extraction.
    pub groove: Option<PathBuf>,
    /// Groove grid.
    pub quantize: String,
    /// Humanization limit in milliseconds.
    pub humanize: f64,
    /// Song length.
    pub length: Option<LengthValue>,
    /// `time:label` markers.
    pub marker: Vec<String>,
    /// Generate drums.
    pub drums: bool,
    /// Repeat the opening motif in choruses.
    pub motif: bool,
    /// Apply section dynamics and fills.
    pub arrange: bool,
    /// Smooth the bass line.
    pub voicelead: bool,
    /// Write a multitrack MIDI file.
    pub midi: bool,
    /// Write the stereo mix.
    pub wav: bool,
    /// Write one mono WAV per part.
    pub stems: bool,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Base name of output files.
    pub name: String,
    /// Synthesizer and mixer settings.
    pub render: RenderOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key: None,
            mode: None,
            bpm: None,
            anchor: None,
            groove: None,
            quantize: GridResolution::default().to_string(),
            humanize: chordloom_backend_music::groove::DEFAULT_MAX_MS,
            length: None,
            marker: Vec::new(),
            drums: true,
            motif: true,
            arrange: true,
            voicelead: true,
            midi: false,
            wav: false,
            stems: false,
            out_dir: PathBuf::from("outputs"),
            name: "song".to_string(),
            render: RenderOptions::default(),
        }
    }
}

impl Settings {
    /// Builds settings from a preset and command-line overrides.
    ///
    /// The `render` section is merged over the default render options, so a
    /// preset that sets only `per_part.melody.wave` keeps every other default.
    pub fn from_layers(config: &Mapping, overrides: &Mapping) -> Result<Self> {
        let mut merged = deep_merge(config, overrides);

        let default_render = match serde_yaml::to_value(RenderOptions::default())? {
            Value::Mapping(m) => m,
            _ => Mapping::new(),
        };
        let render = match merged.get("render") {
            Some(Value::Mapping(user)) => deep_merge(&default_render, user),
            _ => default_render,
        };
        merged.insert(Value::from("render"), Value::Mapping(render));

        serde_yaml::from_value(Value::Mapping(merged)).context("invalid settings")
    }

    /// Validates the settings into typed controls.
    pub fn validate(&self) -> Result<Controls> {
        let key_input = self
            .key
            .as_deref()
            .context("missing key (pass --key or set `key` in the config)")?;
        let (key_name, key) = canonical_key(key_input)?;

        let mode_input = self
            .mode
            .as_deref()
            .context("missing mode (pass --mode or set `mode` in the config)")?;
        let mode = canonical_mode(mode_input)?;

        let bpm = self
            .bpm
            .context("missing bpm (pass --bpm or set `bpm` in the config)")?;
        let tempo = Tempo::new(bpm)?;

        let anchor_symbols = self.anchor.as_ref().map(AnchorValue::symbols).unwrap_or_default();
        let anchor = parse_anchor(&anchor_symbols)?;

        let length_sec = match &self.length {
            Some(LengthValue::Seconds(s)) => *s,
            Some(LengthValue::Text(t)) => parse_duration(t)?,
            None => anyhow::bail!("missing length (pass --length or set `length` in the config)"),
        };

        let markers = parse_markers(&self.marker)?;
        let quantize: GridResolution = self.quantize.parse()?;

        if !self.humanize.is_finite() {
            anyhow::bail!("humanize must be a finite number of milliseconds");
        }

        Ok(Controls {
            key_name,
            key,
            mode,
            tempo,
            anchor_symbols,
            anchor,
            length_sec,
            markers,
            quantize,
            humanize_ms: self.humanize.abs(),
            groove: self.groove.clone(),
        })
    }
}

/// Validated musical controls.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    /// Canonical key spelling.
    pub key_name: String,
    /// Key.
    pub key: Key,
    /// Mode.
    pub mode: Mode,
    /// Tempo.
    pub tempo: Tempo,
    /// Anchor as written.
    pub anchor_symbols: Vec<String>,
    /// Parsed anchor.
    pub anchor: Vec<ChordSymbol>,
    /// Song length in seconds.
    pub length_sec: u32,
    /// Sorted markers.
    pub markers: Vec<Marker>,
    /// Groove grid.
    pub quantize: GridResolution,
    /// Humanization limit.
    pub humanize_ms: f64,
    /// Reference MIDI file.
    pub groove: Option<PathBuf>,
}

/// Controls as reported back to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ControlsReport {
    /// Canonical key.
    pub key: String,
    /// Mode name.
    pub mode: String,
    /// Tempo.
    pub bpm: f64,
    /// Anchor symbols.
    pub anchor: Vec<String>,
    /// Reference MIDI path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groove_midi: Option<String>,
    /// Groove grid.
    pub quantize: String,
    /// Humanization limit.
    pub humanize_ms: f64,
    /// Song length.
    pub length_sec: u32,
    /// Markers.
    pub markers: Vec<Marker>,
}

impl From<&Controls> for ControlsReport {
    fn from(c: &Controls) -> Self {
        Self {
            key: c.key_name.clone(),
            mode: c.mode.to_string(),
            bpm: c.tempo.bpm(),
            anchor: c.anchor_symbols.clone(),
            groove_midi: c.groove.as_ref().map(|p| p.display().to_string()),
            quantize: c.quantize.to_string(),
            humanize_ms: c.humanize_ms,
            length_sec: c.length_sec,
            markers: c.markers.clone(),
        }
    }
}
