//! JSON output types for the `--json` flag.
//!
//! Every command prints exactly one JSON document to stdout in JSON mode, on
//! success and on failure alike.

use std::collections::BTreeMap;

use anyhow::Context;
use chordloom_backend_audio::{AudioError, MixStats};
use chordloom_backend_music::{Diagnostics, MusicError};
use chordloom_spec::{BackendError, Section, SpecError};
use serde::Serialize;

use crate::controls::{ControlError, Marker};
use crate::settings::ControlsReport;

/// Error codes for CLI-level failures.
///
/// Model and backend errors pass their own codes through.
pub mod error_codes {
    /// Config file missing, unreadable or malformed
    pub const CONFIG: &str = "CLI_001";
    /// Bad control value (key, length, marker)
    pub const CONTROL: &str = "CLI_002";
    /// Output could not be written
    pub const OUTPUT: &str = "CLI_003";
    /// Anything else
    pub const GENERAL: &str = "CLI_010";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g. "CLI_002", "SPEC_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Maps an error chain to a code by looking for a known error type.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{:#}", err);
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<SpecError>() {
                return Self::new(e.code(), message);
            }
            if let Some(e) = cause.downcast_ref::<MusicError>() {
                return Self::new(e.code(), message);
            }
            if let Some(e) = cause.downcast_ref::<AudioError>() {
                return Self::new(e.code(), message);
            }
            if let Some(e) = cause.downcast_ref::<ControlError>() {
                let code = match e {
                    ControlError::Spec(spec) => spec.code(),
                    _ => error_codes::CONTROL,
                };
                return Self::new(code, message);
            }
            if cause.downcast_ref::<serde_yaml::Error>().is_some() {
                return Self::new(error_codes::CONFIG, message);
            }
            if cause.downcast_ref::<std::io::Error>().is_some() {
                return Self::new(error_codes::OUTPUT, message);
            }
        }
        Self::new(error_codes::GENERAL, message)
    }
}

/// A file written by a command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WrittenFile {
    /// What the file holds ("midi", "mix", "stem").
    pub kind: String,
    /// Part name for stems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    /// Path as written.
    pub path: String,
}

/// JSON output for the `plan` command.
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    /// Whether planning succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Song length in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_sec: Option<u32>,
    /// Proposed sections
    pub sections: Vec<Section>,
    /// Sorted markers
    pub markers: Vec<Marker>,
}

/// Result payload of a successful `generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    /// Validated controls
    pub controls: ControlsReport,
    /// Planned sections
    pub sections: Vec<Section>,
    /// Bars generated
    pub total_bars: usize,
    /// Stages that ran, in order
    pub stages: Vec<&'static str>,
    /// Event count per part
    pub parts: BTreeMap<String, usize>,
    /// Pitch-search fallbacks
    pub diagnostics: Diagnostics,
    /// Files written
    pub files: Vec<WrittenFile>,
    /// Mixdown statistics, when audio was rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix: Option<MixStats>,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
}

impl GenerateOutput {
    /// Creates a successful output.
    pub fn success(result: GenerateResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

/// JSON output for the `anchor-demo` command.
#[derive(Debug, Clone, Serialize)]
pub struct AnchorDemoOutput {
    /// Whether the file was written
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Number of bars (one note each)
    pub bars: usize,
    /// Output file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<WrittenFile>,
}

/// Prints a JSON document to stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}
