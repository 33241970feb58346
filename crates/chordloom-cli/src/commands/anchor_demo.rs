//! Anchor demo command implementation
//!
//! Writes one sustained root note per bar so a progression can be auditioned.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chordloom_backend_music::midi::{write_parts_to_file, MidiTrackOptions};
use chordloom_backend_music::song::anchor_demo_part;
use chordloom_backend_music::theory::parse_anchor;
use chordloom_spec::{PartSet, Tempo};
use colored::Colorize;

use super::json_output::{print_json, AnchorDemoOutput, JsonError, WrittenFile};
use crate::controls::split_anchor;

/// Part name used in the demo file.
pub const DEMO_PART: &str = "anchor_demo";

/// Run the anchor-demo command
///
/// # Arguments
/// * `anchor` - Progression string (e.g. "Am-G-C-F")
/// * `bpm` - Tempo
/// * `out` - Output MIDI path
/// * `octave` - Octave of the root notes (3 places C at 48)
/// * `json_output` - Whether to print JSON
pub fn run(anchor: &str, bpm: f64, out: &Path, octave: i32, json_output: bool) -> Result<ExitCode> {
    let result = write_demo(anchor, bpm, out, octave);

    if json_output {
        let output = match &result {
            Ok(bars) => AnchorDemoOutput {
                success: true,
                errors: Vec::new(),
                bars: *bars,
                file: Some(WrittenFile {
                    kind: "midi".to_string(),
                    part: Some(DEMO_PART.to_string()),
                    path: out.display().to_string(),
                }),
            },
            Err(e) => AnchorDemoOutput {
                success: false,
                errors: vec![JsonError::from_anyhow(e)],
                bars: 0,
                file: None,
            },
        };
        print_json(&output)?;
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let bars = result?;
    println!(
        "{} {} ({} bars at {} bpm)",
        "Wrote".green().bold(),
        out.display(),
        bars,
        bpm
    );
    Ok(ExitCode::SUCCESS)
}

/// Writes the demo file and returns the number of bars.
pub fn write_demo(anchor: &str, bpm: f64, out: &Path, octave: i32) -> Result<usize> {
    let tempo = Tempo::new(bpm)?;
    let chords = parse_anchor(&split_anchor(anchor))?;
    let parts = PartSet::new().with_part(DEMO_PART, anchor_demo_part(&chords, octave));

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    write_parts_to_file(&parts, tempo, &MidiTrackOptions::plain(), out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), bars = chords.len(), "wrote anchor demo");
    Ok(chords.len())
}
