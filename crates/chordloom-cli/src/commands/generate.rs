//! Generate command implementation
//!
//! Runs the full pipeline and writes the requested MIDI and audio files.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chordloom_backend_audio::{mix_parts, wav, MixStats};
use chordloom_backend_music::groove::extract_groove_template;
use chordloom_backend_music::melody::GeneratorOptions;
use chordloom_backend_music::midi::{read_reference, write_parts_to_file, MidiTrackOptions};
use chordloom_backend_music::motif::MotifOptions;
use chordloom_backend_music::pipeline::{compose, ComposeRequest, GrooveStage};
use chordloom_backend_music::song::SongRequest;
use chordloom_backend_music::voicelead::VoiceLeadingOptions;
use chordloom_spec::{GridResolution, PartSet, Tempo};
use clap::Args;
use colored::Colorize;
use serde_yaml::{Mapping, Value};

use super::json_output::{print_json, GenerateOutput, GenerateResult, JsonError, WrittenFile};
use super::plan::print_sections;
use crate::config::load_config;
use crate::planner::propose_sections;
use crate::settings::{ControlsReport, Settings};

/// Options for `chordloom generate`.
///
/// Every value may also come from a YAML preset; values given here win.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Musical key (e.g. C, D#, F#, Bb)
    #[arg(long)]
    pub key: Option<String>,

    /// Mode (major/minor or dorian, lydian, ...)
    #[arg(long)]
    pub mode: Option<String>,

    /// Tempo in beats per minute
    #[arg(long)]
    pub bpm: Option<f64>,

    /// Chord progression, one chord per bar (e.g. "Am-G-C-F")
    #[arg(long)]
    pub anchor: Option<String>,

    /// Total length (e.g. 60, 60s, 1m30s, 1:30)
    #[arg(long)]
    pub length: Option<String>,

    /// Reference MIDI file for groove extraction
    #[arg(long)]
    pub groove: Option<PathBuf>,

    /// Groove grid (1/4, 1/8, 1/12, 1/16, 1/24, 1/32)
    #[arg(long)]
    pub quantize: Option<String>,

    /// Humanization limit in milliseconds
    #[arg(long)]
    pub humanize: Option<f64>,

    /// Repeatable "time:label" marker (e.g. 30:motif or 00:45:filter_sweep)
    #[arg(long)]
    pub marker: Vec<String>,

    /// YAML preset (defaults to $CHORDLOOM_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Base name for output files
    #[arg(long)]
    pub name: Option<String>,

    /// Skip the drums part
    #[arg(long)]
    pub no_drums: bool,

    /// Skip bass voice leading
    #[arg(long)]
    pub no_voicelead: bool,

    /// Skip motif repetition
    #[arg(long)]
    pub no_motif: bool,

    /// Skip section dynamics and fills
    #[arg(long)]
    pub no_arrange: bool,

    /// Also move strong-beat melody notes onto chord tones
    #[arg(long)]
    pub adjust_melody: bool,

    /// Write a multitrack MIDI file
    #[arg(long)]
    pub midi: bool,

    /// Write the stereo mix as WAV
    #[arg(long)]
    pub wav: bool,

    /// Write one mono WAV per part
    #[arg(long)]
    pub stems: bool,

    /// Output machine-readable JSON (no colored output)
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// The values given on the command line, as a mapping to merge over a preset.
    pub fn overrides(&self) -> Mapping {
        let mut map = Mapping::new();
        let mut set = |key: &str, value: Value| {
            map.insert(Value::from(key), value);
        };
        let path = |p: &Path| Value::from(p.to_string_lossy().into_owned());

        if let Some(v) = &self.key {
            set("key", Value::from(v.as_str()));
        }
        if let Some(v) = &self.mode {
            set("mode", Value::from(v.as_str()));
        }
        if let Some(v) = self.bpm {
            set("bpm", Value::from(v));
        }
        if let Some(v) = &self.anchor {
            set("anchor", Value::from(v.as_str()));
        }
        if let Some(v) = &self.length {
            set("length", Value::from(v.as_str()));
        }
        if let Some(v) = &self.groove {
            set("groove", path(v));
        }
        if let Some(v) = &self.quantize {
            set("quantize", Value::from(v.as_str()));
        }
        if let Some(v) = self.humanize {
            set("humanize", Value::from(v));
        }
        if !self.marker.is_empty() {
            let markers = self.marker.iter().map(|m| Value::from(m.as_str())).collect();
            set("marker", Value::Sequence(markers));
        }
        if let Some(v) = &self.out_dir {
            set("out_dir", path(v));
        }
        if let Some(v) = &self.name {
            set("name", Value::from(v.as_str()));
        }
        for (flag, key) in [
            (self.no_drums, "drums"),
            (self.no_voicelead, "voicelead"),
            (self.no_motif, "motif"),
            (self.no_arrange, "arrange"),
        ] {
            if flag {
                set(key, Value::from(false));
            }
        }
        for (flag, key) in [(self.midi, "midi"), (self.wav, "wav"), (self.stems, "stems")] {
            if flag {
                set(key, Value::from(true));
            }
        }
        map
    }
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 success, 1 failure (JSON mode reports the error on stdout)
pub fn run(args: &GenerateArgs) -> Result<ExitCode> {
    if args.json {
        run_json(args)
    } else {
        run_human(args)
    }
}

fn run_json(args: &GenerateArgs) -> Result<ExitCode> {
    match execute(args) {
        Ok(result) => {
            print_json(&GenerateOutput::success(result))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&GenerateOutput::failure(vec![JsonError::from_anyhow(&e)]))?;
            Ok(ExitCode::from(1))
        }
    }
}

fn run_human(args: &GenerateArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let result = execute(args)?;
    print_summary(&result, start.elapsed());
    Ok(ExitCode::SUCCESS)
}

/// Resolves settings, runs the pipeline and writes outputs.
pub fn execute(args: &GenerateArgs) -> Result<GenerateResult> {
    let config = load_config(args.config.as_deref())?;
    let settings = Settings::from_layers(&config, &args.overrides())?;
    let controls = settings.validate()?;
    let sections = propose_sections(controls.length_sec);

    let groove = match &controls.groove {
        Some(path) => Some(load_groove(path, controls.quantize, controls.humanize_ms)?),
        None => None,
    };

    let request = ComposeRequest {
        song: SongRequest {
            anchor: controls.anchor.clone(),
            key: controls.key,
            mode: controls.mode,
            tempo: controls.tempo,
            length_sec: f64::from(controls.length_sec),
            drums: settings.drums,
            generator: GeneratorOptions::default(),
        },
        sections: sections.clone(),
        voice_leading: settings.voicelead.then(|| VoiceLeadingOptions {
            adjust_melody: args.adjust_melody,
            ..Default::default()
        }),
        motif: settings.motif.then(MotifOptions::default),
        arrange: settings.arrange,
        groove,
    };
    let composition = compose(&request).context("generation failed")?;
    if !composition.diagnostics.is_clean() {
        tracing::warn!(
            range_exhaustions = composition.diagnostics.range_exhaustions,
            "some notes fell outside their register and were clamped"
        );
    }

    let (files, mix) = write_outputs(&composition.parts, controls.tempo, &settings)?;

    Ok(GenerateResult {
        controls: ControlsReport::from(&controls),
        sections,
        total_bars: composition.total_bars,
        stages: composition.stages,
        parts: composition
            .parts
            .iter()
            .map(|(name, events)| (name.to_string(), events.len()))
            .collect::<BTreeMap<_, _>>(),
        diagnostics: composition.diagnostics,
        files,
        mix,
    })
}

/// Reads a reference MIDI file and extracts its groove.
fn load_groove(path: &Path, grid: GridResolution, max_ms: f64) -> Result<GrooveStage> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read groove MIDI {}", path.display()))?;
    let reference = read_reference(&bytes)
        .with_context(|| format!("failed to parse groove MIDI {}", path.display()))?;
    let template = extract_groove_template(&reference, grid);
    tracing::info!(
        path = %path.display(),
        onsets = reference.onsets_sec.len(),
        grid = %grid,
        "extracted groove template"
    );
    Ok(GrooveStage { template, max_ms })
}

/// Writes the MIDI file, stems and mix requested by `settings`.
fn write_outputs(
    parts: &PartSet,
    tempo: Tempo,
    settings: &Settings,
) -> Result<(Vec<WrittenFile>, Option<MixStats>)> {
    let mut files = Vec::new();
    if !(settings.midi || settings.wav || settings.stems) {
        return Ok((files, None));
    }

    let out_dir = &settings.out_dir;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let base = &settings.name;

    if settings.midi {
        let path = out_dir.join(format!("{}.parts.mid", base));
        write_parts_to_file(parts, tempo, &MidiTrackOptions::default(), &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        files.push(written("midi", None, &path));
    }

    if !(settings.wav || settings.stems) {
        return Ok((files, None));
    }

    let mix = mix_parts(parts, tempo, &settings.render).context("rendering failed")?;
    let sample_rate = mix.stats.sample_rate;

    if settings.stems {
        for (name, stem) in &mix.stems {
            let path = out_dir.join(format!("{}.{}.wav", base, name));
            wav::write_mono(&path, stem, sample_rate)
                .with_context(|| format!("failed to write {}", path.display()))?;
            files.push(written("stem", Some(name.as_str()), &path));
        }
    }
    if settings.wav {
        let path = out_dir.join(format!("{}.mix.wav", base));
        wav::write_stereo(&path, &mix.bus, sample_rate)
            .with_context(|| format!("failed to write {}", path.display()))?;
        files.push(written("mix", None, &path));
    }

    Ok((files, Some(mix.stats)))
}

fn written(kind: &str, part: Option<&str>, path: &Path) -> WrittenFile {
    WrittenFile {
        kind: kind.to_string(),
        part: part.map(str::to_string),
        path: path.display().to_string(),
    }
}

fn print_summary(result: &GenerateResult, elapsed: Duration) {
    let c = &result.controls;
    println!(
        "{} {} {} at {} bpm, {} bars over {}",
        "Generated".green().bold(),
        c.key,
        c.mode,
        c.bpm,
        result.total_bars,
        c.anchor.join("-")
    );
    println!("  {} {}", "stages:".dimmed(), result.stages.join(" → "));
    for (name, count) in &result.parts {
        println!("  {} {} events", format!("{}:", name).dimmed(), count);
    }
    println!();
    print_sections(&result.sections);

    if !result.diagnostics.is_clean() {
        println!(
            "\n{} {} note(s) clamped to their register",
            "warning:".yellow().bold(),
            result.diagnostics.range_exhaustions
        );
    }

    if !result.files.is_empty() {
        println!("\n{}", "Files".cyan().bold());
        for f in &result.files {
            println!("  {} {}", "✓".green(), f.path);
        }
    }
    if let Some(mix) = &result.mix {
        println!(
            "  {} {:.3}s at {} Hz",
            "mix:".dimmed(),
            mix.duration_sec,
            mix.sample_rate
        );
    }
    println!("{}", format!("done in {:.2}s", elapsed.as_secs_f64()).dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> GenerateArgs {
        GenerateArgs {
            key: Some("D".to_string()),
            mode: Some("dorian".to_string()),
            bpm: Some(112.0),
            anchor: Some("Am-G-C-F".to_string()),
            length: Some("20".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_overrides_only_contain_given_values() {
        let map = GenerateArgs {
            bpm: Some(90.0),
            no_drums: true,
            stems: true,
            ..Default::default()
        }
        .overrides();
        let expected: Mapping = serde_yaml::from_str("bpm: 90.0\ndrums: false\nstems: true\n").unwrap();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_execute_without_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(&GenerateArgs {
            out_dir: Some(dir.path().join("never")),
            ..args()
        })
        .unwrap();
        // 20 s at 112 bpm is 9.33 bars.
        assert_eq!(result.total_bars, 10);
        assert!(result.files.is_empty());
        assert!(!dir.path().join("never").exists());
        assert_eq!(result.controls.key, "D");
        assert_eq!(result.parts.len(), 3);
    }

    #[test]
    fn test_execute_writes_requested_files() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(&GenerateArgs {
            out_dir: Some(dir.path().to_path_buf()),
            name: Some("demo".to_string()),
            midi: true,
            wav: true,
            stems: true,
            ..args()
        })
        .unwrap();

        for file in ["demo.parts.mid", "demo.mix.wav", "demo.melody.wav", "demo.bass.wav", "demo.drums.wav"] {
            assert!(dir.path().join(file).exists(), "{}", file);
        }
        assert_eq!(result.files.len(), 5);
        assert!(result.mix.is_some());
    }

    #[test]
    fn test_no_drums() {
        let result = execute(&GenerateArgs {
            no_drums: true,
            ..args()
        })
        .unwrap();
        assert!(!result.parts.contains_key("drums"));
    }

    #[test]
    fn test_disabled_stages_are_skipped() {
        let result = execute(&GenerateArgs {
            no_voicelead: true,
            no_motif: true,
            no_arrange: true,
            ..args()
        })
        .unwrap();
        assert_eq!(result.stages, vec!["expand"]);
    }

    #[test]
    fn test_missing_config_fails() {
        let err = execute(&GenerateArgs {
            config: Some(PathBuf::from("/nonexistent/none.yaml")),
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn test_config_supplies_values() {
        let dir = tempfile::tempdir().unwrap();
        let preset = dir.path().join("preset.yaml");
        std::fs::write(
            &preset,
            "key: A\nmode: minor\nbpm: 100\nanchor: [Am, F, C, G]\nlength: 30\ndrums: false\n",
        )
        .unwrap();
        let result = execute(&GenerateArgs {
            config: Some(preset),
            bpm: Some(120.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(result.controls.bpm, 120.0);
        assert_eq!(result.controls.mode, "aeolian");
        assert_eq!(result.total_bars, 15);
        assert!(!result.parts.contains_key("drums"));
    }
}
