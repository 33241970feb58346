//! Chordloom CLI - anchor-driven song sketching
//!
//! Expands a chord progression into melody, bass and drums, shapes the result
//! and writes MIDI and WAV files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use chordloom_cli::commands;
use chordloom_cli::commands::generate::GenerateArgs;
use chordloom_cli::logging;

/// Chordloom - Anchor-Driven Song Sketching
#[derive(Parser)]
#[command(name = "chordloom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a length and markers and print the proposed sections
    Plan {
        /// Song length (e.g. 60, 60s, 1m30s, 1:30)
        #[arg(long)]
        length: String,

        /// Repeatable "time:label" marker
        #[arg(long)]
        marker: Vec<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Generate a song from an anchor progression
    Generate(GenerateArgs),

    /// Write one sustained root note per bar of an anchor
    AnchorDemo {
        /// Chord progression (e.g. "Am-G-C-F")
        #[arg(long)]
        anchor: String,

        /// Tempo in beats per minute
        #[arg(long, default_value_t = 120.0)]
        bpm: f64,

        /// Output MIDI file
        #[arg(short, long)]
        out: PathBuf,

        /// Octave of the root notes
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        octave: i32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Plan {
            length,
            marker,
            json,
        } => commands::plan::run(&length, &marker, json),
        Commands::Generate(args) => commands::generate::run(&args),
        Commands::AnchorDemo {
            anchor,
            bpm,
            out,
            octave,
            json,
        } => commands::anchor_demo::run(&anchor, bpm, &out, octave, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
