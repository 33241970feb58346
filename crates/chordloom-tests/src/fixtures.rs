//! Test fixtures: canned song requests, reference performances and presets.

use std::fs;
use std::path::{Path, PathBuf};

use chordloom_backend_music::melody::GeneratorOptions;
use chordloom_backend_music::midi::{write_parts, MidiTrackOptions};
use chordloom_backend_music::song::SongRequest;
use chordloom_backend_music::theory::parse_anchor;
use chordloom_spec::{Key, Mode, NoteEvent, PartSet, Tempo, DRUMS};
use tempfile::TempDir;

/// A song request over `anchor` in A aeolian.
pub fn song_request(anchor: &[&str], bpm: f64, length_sec: f64) -> SongRequest {
    SongRequest {
        anchor: parse_anchor(anchor).expect("fixture anchor must parse"),
        key: Key::new(9),
        mode: Mode::Aeolian,
        tempo: Tempo::new(bpm).expect("fixture tempo must be valid"),
        length_sec,
        drums: true,
        generator: GeneratorOptions::default(),
    }
}

/// Eighth-note hats with every off-beat delayed by `swing_beats`, as MIDI bytes.
pub fn swung_reference(bpm: f64, beats: usize, swing_beats: f64) -> Vec<u8> {
    let events = (0..beats * 2)
        .map(|i| {
            let straight = i as f64 * 0.5;
            let start = if i % 2 == 1 { straight + swing_beats } else { straight };
            NoteEvent::new(42, start, start + 0.25, 90)
        })
        .collect();
    let parts = PartSet::new().with_part(DRUMS, events);
    let tempo = Tempo::new(bpm).expect("fixture tempo must be valid");
    write_parts(&parts, tempo, &MidiTrackOptions::default()).expect("fixture MIDI must encode")
}

/// A scratch project directory for CLI runs.
pub struct SongFixture {
    pub root: TempDir,
}

impl SongFixture {
    /// Create a new empty fixture.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Output directory used by generated songs.
    pub fn out_dir(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Write a YAML preset and return its path.
    pub fn add_preset(&self, name: &str, yaml: &str) -> PathBuf {
        let path = self.root.path().join(format!("{}.yaml", name));
        fs::write(&path, yaml).expect("Failed to write preset");
        path
    }

    /// Write a swung reference MIDI file and return its path.
    pub fn add_reference(&self, name: &str, bpm: f64, swing_beats: f64) -> PathBuf {
        let path = self.root.path().join(format!("{}.mid", name));
        fs::write(&path, swung_reference(bpm, 16, swing_beats)).expect("Failed to write reference");
        path
    }

    /// Read a file below the output directory.
    pub fn read_output(&self, file: &str) -> Vec<u8> {
        fs::read(self.out_dir().join(file)).expect("Failed to read output")
    }
}

impl Default for SongFixture {
    fn default() -> Self {
        Self::new()
    }
}
