//! Fixed per-bar drum kit pattern.

use chordloom_spec::NoteEvent;

/// General MIDI percussion voices used by the generator and the fill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DrumVoice {
    /// Bass drum 1.
    Kick = 36,
    /// Acoustic snare.
    Snare = 38,
    /// Closed hi-hat.
    ClosedHat = 42,
    /// Open hi-hat.
    OpenHat = 46,
    /// Crash cymbal 1.
    Crash = 49,
}

impl DrumVoice {
    /// GM note number.
    pub const fn pitch(self) -> i32 {
        self as i32
    }

    /// Drum note event at `start` lasting `length` beats.
    pub fn hit(self, start: f64, length: f64, velocity: i32) -> NoteEvent {
        NoteEvent::new(self.pitch(), start, start + length, velocity)
    }
}

/// Generates `bars` bars of a backbeat rock pattern.
///
/// Kick on 0 and 2 with a pickup at 1.75 in odd bars, snare on 1 and 3,
/// eighth-note closed hats with alternating accent, and an open hat at 3.5.
pub fn generate_drums(bars: usize) -> Vec<NoteEvent> {
    let mut events = Vec::with_capacity(bars * 14);

    for bar in 0..bars {
        let t = (bar * 4) as f64;

        events.push(DrumVoice::Snare.hit(t + 1.0, 0.25, 108));
        events.push(DrumVoice::Snare.hit(t + 3.0, 0.25, 112));

        events.push(DrumVoice::Kick.hit(t, 0.25, 118));
        events.push(DrumVoice::Kick.hit(t + 2.0, 0.25, 112));
        if bar % 2 == 1 {
            events.push(DrumVoice::Kick.hit(t + 1.75, 0.125, 96));
        }

        for n in 0..8 {
            let velocity = if n % 2 == 0 { 94 } else { 84 };
            events.push(DrumVoice::ClosedHat.hit(t + n as f64 * 0.5, 0.25, velocity));
        }

        events.push(DrumVoice::OpenHat.hit(t + 3.5, 0.375, 96));
    }

    events
}
