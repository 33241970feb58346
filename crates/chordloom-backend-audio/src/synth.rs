//! Renders one part's note events to a mono buffer.

use chordloom_spec::{Envelope, NoteEvent, PartRender, Tempo};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::envelope::adsr_curve;
use crate::error::{AudioError, AudioResult};
use crate::mixer::{normalize_peak, PEAK_TARGET};
use crate::oscillator::{midi_to_freq, render_wave};

/// Shortest audible note, in seconds.
pub const MIN_NOTE_SECONDS: f64 = 1e-3;

/// Checks a sample rate is usable.
pub fn validate_sample_rate(sample_rate: u32) -> AudioResult<()> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    Ok(())
}

/// Renders `events` to a mono buffer.
///
/// The buffer is `ceil(latest_end_sec * sample_rate) + 1` samples long, or a
/// single silent sample when there are no events. Each note is an oscillator
/// segment shaped by `envelope`, scaled by `part.gain * velocity / 127`, and
/// summed into the buffer. The result is scaled down to a 0.99 peak only if it
/// exceeds that.
///
/// `rng` feeds the noise waveform and is advanced across notes in order.
pub fn render_part(
    events: &[NoteEvent],
    tempo: Tempo,
    sample_rate: u32,
    part: PartRender,
    envelope: &Envelope,
    rng: &mut Pcg32,
) -> AudioResult<Vec<f64>> {
    validate_sample_rate(sample_rate)?;
    if !part.gain.is_finite() {
        return Err(AudioError::invalid_param("gain", "must be finite"));
    }
    if events.is_empty() {
        return Ok(vec![0.0]);
    }

    let sr = f64::from(sample_rate);
    let spb = tempo.seconds_per_beat();
    let latest_end = events.iter().map(|e| e.end).fold(f64::MIN, f64::max) * spb;
    let n = (latest_end.max(0.0) * sr).ceil() as usize + 1;
    let mut out = vec![0.0; n];

    for ev in events {
        let start_sec = (ev.start * spb).max(0.0);
        let end_sec = (ev.end * spb).max(start_sec + MIN_NOTE_SECONDS);
        let s_idx = (start_sec * sr) as usize;
        let e_idx = ((end_sec * sr).ceil() as usize).min(n);
        if e_idx <= s_idx {
            continue;
        }
        let len = e_idx - s_idx;

        let osc = render_wave(part.wave, midi_to_freq(ev.pitch), len, sample_rate, rng);
        let env = adsr_curve(envelope, len, sample_rate);
        let amp = part.gain * f64::from(ev.velocity.clamp(1, 127)) / 127.0;

        for ((slot, o), e) in out[s_idx..e_idx].iter_mut().zip(osc).zip(env) {
            *slot += amp * o * e;
        }
    }

    normalize_peak(&mut out, PEAK_TARGET);
    debug!(
        events = events.len(),
        samples = n,
        wave = %part.wave,
        "rendered part"
    );
    Ok(out)
}
