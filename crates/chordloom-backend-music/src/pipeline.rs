//! Runs the full generation chain in its fixed order.
//!
//! expand → voice-lead → motif → arrange → groove. Voice leading runs before
//! the motif copy so repeated hooks carry the smoothed pitches, and groove
//! runs last so fills and copied motifs are humanized along with everything
//! else.

use chordloom_spec::{GrooveTemplate, PartSet, Section};

use crate::arrange::arrange;
use crate::groove::impose_groove_on_parts;
use crate::motif::{apply_motif_repetition, MotifOptions};
use crate::song::{expand_song, SongRequest};
use crate::theory::Diagnostics;
use crate::voicelead::{improve_voice_leading, VoiceLeadingOptions};
use crate::MusicResult;

/// Groove stage input.
#[derive(Debug, Clone, PartialEq)]
pub struct GrooveStage {
    /// Template to impose.
    pub template: GrooveTemplate,
    /// Humanization limit in milliseconds.
    pub max_ms: f64,
}

/// Everything needed for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    /// Song expansion parameters.
    pub song: SongRequest,
    /// Section plan used by the motif and arrangement stages.
    pub sections: Vec<Section>,
    /// Voice-leading options; `None` skips the stage.
    pub voice_leading: Option<VoiceLeadingOptions>,
    /// Motif options; `None` skips the stage.
    pub motif: Option<MotifOptions>,
    /// Whether to apply section dynamics and fills.
    pub arrange: bool,
    /// Groove to impose; `None` skips the stage.
    pub groove: Option<GrooveStage>,
}

impl ComposeRequest {
    /// A request with every stage enabled except groove.
    pub fn new(song: SongRequest, sections: Vec<Section>) -> Self {
        Self {
            song,
            sections,
            voice_leading: Some(VoiceLeadingOptions::default()),
            motif: Some(MotifOptions::default()),
            arrange: true,
            groove: None,
        }
    }
}

/// Output of [`compose`].
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Bars covering the requested length.
    pub total_bars: usize,
    /// Final parts.
    pub parts: PartSet,
    /// Pitch-search fallbacks from generation and voice leading.
    pub diagnostics: Diagnostics,
    /// Names of the stages that ran, in order.
    pub stages: Vec<&'static str>,
}

/// Expands the song and applies every enabled stage.
pub fn compose(request: &ComposeRequest) -> MusicResult<Composition> {
    let plan = expand_song(&request.song)?;
    let tempo = request.song.tempo;
    let mut diagnostics = plan.diagnostics;
    let mut parts = plan.parts;
    let mut stages = vec!["expand"];

    if let Some(options) = &request.voice_leading {
        let led = improve_voice_leading(
            &parts,
            &plan.tiled_anchor,
            request.song.key,
            request.song.mode,
            options,
        );
        parts = led.parts;
        diagnostics.merge(led.diagnostics);
        stages.push("voicelead");
    }

    if let Some(options) = &request.motif {
        parts = apply_motif_repetition(&parts, tempo, &request.sections, options);
        stages.push("motif");
    }

    if request.arrange {
        parts = arrange(&parts, tempo, &request.sections);
        stages.push("arrange");
    }

    if let Some(groove) = &request.groove {
        parts = impose_groove_on_parts(&parts, tempo, &groove.template, groove.max_ms);
        stages.push("groove");
    }

    tracing::debug!(
        stages = ?stages,
        events = parts.event_count(),
        range_exhaustions = diagnostics.range_exhaustions,
        "composition complete"
    );

    Ok(Composition {
        total_bars: plan.total_bars,
        parts,
        diagnostics,
        stages,
    })
}
