//! Ambient cues and fixed sound effects.
//!
//! Cue strings are opaque to the engine; only the presentation layer
//! interprets them. [`SoundEffect`] is the small fixed set of UI
//! chimes the engine itself sequences.

use serde::{Deserialize, Serialize};

/// Background sound cue plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientSound {
    pub sound_cue: String,
    pub description: String,
}

/// Background animation cue plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbientAnimation {
    pub animation_cue: String,
    pub description: String,
}

/// One-shot UI sound effects the engine requests from presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    Init,
    CharacterReply,
    StoryEvent,
    WorldClue,
    CinematicMoment,
    SendMessage,
}
