//! Scripted demo state machine data.
//!
//! The demo replays a fixed, hand-authored conversation with no network
//! dependency, reusing the reconciler's merge logic so it is
//! behaviorally indistinguishable from the live path apart from its
//! data source and fixed thinking delay.

use serde::{Deserialize, Serialize};

use crate::gateway::InteractResponse;
use crate::story::{
    AmbientAnimation, AmbientSound, BlueprintInfo, BlueprintState, Character, EmotionState,
    HistoryItem, WorldContext,
};

/// Gates whether the walkthrough overlay or the story itself is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoStatus {
    /// The contextual walkthrough overlay is stepping through the UI.
    #[default]
    Guide,
    /// The scripted story is running.
    Story,
    /// The script is exhausted; only restart remains.
    Ended,
}

/// A scripted interaction result, shaped identically to a live one.
///
/// `cinematic` stands in for live image generation: when set, the
/// engine substitutes a fixed placeholder illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedResponse {
    #[serde(flatten)]
    pub interaction: InteractResponse,
    #[serde(default)]
    pub cinematic: bool,
}

/// One entry of the demo script.
///
/// `User` entries carry the line the script suggests the user types;
/// they illustrate the walkthrough but are never enforced against the
/// actual input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum DemoEntry {
    User { line: String },
    Response(Box<ScriptedResponse>),
}

/// The fixed, ordered demo conversation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemoScript {
    pub entries: Vec<DemoEntry>,
}

impl DemoScript {
    /// Scans forward from `cursor` for the next scripted response.
    ///
    /// Returns the entry index alongside the payload so the caller can
    /// advance the cursor to just past the consumed entry.
    pub fn next_response(&self, cursor: usize) -> Option<(usize, &ScriptedResponse)> {
        self.entries
            .iter()
            .enumerate()
            .skip(cursor)
            .find_map(|(index, entry)| match entry {
                DemoEntry::Response(payload) => Some((index, payload.as_ref())),
                DemoEntry::User { .. } => None,
            })
    }

    /// Number of scripted responses in the whole script.
    pub fn response_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, DemoEntry::Response(_)))
            .count()
    }
}

/// The fixed initial session snapshot the demo seeds wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoOpening {
    pub character: Character,
    pub emotion_state: EmotionState,
    pub blueprint_state: BlueprintState,
    pub blueprint_info: BlueprintInfo,
    pub world_context: WorldContext,
    pub history: Vec<HistoryItem>,
    pub mood_label: String,
    pub world_mood: String,
    pub ambient_sound: AmbientSound,
    pub ambient_animation: AmbientAnimation,
}

/// Which side of its anchor a guide callout prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// One step of the guided walkthrough overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideStep {
    /// Presentation anchor the callout attaches to.
    pub anchor: String,
    pub title: String,
    pub body: String,
    pub side: GuideSide,
}
