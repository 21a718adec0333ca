//! Session domain model.
//!
//! The single root aggregate of the engine. It is owned exclusively by
//! the application-layer use case and mutated only through the
//! reconciler's merge functions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::demo::DemoStatus;
use super::phase::SessionPhase;
use crate::story::{
    AmbientAnimation, AmbientSound, BlueprintInfo, BlueprintState, Character, EmotionState,
    HistoryItem, WorldContext,
};

/// The complete state of one storytelling session.
///
/// The character/emotion/world/blueprint fields are set together at
/// init and torn down together at restart; mid-session, a missing one
/// indicates an inconsistency rather than a valid business case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format); renewed on restart.
    pub id: String,
    /// Current phase of the session state machine.
    pub phase: SessionPhase,
    /// Monotonic turn counter, incremented per accepted interaction.
    /// Keys fired-off audio so stale turns cannot speak over new ones.
    pub turn: u64,
    pub character: Option<Character>,
    pub emotion_state: Option<EmotionState>,
    pub blueprint_state: Option<BlueprintState>,
    pub blueprint_info: Option<BlueprintInfo>,
    pub world_context: Option<WorldContext>,
    /// Append-only narrative log; only cleared on restart.
    pub history: Vec<HistoryItem>,
    /// Character mood label, replaced wholesale each turn.
    pub mood_label: String,
    /// World mood label, replaced wholesale each turn.
    pub world_mood: String,
    pub ambient_sound: Option<AmbientSound>,
    pub ambient_animation: Option<AmbientAnimation>,
    /// Illustration for the latest cinematic moment, if any.
    pub cinematic_image_url: Option<String>,
    /// Closing reflection, set only on the transition into success.
    pub success_summary: Option<String>,
    /// User-facing message shown while in the error phase.
    pub failure_message: Option<String>,
    /// Cursor into the demo script (also the guide step counter).
    pub demo_step: usize,
    pub demo_status: DemoStatus,
}

impl Session {
    /// Creates an empty session in the `init` phase.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            phase: SessionPhase::Init,
            turn: 0,
            character: None,
            emotion_state: None,
            blueprint_state: None,
            blueprint_info: None,
            world_context: None,
            history: Vec::new(),
            mood_label: String::new(),
            world_mood: String::new(),
            ambient_sound: None,
            ambient_animation: None,
            cinematic_image_url: None,
            success_summary: None,
            failure_message: None,
            demo_step: 0,
            demo_status: DemoStatus::Guide,
        }
    }

    /// Unconditionally resets every field to its initial empty value,
    /// regardless of current phase. Idempotent (up to the fresh id).
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    /// Whether the aggregate carries everything an interaction needs.
    pub fn is_ready(&self) -> bool {
        self.character.is_some()
            && self.emotion_state.is_some()
            && self.blueprint_state.is_some()
            && self.blueprint_info.is_some()
            && self.world_context.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
