//! Generative-backend contract.
//!
//! The engine never talks to a model directly; it goes through the
//! [`StoryGateway`] trait. The `inklore-interaction` crate provides the
//! Gemini REST implementation, and tests substitute mocks.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::story::{
    AmbientAnimation, AmbientSound, BlueprintFragment, BlueprintInfo, BlueprintState, Character,
    EmotionState, HistoryItem, WorldContext, WorldSeed, WorldUpdate,
};

/// Errors raised by a gateway implementation.
///
/// Process errors carry the HTTP status and retryability so callers can
/// log them meaningfully, though the session itself never retries.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level or HTTP-level failure.
    #[error("gateway request failed: {message}")]
    Process {
        status_code: Option<u16>,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The backend answered, but not in the agreed shape.
    #[error("failed to parse gateway response: {0}")]
    Parse(String),

    /// Anything else that prevented the call from completing.
    #[error("{0}")]
    ExecutionFailed(String),
}

impl GatewayError {
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed(message.into())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Process {
                is_retryable: true,
                ..
            }
        )
    }
}

/// Who an interaction message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTarget {
    Character,
    World,
    Both,
}

/// Everything returned by a successful session-initialization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    pub character: Character,
    pub emotion_state: EmotionState,
    pub mood_label: String,
    pub world_seed: WorldSeed,
    pub blueprint_state: BlueprintState,
    pub blueprint_info: BlueprintInfo,
    pub ambient_sound: AmbientSound,
    pub ambient_animation: AmbientAnimation,
}

/// Everything returned by a successful interaction call.
///
/// The narrative fields are all optional; a turn may carry any subset
/// of {character reply, story event, blueprint fragment}.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractResponse {
    #[serde(default)]
    pub character_reply: Option<String>,
    #[serde(default)]
    pub story_event: Option<String>,
    #[serde(default)]
    pub blueprint_fragment: Option<BlueprintFragment>,
    pub updated_emotion_state: EmotionState,
    pub mood_label: String,
    pub updated_blueprint_state: BlueprintState,
    pub world_update: WorldUpdate,
    pub ambient_sound: AmbientSound,
    pub ambient_animation: AmbientAnimation,
}

/// An interaction result plus the optionally rendered cinematic image.
///
/// Image rendering failures are swallowed inside the gateway; a missing
/// image is represented as `None`, never as an error.
#[derive(Debug, Clone)]
pub struct InteractOutcome {
    pub interaction: InteractResponse,
    pub cinematic_image_url: Option<String>,
}

/// Snapshot of session state shipped with an interaction request.
#[derive(Debug, Clone)]
pub struct InteractRequest {
    pub character: Character,
    pub emotion_state: EmotionState,
    pub blueprint_state: BlueprintState,
    pub world_context: WorldContext,
    /// Full narrative log; implementations truncate to their own
    /// trailing window before shipping it to the model.
    pub history: Vec<HistoryItem>,
    pub message: String,
    pub target: MessageTarget,
    pub mood_label: String,
}

/// Opaque generative-backend collaborator.
#[async_trait]
pub trait StoryGateway: Send + Sync {
    /// Creates a character and the initial blueprint puzzle from an
    /// uploaded image plus optional hints.
    async fn init_session(
        &self,
        image_base64: &str,
        mime_type: &str,
        name_hint: &str,
        vibe_hint: &str,
    ) -> Result<InitResponse, GatewayError>;

    /// Advances the story by one turn.
    async fn interact(&self, request: InteractRequest) -> Result<InteractOutcome, GatewayError>;

    /// Synthesizes speech for a character reply.
    ///
    /// `None` means "no voice available" and is not an error; all
    /// failures degrade to `None`.
    async fn synthesize_speech(&self, text: &str, mood_label: &str) -> Option<Vec<u8>>;

    /// Writes the closing reflection once the blueprint is complete.
    async fn summarize(
        &self,
        history: &[HistoryItem],
        blueprint: &BlueprintInfo,
    ) -> Result<String, GatewayError>;
}
