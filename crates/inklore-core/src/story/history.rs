//! Narrative log types.

use serde::{Deserialize, Serialize};

/// Who a narrative log line belongs to.
///
/// The first `user` item of a session is conventionally an image
/// reference rather than text; the presentation layer renders it as
/// the character portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Character,
    Event,
    World,
}

/// A single line in the append-only narrative log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub role: HistoryRole,
    pub text: String,
    /// Timestamp when the line was appended (ISO 8601 format).
    #[serde(default)]
    pub timestamp: String,
}

impl HistoryItem {
    /// Creates a new item stamped with the current time.
    pub fn new(role: HistoryRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
