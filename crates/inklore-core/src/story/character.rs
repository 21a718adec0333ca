//! Character domain model.

use serde::{Deserialize, Serialize};

/// A character brought to life from an uploaded or sketched drawing.
///
/// Created once at session start and immutable for the rest of the
/// session; traits and description never change mid-story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Display name of the character
    pub name: String,
    /// Short epithet shown under the name (e.g. "the Meticulous Planner")
    pub short_title: String,
    /// Narrative description of who the character is
    pub description: String,
    /// Archetype label (e.g. "The Strategist")
    pub archetype: String,
    /// Ordered personality trait tags
    pub traits: Vec<String>,
}
