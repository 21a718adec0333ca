//! Blueprint puzzle state.
//!
//! The "blueprint" is the real-world plan, formula, or design the
//! character is reconstructing over the course of the story.

use serde::{Deserialize, Serialize};

/// Numeric progress of the blueprint reconstruction.
///
/// Values are nominally in `[0, 100]` but stored verbatim from the
/// source; only `progress` carries a hard semantic: reaching 100 or
/// beyond ends the story in success.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlueprintState {
    pub progress: f32,
    pub understanding: f32,
    pub complexity: f32,
}

impl BlueprintState {
    /// Whether the blueprint has been fully reconstructed.
    pub fn is_complete(&self) -> bool {
        self.progress >= 100.0
    }
}

/// Static facts about the blueprint, set once at session start.
///
/// `first_fragment` doubles as the fallback "current goal" before any
/// interaction clue arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintInfo {
    pub title: String,
    pub summary: String,
    pub first_fragment: String,
}

/// A clue revealed by a turn: narrative text plus numeric deltas.
///
/// The deltas are advisory context for the backend; the authoritative
/// state each turn is the full updated [`BlueprintState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintFragment {
    pub from_blueprint: String,
    #[serde(default)]
    pub understanding_delta: f32,
    #[serde(default)]
    pub progress_delta: f32,
    #[serde(default)]
    pub complexity_delta: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_boundary() {
        let mut state = BlueprintState {
            progress: 99.0,
            understanding: 80.0,
            complexity: 10.0,
        };
        assert!(!state.is_complete());

        state.progress = 100.0;
        assert!(state.is_complete());

        // Out-of-range progress is accepted unclamped and still completes.
        state.progress = 137.0;
        assert!(state.is_complete());
    }

    #[test]
    fn test_fragment_deltas_default_when_absent() {
        let fragment: BlueprintFragment =
            serde_json::from_str(r#"{"fromBlueprint": "A faded note surfaces."}"#).unwrap();
        assert_eq!(fragment.from_blueprint, "A faded note surfaces.");
        assert_eq!(fragment.progress_delta, 0.0);
        assert_eq!(fragment.understanding_delta, 0.0);
        assert_eq!(fragment.complexity_delta, 0.0);
    }
}
