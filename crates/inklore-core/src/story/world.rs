//! World context and per-turn world updates.

use serde::{Deserialize, Serialize};

/// World facts returned once at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSeed {
    pub world_name: String,
    pub world_description: String,
    pub starting_location_name: String,
    pub starting_location_description: String,
}

/// The world as the session tracks it.
///
/// `world_name`/`world_description` are set once at init and never
/// touched again; only the current-location fields are replaceable,
/// and only through a location-change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldContext {
    pub world_name: String,
    pub world_description: String,
    pub current_location_name: String,
    pub current_location_description: String,
}

impl WorldContext {
    /// Builds the initial context from a world seed, placing the
    /// character at the seed's starting location.
    pub fn from_seed(seed: &WorldSeed) -> Self {
        Self {
            world_name: seed.world_name.clone(),
            world_description: seed.world_description.clone(),
            current_location_name: seed.starting_location_name.clone(),
            current_location_description: seed.starting_location_description.clone(),
        }
    }
}

/// How a turn moved the character, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationChangeKind {
    #[default]
    None,
    Move,
    Transform,
}

/// Location-change payload attached to a turn's world update.
///
/// The new-location fields may be absent when `kind` is `none`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationChange {
    #[serde(rename = "type")]
    pub kind: LocationChangeKind,
    #[serde(default)]
    pub new_location_name: Option<String>,
    #[serde(default)]
    pub new_location_description: Option<String>,
}

/// An optional illustrative image tied to a narratively significant turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CinematicMoment {
    pub enabled: bool,
    #[serde(default)]
    pub prompt: String,
}

/// Per-turn world changes returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldUpdate {
    pub world_mood: String,
    pub location_change: LocationChange,
    #[serde(default)]
    pub cinematic_moment: CinematicMoment,
}
