//! Story domain module.
//!
//! Shared data shapes for everything the narrative engine tracks:
//! the character, their simulated emotions, the blueprint puzzle,
//! the world context, the chat history, and ambient cues.
//!
//! All wire-facing types rename to `camelCase` so they deserialize the
//! exact JSON the generative backend is schema-constrained to emit.

mod blueprint;
mod character;
mod cue;
mod emotion;
mod history;
mod world;

pub use blueprint::{BlueprintFragment, BlueprintInfo, BlueprintState};
pub use character::Character;
pub use cue::{AmbientAnimation, AmbientSound, SoundEffect};
pub use emotion::EmotionState;
pub use history::{HistoryItem, HistoryRole};
pub use world::{
    CinematicMoment, LocationChange, LocationChangeKind, WorldContext, WorldSeed, WorldUpdate,
};
