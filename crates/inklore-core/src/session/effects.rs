//! Side effects emitted by a state merge.
//!
//! The reconciler returns an explicit ordered list of timed effects
//! instead of firing sounds itself; the application layer dispatches
//! them after the merge commits. Delays exist purely to pace perceived
//! audio, never to gate logic.

use std::time::Duration;

use crate::story::SoundEffect;

/// Stagger between the character-reply chime and the story-event chime.
pub const STORY_EVENT_SOUND_DELAY: Duration = Duration::from_millis(300);
/// Stagger between the character-reply chime and the world-clue chime.
pub const WORLD_CLUE_SOUND_DELAY: Duration = Duration::from_millis(600);
/// Simulated "thinking" pause before a scripted demo payload applies.
pub const DEMO_THINKING_DELAY: Duration = Duration::from_millis(1000);

/// A single side effect requested by a merge.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEffect {
    /// Play a one-shot UI sound.
    Sound(SoundEffect),
    /// Speak a character reply aloud (honored only in voice mode).
    Speech { text: String, mood: String },
}

/// An effect plus the delay it should be dispatched after.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEffect {
    pub delay: Duration,
    pub effect: TurnEffect,
}

impl TimedEffect {
    pub fn immediate(effect: TurnEffect) -> Self {
        Self {
            delay: Duration::ZERO,
            effect,
        }
    }

    pub fn after(delay: Duration, effect: TurnEffect) -> Self {
        Self { delay, effect }
    }
}
