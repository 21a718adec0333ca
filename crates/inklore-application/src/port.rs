//! Presentation port.
//!
//! The engine never renders anything itself; it drives the
//! presentation layer through this trait and hands it read-only
//! session snapshots on request.

use inklore_core::story::SoundEffect;

/// How character replies are delivered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommunicationMode {
    #[default]
    Text,
    Voice,
}

/// Side-effect surface the engine drives on the presentation layer.
///
/// Implementations must return quickly; they are called from the
/// engine's own task context and must never block a turn.
pub trait PresentationPort: Send + Sync {
    /// Plays a one-shot UI sound.
    fn play_sound(&self, effect: SoundEffect);

    /// Plays synthesized speech for the given turn.
    ///
    /// The turn id lets an implementation drop audio that belongs to a
    /// turn the session has already moved past.
    fn play_speech(&self, turn: u64, audio: Vec<u8>);

    /// Starts (`Some`) or stops (`None`) the looping ambient bed.
    /// Cue strings are opaque; repeated cues may be deduplicated.
    fn set_ambient(&self, cue: Option<String>);
}
