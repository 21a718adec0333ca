//! Session phase machine.

use serde::{Deserialize, Serialize};

/// The phase drives which view is active and which inputs are accepted.
///
/// Transitions:
/// `init` → `loading` → (`interactive` | `demo` | `success` | `error`),
/// with `restart` available from every phase back to `init`.
/// `success` is terminal; `error` is terminal until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No character yet; waiting for an upload or a demo start.
    #[default]
    Init,
    /// A request is outstanding; input is rejected.
    Loading,
    /// Awaiting user input, live backend mode.
    Interactive,
    /// Awaiting user input, scripted mode.
    Demo,
    /// Blueprint complete.
    Success,
    /// A backend call failed; restart required.
    Error,
}

impl SessionPhase {
    /// Whether user messages are accepted in this phase.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Interactive | Self::Demo)
    }
}
