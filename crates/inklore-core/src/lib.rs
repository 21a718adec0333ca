//! Core domain layer of the Inklore storytelling engine.
//!
//! Everything here is presentation-free and network-free: the story
//! data model, the session aggregate with its reconciliation logic,
//! the scripted demo state machine, and the [`gateway::StoryGateway`]
//! contract implemented by `inklore-interaction`.

pub mod error;
pub mod gateway;
pub mod session;
pub mod story;

// Re-export common error type
pub use error::InkloreError;
