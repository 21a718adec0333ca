//! Application layer for Inklore.
//!
//! This crate wires the session core to a generative gateway and a
//! presentation port: it owns the session aggregate, sequences turns,
//! dispatches timed side effects, and hosts the scripted demo fixtures.

pub mod demo;
pub mod port;
pub mod session_usecase;

pub use port::{CommunicationMode, PresentationPort};
pub use session_usecase::{
    CharacterUpload, INIT_FAILURE_MESSAGE, INTERACTION_FAILURE_MESSAGE, SessionUseCase,
};
