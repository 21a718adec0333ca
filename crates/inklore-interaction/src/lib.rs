//! Gemini-backed implementation of the Inklore story gateway.
//!
//! This crate keeps every network and prompt concern out of the core:
//! configuration/secrets, the system instruction and response schemas,
//! and the REST calls for text, speech, and cinematic images.

pub mod config;
pub mod gemini;
pub mod schema;

pub use config::{GatewayConfig, GatewaySettings};
pub use gemini::GeminiStoryGateway;
