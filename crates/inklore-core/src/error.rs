//! Error types for the Inklore engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Inklore engine.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum InkloreError {
    /// Session initialization failed (character creation call failed)
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// An interaction or summary call failed mid-story
    #[error("Interaction failed: {0}")]
    Interaction(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InkloreError {
    /// Creates an Initialization error
    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    /// Creates an Interaction error
    pub fn interaction(message: impl Into<String>) -> Self {
        Self::Interaction(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an initialization failure
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization(_))
    }

    /// Check if this is an interaction failure
    pub fn is_interaction(&self) -> bool {
        matches!(self, Self::Interaction(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for InkloreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for InkloreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for InkloreError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for InkloreError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, InkloreError>`.
pub type Result<T> = std::result::Result<T, InkloreError>;
