//! Gateway configuration.
//!
//! The API key lives in `secret.json` under the platform config
//! directory; model names and window sizes can be overridden through an
//! optional `config.toml` next to it.

use std::fs;
use std::path::Path;

use inklore_core::error::{InkloreError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
const DEFAULT_VOICE_NAME: &str = "Kore";
/// Trailing history window shipped with interaction requests.
const DEFAULT_HISTORY_WINDOW: usize = 5;
/// Trailing history window shipped with the closing-summary request.
const DEFAULT_SUMMARY_WINDOW: usize = 10;

/// Secret configuration stored in `secret.json`.
///
/// Error messages produced while loading this file must never contain
/// the key itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
}

/// Optional overrides from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    gateway: GatewayOverrides,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GatewayOverrides {
    text_model: Option<String>,
    speech_model: Option<String>,
    image_model: Option<String>,
    voice_name: Option<String>,
    history_window: Option<usize>,
    summary_window: Option<usize>,
}

/// Resolved gateway settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub text_model: String,
    pub speech_model: String,
    pub image_model: String,
    pub voice_name: String,
    pub history_window: usize,
    pub summary_window: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            voice_name: DEFAULT_VOICE_NAME.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            summary_window: DEFAULT_SUMMARY_WINDOW,
        }
    }
}

impl GatewaySettings {
    fn apply(mut self, overrides: GatewayOverrides) -> Self {
        if let Some(model) = overrides.text_model {
            self.text_model = model;
        }
        if let Some(model) = overrides.speech_model {
            self.speech_model = model;
        }
        if let Some(model) = overrides.image_model {
            self.image_model = model;
        }
        if let Some(voice) = overrides.voice_name {
            self.voice_name = voice;
        }
        if let Some(window) = overrides.history_window {
            self.history_window = window;
        }
        if let Some(window) = overrides.summary_window {
            self.summary_window = window;
        }
        self
    }
}

/// Everything the Gemini gateway needs to make calls.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub settings: GatewaySettings,
}

impl GatewayConfig {
    /// Builds a config programmatically with default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            settings: GatewaySettings::default(),
        }
    }

    /// Loads from the platform config directory (`<config>/inklore`).
    pub fn load() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| InkloreError::config("Could not resolve a config directory"))?
            .join("inklore");
        Self::load_from(&base)
    }

    /// Loads `secret.json` (required) and `config.toml` (optional)
    /// from an explicit base directory.
    pub fn load_from(base: &Path) -> Result<Self> {
        let secret_path = base.join("secret.json");
        let secret = read_secret(&secret_path)?;
        let api_key = secret
            .gemini
            .map(|gemini| gemini.api_key)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                InkloreError::config(format!(
                    "Gemini configuration not found in {}",
                    secret_path.display()
                ))
            })?;

        let settings = match read_settings(&base.join("config.toml"))? {
            Some(file) => GatewaySettings::default().apply(file.gateway),
            None => GatewaySettings::default(),
        };

        Ok(Self { api_key, settings })
    }
}

fn read_secret(path: &Path) -> Result<SecretConfig> {
    if !path.exists() {
        return Err(InkloreError::config(format!(
            "Secret file not found: {}",
            path.display()
        )));
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_settings(path: &Path) -> Result<Option<SettingsFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&raw)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_secret(dir: &Path, body: &str) {
        fs::write(dir.join("secret.json"), body).unwrap();
    }

    #[test]
    fn test_load_from_reads_api_key_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_secret(dir.path(), r#"{"gemini": {"api_key": "test-key"}}"#);

        let config = GatewayConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.settings, GatewaySettings::default());
    }

    #[test]
    fn test_load_from_applies_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write_secret(dir.path(), r#"{"gemini": {"api_key": "test-key"}}"#);
        fs::write(
            dir.path().join("config.toml"),
            "[gateway]\ntext_model = \"gemini-x\"\nhistory_window = 8\n",
        )
        .unwrap();

        let config = GatewayConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.settings.text_model, "gemini-x");
        assert_eq!(config.settings.history_window, 8);
        assert_eq!(config.settings.voice_name, "Kore");
    }

    #[test]
    fn test_load_from_rejects_missing_gemini_section() {
        let dir = tempfile::tempdir().unwrap();
        write_secret(dir.path(), "{}");

        let err = GatewayConfig::load_from(dir.path()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_load_from_rejects_missing_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GatewayConfig::load_from(dir.path()).unwrap_err();
        assert!(err.is_config());
    }
}
