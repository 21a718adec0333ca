//! GeminiStoryGateway - Direct REST API implementation of the story gateway.
//!
//! Calls the Gemini REST API without any SDK dependency. Text calls are
//! schema-constrained JSON; speech uses audio response modalities; the
//! cinematic illustration goes through the image model's predict
//! endpoint. Configuration comes from `secret.json` / `config.toml`.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use inklore_core::gateway::{
    GatewayError, InitResponse, InteractOutcome, InteractRequest, InteractResponse, StoryGateway,
};
use inklore_core::story::{BlueprintInfo, HistoryItem};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::{GatewayConfig, GatewaySettings};
use crate::schema;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiStoryGateway {
    client: Client,
    api_key: String,
    settings: GatewaySettings,
}

impl GeminiStoryGateway {
    /// Creates a gateway from a resolved configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key,
            settings: config.settings,
        }
    }

    /// Loads configuration from the platform config directory.
    pub fn try_from_env() -> Result<Self, GatewayError> {
        let config = GatewayConfig::load().map_err(|e| {
            GatewayError::execution_failed(format!("Failed to load gateway configuration: {e}"))
        })?;
        Ok(Self::new(config))
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={api_key}",
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::Process {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        response
            .json()
            .await
            .map_err(|err| GatewayError::Parse(format!("Failed to parse Gemini response: {err}")))
    }

    /// Renders a cinematic illustration for a significant turn.
    ///
    /// Failure is swallowed; the story continues without the image.
    async fn render_cinematic(&self, prompt: &str) -> Option<String> {
        let url = format!(
            "{BASE_URL}/{model}:predict?key={api_key}",
            model = self.settings.image_model,
            api_key = self.api_key
        );
        let body = PredictRequest {
            instances: vec![ImageInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: "1:1".to_string(),
            },
        };

        let response = match self.client.post(url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Cinematic image request failed: {err}");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(
                "Cinematic image generation failed with status {}",
                response.status()
            );
            return None;
        }

        let parsed: PredictResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("Cinematic image response unreadable: {err}");
                return None;
            }
        };

        parsed
            .predictions
            .and_then(|mut predictions| predictions.pop())
            .and_then(|prediction| prediction.bytes_base64_encoded)
            .map(|bytes| format!("data:image/png;base64,{bytes}"))
    }
}

#[async_trait]
impl StoryGateway for GeminiStoryGateway {
    async fn init_session(
        &self,
        image_base64: &str,
        mime_type: &str,
        name_hint: &str,
        vibe_hint: &str,
    ) -> Result<InitResponse, GatewayError> {
        let request_text = json!({
            "mode": "init",
            "hintName": name_hint,
            "hintVibe": vibe_hint,
        })
        .to_string();

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: mime_type.to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                    Part::Text { text: request_text },
                ],
            }],
            system_instruction: Some(system_instruction()),
            generation_config: Some(GenerationConfig::structured(schema::init_response_schema())),
        };

        let response = self.generate_content(&self.settings.text_model, &body).await?;
        let text = extract_text(response)?;
        serde_json::from_str(text.trim())
            .map_err(|err| GatewayError::Parse(format!("Init response out of contract: {err}")))
    }

    async fn interact(&self, request: InteractRequest) -> Result<InteractOutcome, GatewayError> {
        let payload = interact_payload(&request, self.settings.history_window);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: payload.to_string(),
                }],
            }],
            system_instruction: Some(system_instruction()),
            generation_config: Some(GenerationConfig::structured(
                schema::interact_response_schema(),
            )),
        };

        let response = self.generate_content(&self.settings.text_model, &body).await?;
        let text = extract_text(response)?;
        let interaction: InteractResponse = serde_json::from_str(text.trim()).map_err(|err| {
            GatewayError::Parse(format!("Interaction response out of contract: {err}"))
        })?;

        let moment = &interaction.world_update.cinematic_moment;
        let cinematic_image_url = if moment.enabled && !moment.prompt.is_empty() {
            self.render_cinematic(&moment.prompt).await
        } else {
            None
        };

        Ok(InteractOutcome {
            interaction,
            cinematic_image_url,
        })
    }

    async fn synthesize_speech(&self, text: &str, mood_label: &str) -> Option<Vec<u8>> {
        if text.is_empty() {
            return None;
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: format!(
                        "Say this in a way that sounds {}: {}",
                        mood_label.to_lowercase(),
                        text
                    ),
                }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig::speech(&self.settings.voice_name)),
        };

        let response = match self.generate_content(&self.settings.speech_model, &body).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("Speech synthesis failed: {err}");
                return None;
            }
        };

        let encoded = extract_inline_data(response)?;
        match BASE64_STANDARD.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!("Speech audio was not valid base64: {err}");
                None
            }
        }
    }

    async fn summarize(
        &self,
        history: &[HistoryItem],
        blueprint: &BlueprintInfo,
    ) -> Result<String, GatewayError> {
        let window = trailing(history, self.settings.summary_window);
        let history_json = serde_json::to_string(window)
            .map_err(|err| GatewayError::execution_failed(format!("History unserializable: {err}")))?;
        let prompt = schema::render_summary_prompt(&blueprint.title, &history_json)
            .map_err(|err| GatewayError::execution_failed(format!("Summary prompt failed: {err}")))?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text { text: prompt }],
            }],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.generate_content(&self.settings.text_model, &body).await?;
        Ok(extract_text(response)?.trim().to_string())
    }
}

fn system_instruction() -> Content {
    Content {
        role: "system".to_string(),
        parts: vec![Part::Text {
            text: schema::SYSTEM_INSTRUCTION.to_string(),
        }],
    }
}

/// Builds the "interact" request payload shipped as the user turn.
fn interact_payload(request: &InteractRequest, window: usize) -> Value {
    json!({
        "mode": "interact",
        "character": request.character,
        "emotionState": request.emotion_state,
        "moodLabel": request.mood_label,
        "blueprintState": request.blueprint_state,
        "worldContext": request.world_context,
        "history": trailing(&request.history, window),
        "userMessage": request.message,
        "target": request.target,
    })
}

fn trailing(items: &[HistoryItem], window: usize) -> &[HistoryItem] {
    &items[items.len().saturating_sub(window)..]
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

impl GenerationConfig {
    fn structured(response_schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(response_schema),
            ..Self::default()
        }
    }

    fn speech(voice_name: &str) -> Self {
        Self {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice_name.to_string(),
                    },
                },
            }),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<ImageInstance>,
    parameters: ImageParameters,
}

#[derive(Serialize)]
struct ImageInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageParameters {
    sample_count: u32,
    aspect_ratio: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineDataResponse>,
}

#[derive(Deserialize)]
struct InlineDataResponse {
    data: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Option<Vec<Prediction>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            GatewayError::Parse("Gemini API returned no text in the response candidates".into())
        })
}

fn extract_inline_data(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .find_map(|part| part.inline_data.map(|inline| inline.data))
        })
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> GatewayError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GatewayError::Process {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date parsing is omitted for simplicity
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use inklore_core::gateway::MessageTarget;
    use inklore_core::story::{
        BlueprintState, Character, EmotionState, HistoryRole, WorldContext,
    };

    fn sample_request() -> InteractRequest {
        InteractRequest {
            character: Character {
                name: "Wren".to_string(),
                short_title: "the Patient Tinkerer".to_string(),
                description: "A careful builder.".to_string(),
                archetype: "The Maker".to_string(),
                traits: vec!["Curious".to_string()],
            },
            emotion_state: EmotionState {
                courage: 30.0,
                fear: 40.0,
                curiosity: 60.0,
                happiness: 15.0,
            },
            blueprint_state: BlueprintState {
                progress: 10.0,
                understanding: 20.0,
                complexity: 30.0,
            },
            world_context: WorldContext {
                world_name: "The Workshop".to_string(),
                world_description: "A cluttered bench.".to_string(),
                current_location_name: "The Drafting Corner".to_string(),
                current_location_description: "A stool and a lamp.".to_string(),
            },
            history: (0..8)
                .map(|i| HistoryItem::new(HistoryRole::User, format!("line {i}")))
                .collect(),
            message: "What do you remember?".to_string(),
            target: MessageTarget::Character,
            mood_label: "Uncertain".to_string(),
        }
    }

    #[test]
    fn test_interact_payload_truncates_history_window() {
        let payload = interact_payload(&sample_request(), 5);
        let history = payload["history"].as_array().unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0]["text"], "line 3");
        assert_eq!(payload["mode"], "interact");
        assert_eq!(payload["target"], "character");
        assert_eq!(payload["character"]["shortTitle"], "the Patient Tinkerer");
    }

    #[test]
    fn test_structured_generation_config_serializes_camel_case() {
        let config = GenerationConfig::structured(schema::init_response_schema());
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
        assert!(value.get("responseSchema").is_some());
        assert!(value.get("responseModalities").is_none());
    }

    #[test]
    fn test_speech_generation_config_requests_audio() {
        let config = GenerationConfig::speech("Kore");
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_extract_text_reads_first_text_part() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"ok\": true}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), r#"{"ok": true}"#);
    }

    #[test]
    fn test_extract_text_errors_on_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_extract_inline_data_reads_audio_payload() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"data": "QUJD"}}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_inline_data(response).unwrap(), "QUJD");
    }

    #[test]
    fn test_map_http_error_classifies_retryable_statuses() {
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, String::new(), None);
        assert!(err.is_retryable());

        let err = map_http_error(StatusCode::BAD_REQUEST, String::new(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_map_http_error_prefers_structured_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED: quota exhausted"));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let header = HeaderValue::from_static("30");
        assert_eq!(
            parse_retry_after(Some(&header)),
            Some(Duration::from_secs(30))
        );
        let header = HeaderValue::from_static("soon");
        assert_eq!(parse_retry_after(Some(&header)), None);
    }
}
