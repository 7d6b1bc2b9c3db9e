// src/tts/gemini.rs
// Google Gemini TTS adapter

use super::types::{RemoteFailure, SpeechError};
use super::{SpeechAdapter, SpeechRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type", default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}

impl GeminiResponse {
    /// First inline payload in the first candidate. Later candidates are
    /// never consulted.
    fn into_audio_payload(self) -> Option<InlineData> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.inline_data)
            .filter(|d| !d.data.is_empty())
    }
}

pub struct GeminiTtsAdapter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTtsAdapter {
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(TIMEOUT_SECS))
    }

    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        tracing::info!("Gemini TTS adapter initialized (timeout {}s)", timeout.as_secs());

        Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if !base_url.trim().is_empty() {
            self.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl SpeechAdapter for GeminiTtsAdapter {
    async fn fetch_audio(&self, request: &SpeechRequest) -> Result<String, SpeechError> {
        if self.api_key.trim().is_empty() {
            return Err(SpeechError::remote(RemoteFailure::MissingApiKey));
        }

        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: &request.voice_name,
                        },
                    },
                },
            },
        };

        tracing::info!(
            "Gemini TTS: requesting voice '{}' from {}",
            request.voice_name,
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::remote(RemoteFailure::Timeout)
                } else {
                    SpeechError::remote(RemoteFailure::Network(e.without_url().to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match status.as_u16() {
                401 | 403 => RemoteFailure::Unauthorized,
                429 => RemoteFailure::RateLimited,
                code => RemoteFailure::Http {
                    status: code,
                    body: response.text().await.unwrap_or_default(),
                },
            };
            tracing::error!("Gemini TTS {}: {}", status, reason);
            return Err(SpeechError::remote(reason));
        }

        let gemini: GeminiResponse = response.json().await.map_err(|e| {
            SpeechError::remote(RemoteFailure::MalformedResponse(e.without_url().to_string()))
        })?;

        let inline = gemini
            .into_audio_payload()
            .ok_or(SpeechError::MissingAudioData)?;

        tracing::info!(
            "Gemini TTS: received {} base64 chars ({})",
            inline.data.len(),
            if inline.mime_type.is_empty() {
                "no mime type"
            } else {
                inline.mime_type.as_str()
            }
        );

        Ok(inline.data)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: "Kore" },
                    },
                },
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_first_inline_payload_wins() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [
                    {"text": "thinking"},
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}},
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "BBBB"}}
                ]}},
                {"content": {"parts": [
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "CCCC"}}
                ]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let inline = response.into_audio_payload().unwrap();
        assert_eq!(inline.data, "AAAA");
    }

    #[test]
    fn test_later_candidates_ignored() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "no audio here"}]}},
                {"content": {"parts": [
                    {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA"}}
                ]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert!(response.into_audio_payload().is_none());

        let empty_first = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "audio/L16", "data": ""}},
            {"inlineData": {"mimeType": "audio/L16", "data": "AAAA"}}
        ]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(empty_first).unwrap();
        assert!(response.into_audio_payload().is_none());
    }

    #[test]
    fn test_no_inline_payload() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "no audio"}]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert!(response.into_audio_payload().is_none());

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_audio_payload().is_none());
    }

    #[test]
    fn test_builder_trims_base_url() {
        let adapter = GeminiTtsAdapter::new("key".to_string())
            .base_url("http://127.0.0.1:9000/")
            .model("  ");
        assert_eq!(
            adapter.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"
        );
    }
}
