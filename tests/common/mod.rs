//! Shared helpers for voice-studio integration tests.
//!
//! Provides a mock Gemini TTS endpoint and payload builders so tests never
//! touch the real service.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use voice_studio_lib::tts::{GeminiTtsAdapter, DEFAULT_MODEL};

pub const TEST_KEY: &str = "test-key";

/// Little-endian 16-bit PCM bytes for the given samples.
pub fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// A generateContent response carrying `bytes` as inline audio.
pub fn audio_response(bytes: &[u8]) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{
                    "inlineData": {
                        "mimeType": "audio/L16;codec=pcm;rate=24000",
                        "data": BASE64_STANDARD.encode(bytes)
                    }
                }]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn endpoint_path() -> String {
    format!("/v1beta/models/{}:generateContent", DEFAULT_MODEL)
}

/// Start a server answering every generateContent call with `response`.
pub async fn mock_gemini(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint_path()))
        .and(query_param("key", TEST_KEY))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

pub fn adapter_for(server: &MockServer) -> GeminiTtsAdapter {
    GeminiTtsAdapter::new(TEST_KEY.to_string()).base_url(server.uri())
}
