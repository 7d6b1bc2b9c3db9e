// src/tts/types.rs
// TTS types and error definitions

use crate::audio::DecodeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tone requested from the voice model. Serialized with the Arabic labels the
/// studio has always stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "محايد")]
    Neutral,
    #[serde(rename = "حماسي")]
    Enthusiastic,
    #[serde(rename = "هادئ")]
    Calm,
    #[serde(rename = "رسمي")]
    Formal,
    #[serde(rename = "ودود")]
    Friendly,
    #[serde(rename = "حزين")]
    Sad,
    #[serde(rename = "واثق")]
    Confident,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Enthusiastic,
        Emotion::Calm,
        Emotion::Formal,
        Emotion::Friendly,
        Emotion::Sad,
        Emotion::Confident,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Neutral => "محايد",
            Emotion::Enthusiastic => "حماسي",
            Emotion::Calm => "هادئ",
            Emotion::Formal => "رسمي",
            Emotion::Friendly => "ودود",
            Emotion::Sad => "حزين",
            Emotion::Confident => "واثق",
        }
    }

    /// Lookup by Arabic label or English variant name (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL.into_iter().find(|emotion| {
            emotion.label() == trimmed || format!("{:?}", emotion).eq_ignore_ascii_case(trimmed)
        })
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Voice controls exposed by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    pub emotion: Emotion,
    /// 0-100
    pub emotion_level: f32,
    /// 0.5-1.5
    pub pitch: f32,
    /// 0.5-2.0
    pub speed: f32,
    /// 0-100
    pub intensity: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            emotion_level: 50.0,
            pitch: 1.0,
            speed: 1.0,
            intensity: 50.0,
        }
    }
}

impl VoiceSettings {
    /// Clamp every control into its slider range. Non-finite values fall back
    /// to the defaults.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let fit = |value: f32, min: f32, max: f32, fallback: f32| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };

        Self {
            emotion: self.emotion,
            emotion_level: fit(self.emotion_level, 0.0, 100.0, defaults.emotion_level),
            pitch: fit(self.pitch, 0.5, 1.5, defaults.pitch),
            speed: fit(self.speed, 0.5, 2.0, defaults.speed),
            intensity: fit(self.intensity, 0.0, 100.0, defaults.intensity),
        }
    }
}

/// Why the remote call failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteFailure {
    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("API key missing")]
    MissingApiKey,

    #[error("authentication failed")]
    Unauthorized,

    #[error("quota or rate limit exceeded")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unreadable response: {0}")]
    MalformedResponse(String),
}

/// Speech generation errors. Every variant ends the current attempt; none are
/// retried.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Text to speak is empty")]
    EmptyText,

    #[error("No audio data returned from API")]
    MissingAudioData,

    #[error("Remote service error: {reason}")]
    RemoteServiceError { reason: RemoteFailure },

    #[error("Invalid audio encoding: {0}")]
    InvalidEncoding(String),

    #[error("Truncated audio payload ({len} bytes)")]
    TruncatedPayload { len: usize },
}

impl SpeechError {
    pub fn remote(reason: RemoteFailure) -> Self {
        SpeechError::RemoteServiceError { reason }
    }
}

impl From<DecodeError> for SpeechError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidEncoding(detail) => SpeechError::InvalidEncoding(detail),
            DecodeError::TruncatedPayload { len } => SpeechError::TruncatedPayload { len },
        }
    }
}
