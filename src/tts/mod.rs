// src/tts/mod.rs
// TTS Module - prompt building, remote synthesis, payload decoding

mod gemini;
mod prompt;
mod types;

pub use gemini::{GeminiTtsAdapter, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::{build_prompt, intensity_adverb};
pub use types::{Emotion, RemoteFailure, SpeechError, VoiceSettings};

use crate::audio::{self, AudioBuffer};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One synthesis call: the finished prompt plus the remote voice preset.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub prompt: String,
    pub voice_name: String,
}

/// Remote TTS service returning base64 raw PCM.
#[async_trait]
pub trait SpeechAdapter: Send + Sync {
    /// Issue a single request and return the encoded audio payload
    async fn fetch_audio(&self, request: &SpeechRequest) -> Result<String, SpeechError>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Generate speech for `text` and decode it into a 24 kHz mono buffer.
///
/// Empty text fails before the adapter is touched. The remote call is bounded
/// by `deadline` and aborted as soon as `cancel` fires; there are no retries.
pub async fn synthesize(
    adapter: &dyn SpeechAdapter,
    text: &str,
    voice_name: &str,
    settings: &VoiceSettings,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<AudioBuffer, SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::EmptyText);
    }

    let request = SpeechRequest {
        prompt: build_prompt(text, settings),
        voice_name: voice_name.to_string(),
    };

    let payload = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::warn!("TTS: '{}' request cancelled", adapter.name());
            return Err(SpeechError::remote(RemoteFailure::Cancelled));
        }
        result = tokio::time::timeout(deadline, adapter.fetch_audio(&request)) => match result {
            Ok(payload) => payload?,
            Err(_) => {
                tracing::warn!(
                    "TTS: '{}' timed out after {}s",
                    adapter.name(),
                    deadline.as_secs_f32()
                );
                return Err(SpeechError::remote(RemoteFailure::Timeout));
            }
        },
    };

    let buffer = audio::decode_payload(&payload, audio::TTS_SAMPLE_RATE, audio::TTS_CHANNELS)?;

    tracing::info!(
        "TTS: '{}' produced {:.2}s of audio ({} samples)",
        adapter.name(),
        buffer.duration_secs,
        buffer.sample_count()
    );

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticAdapter {
        payload: Result<String, RemoteFailure>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StaticAdapter {
        fn returning(payload: &str) -> Self {
            Self {
                payload: Ok(payload.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechAdapter for StaticAdapter {
        async fn fetch_audio(&self, _request: &SpeechRequest) -> Result<String, SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.payload.clone().map_err(SpeechError::remote)
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_empty_text_skips_adapter() {
        let adapter = StaticAdapter::returning("AAAA");
        let cancel = CancellationToken::new();

        for text in ["", "   \n\t"] {
            let err = synthesize(&adapter, text, "Puck", &VoiceSettings::default(), DEADLINE, &cancel)
                .await
                .unwrap_err();
            assert!(matches!(err, SpeechError::EmptyText));
        }
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decodes_payload() {
        // 4 zero bytes -> 2 samples
        let adapter = StaticAdapter::returning("AAAAAA==");
        let buffer = synthesize(
            &adapter,
            "مرحبا",
            "Puck",
            &VoiceSettings::default(),
            DEADLINE,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(buffer.sample_rate, 24_000);
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frames(), 2);
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_odd_payload_is_truncated() {
        // 3 bytes
        let adapter = StaticAdapter::returning("AAAA");
        let err = synthesize(
            &adapter,
            "نص",
            "Kore",
            &VoiceSettings::default(),
            DEADLINE,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SpeechError::TruncatedPayload { len: 3 }));
    }

    #[tokio::test]
    async fn test_bad_base64() {
        let adapter = StaticAdapter::returning("not base64!");
        let err = synthesize(
            &adapter,
            "نص",
            "Kore",
            &VoiceSettings::default(),
            DEADLINE,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SpeechError::InvalidEncoding(_)));
    }

    #[tokio::test]
    async fn test_remote_failure_passes_through() {
        let adapter = StaticAdapter {
            payload: Err(RemoteFailure::RateLimited),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        };
        let err = synthesize(
            &adapter,
            "نص",
            "Kore",
            &VoiceSettings::default(),
            DEADLINE,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::RemoteServiceError {
                reason: RemoteFailure::RateLimited
            }
        ));
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expiry() {
        let adapter = StaticAdapter {
            payload: Ok("AAAA".to_string()),
            delay: Duration::from_secs(120),
            calls: AtomicUsize::new(0),
        };
        let err = synthesize(
            &adapter,
            "نص",
            "Kore",
            &VoiceSettings::default(),
            Duration::from_secs(1),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::RemoteServiceError {
                reason: RemoteFailure::Timeout
            }
        ));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let adapter = StaticAdapter {
            payload: Ok("AAAA".to_string()),
            delay: Duration::from_secs(120),
            calls: AtomicUsize::new(0),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = synthesize(
            &adapter,
            "نص",
            "Kore",
            &VoiceSettings::default(),
            DEADLINE,
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SpeechError::RemoteServiceError {
                reason: RemoteFailure::Cancelled
            }
        ));
    }
}
