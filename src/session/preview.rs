use super::SessionError;
use crate::audio::{PlaybackError, PlaybackSink, PreviewPlayer};
use crate::tts::{self, SpeechAdapter, VoiceSettings};
use crate::voices::Voice;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Voice-library previews: speak a voice's sample sentence with neutral
/// settings, never overlapping two previews.
pub struct VoicePreview<S: PlaybackSink> {
    adapter: Arc<dyn SpeechAdapter>,
    deadline: Duration,
    player: PreviewPlayer<S>,
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error(transparent)]
    Generation(#[from] SessionError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl<S: PlaybackSink> VoicePreview<S> {
    pub fn new(adapter: Arc<dyn SpeechAdapter>, deadline: Duration, sink: S) -> Self {
        Self {
            adapter,
            deadline,
            player: PreviewPlayer::new(sink),
        }
    }

    /// Stop whatever is playing, synthesize the preview and start it.
    /// Returns the preview duration in seconds.
    pub async fn preview(
        &mut self,
        voice: &Voice,
        cancel: &CancellationToken,
    ) -> Result<f64, PreviewError> {
        self.player.stop();

        let buffer = tts::synthesize(
            self.adapter.as_ref(),
            voice.preview_text,
            voice.gemini_voice_name,
            &VoiceSettings::default(),
            self.deadline,
            cancel,
        )
        .await
        .map_err(SessionError::from)?;

        self.player.play(&buffer)?;
        tracing::info!(
            "Previewing voice {} ({:.2}s)",
            voice.id,
            buffer.duration_secs
        );
        Ok(buffer.duration_secs)
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn player(&self) -> &PreviewPlayer<S> {
        &self.player
    }
}
