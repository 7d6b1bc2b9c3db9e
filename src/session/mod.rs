use crate::project::Project;
use crate::tts::{self, SpeechAdapter, SpeechError};
use crate::voices;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub mod clip;
pub mod preview;

pub use clip::{download_file_name, ClipInfo, GeneratedClip};
pub use preview::VoicePreview;

/// Shown to the user for any failed generation.
pub const GENERATION_FAILED_MESSAGE: &str =
    "حدث خطأ أثناء توليد الصوت. يرجى التحقق من مفتاح API والمحاولة مرة أخرى.";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A generation is already in progress")]
    GenerationInProgress,

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("Nothing has been generated yet")]
    NoClip,

    #[error("Failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Localized text for the user-visible error path.
    pub fn user_message(&self) -> &'static str {
        match self {
            SessionError::GenerationInProgress => "جاري توليد الصوت، يرجى الانتظار.",
            SessionError::NoClip => "لا يوجد صوت للتحميل بعد.",
            SessionError::Speech(_) | SessionError::Io(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}

/// Clears the in-flight flag however the generation ends, including when the
/// future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Editor generation state: one in-flight request at most, and only the
/// latest clip kept alive.
pub struct GenerationSession {
    adapter: Arc<dyn SpeechAdapter>,
    deadline: Duration,
    in_flight: AtomicBool,
    current: Mutex<Option<Arc<GeneratedClip>>>,
}

impl GenerationSession {
    pub fn new(adapter: Arc<dyn SpeechAdapter>, deadline: Duration) -> Self {
        Self {
            adapter,
            deadline,
            in_flight: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Generate audio for the project's text with its voice and settings.
    ///
    /// The previous clip is released before the request goes out, so a failed
    /// attempt leaves nothing behind.
    pub async fn generate(
        &self,
        project: &Project,
        cancel: &CancellationToken,
    ) -> Result<Arc<GeneratedClip>, SessionError> {
        if project.text.trim().is_empty() {
            return Err(SpeechError::EmptyText.into());
        }

        let _guard = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            tracing::warn!("Generation requested while another is running");
            SessionError::GenerationInProgress
        })?;

        self.clear();

        let voice = voices::voice_or_default(&project.voice_id);
        tracing::info!(
            "Generating '{}' with voice {} ({}), {} words",
            project.title,
            voice.id,
            voice.gemini_voice_name,
            project.word_count()
        );

        let buffer = tts::synthesize(
            self.adapter.as_ref(),
            &project.text,
            voice.gemini_voice_name,
            &project.settings.clamped(),
            self.deadline,
            cancel,
        )
        .await
        .map_err(|e| {
            tracing::error!("Generation failed: {}", e);
            e
        })?;

        let clip = Arc::new(GeneratedClip::new(buffer, voice.id));
        *self.slot() = Some(clip.clone());
        Ok(clip)
    }

    pub fn current(&self) -> Option<Arc<GeneratedClip>> {
        self.slot().clone()
    }

    /// Drop the current clip.
    pub fn clear(&self) {
        if self.slot().take().is_some() {
            tracing::debug!("Released previous clip");
        }
    }

    /// The clip slot holds a plain `Option`, so a poisoned lock is still
    /// consistent and is recovered.
    fn slot(&self) -> MutexGuard<'_, Option<Arc<GeneratedClip>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the current clip to `<dir>/<title>.wav`.
    pub fn download(&self, title: &str, dir: &Path) -> Result<PathBuf, SessionError> {
        let clip = self.current().ok_or(SessionError::NoClip)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(download_file_name(title));
        fs::write(&path, &clip.wav)?;
        tracing::info!("Wrote {} bytes to {}", clip.wav.len(), path.display());
        Ok(path)
    }
}
