pub mod audio;
pub mod config;
pub mod project;
pub mod session;
pub mod tts;
pub mod voices;

mod cli;

pub use cli::run;

use config::AppConfig;
use project::{Project, ProjectError, ProjectStore};
use session::{GenerationSession, SessionError, VoicePreview};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tts::{GeminiTtsAdapter, SpeechAdapter};
use voices::ContentStyle;

/// Everything the studio front end talks to: config, saved projects, the
/// editor generation session.
pub struct Studio {
    data_dir: PathBuf,
    config: AppConfig,
    projects: ProjectStore,
    adapter: Arc<dyn SpeechAdapter>,
    session: GenerationSession,
}

impl Studio {
    /// Load config and projects from `data_dir` and build the Gemini adapter.
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let config = config::load_or_create(data_dir).map_err(anyhow::Error::msg)?;
        let adapter = build_adapter(&config);
        Self::with_adapter(data_dir, config, adapter)
    }

    /// Same as [`Studio::open`] with a caller-supplied speech adapter.
    pub fn with_adapter(
        data_dir: &Path,
        config: AppConfig,
        adapter: Arc<dyn SpeechAdapter>,
    ) -> anyhow::Result<Self> {
        let projects = ProjectStore::open(data_dir)?;
        let session = GenerationSession::new(adapter.clone(), config.request_timeout());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config,
            projects,
            adapter,
            session,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Persist new settings and rebuild the adapter from them.
    pub fn update_config(&mut self, config: AppConfig) -> anyhow::Result<()> {
        config::save(&self.data_dir, &config).map_err(anyhow::Error::msg)?;
        self.adapter = build_adapter(&config);
        self.session = GenerationSession::new(self.adapter.clone(), config.request_timeout());
        self.config = config;
        Ok(())
    }

    pub fn session(&self) -> &GenerationSession {
        &self.session
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.list()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn save_project(&mut self, project: &Project) -> Result<Project, ProjectError> {
        self.projects.save(project)
    }

    pub fn delete_project(&mut self, id: &str) -> Result<(), ProjectError> {
        self.projects.delete(id)
    }

    /// Fresh editor project using the configured default voice.
    pub fn new_project(&self) -> Project {
        let mut project = Project::new_draft();
        project.voice_id = self.config.default_voice_id.clone();
        project
    }

    pub fn apply_style(&self, project: &mut Project, style: ContentStyle) {
        style.apply(&mut project.voice_id, &mut project.settings);
    }

    pub async fn generate(
        &self,
        project: &Project,
        cancel: &CancellationToken,
    ) -> Result<Arc<session::GeneratedClip>, SessionError> {
        self.session.generate(project, cancel).await
    }

    /// Write the current clip into `dir`, else the configured output
    /// directory, else the working directory.
    pub fn download(&self, title: &str, dir: Option<&Path>) -> Result<PathBuf, SessionError> {
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        self.session.download(title, &dir)
    }

    pub fn preview_player<S: audio::PlaybackSink>(&self, sink: S) -> VoicePreview<S> {
        VoicePreview::new(self.adapter.clone(), self.config.request_timeout(), sink)
    }
}

fn build_adapter(config: &AppConfig) -> Arc<dyn SpeechAdapter> {
    let api_key = config.api_key().unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!(
            "Gemini API key missing; set {} or run `config set-key`",
            config::API_KEY_ENV
        );
    }

    Arc::new(
        GeminiTtsAdapter::with_timeout(api_key, config.request_timeout())
            .model(config.model.clone())
            .base_url(config.api_base_url.clone()),
    )
}
