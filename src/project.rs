// Saved projects: a flat JSON list under a fixed storage key

use crate::tts::VoiceSettings;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STORAGE_KEY: &str = "sawtak_projects";
pub const DRAFT_ID: &str = "temp";
pub const DEFAULT_TITLE: &str = "مشروع جديد";
const ID_LEN: usize = 9;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read projects: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write projects: {0}")]
    Write(#[source] std::io::Error),

    #[error("Stored projects are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub text: String,
    pub voice_id: String,
    pub settings: VoiceSettings,
    /// Epoch milliseconds
    pub created_at: i64,
}

impl Project {
    /// The unsaved project the editor opens with.
    pub fn new_draft() -> Self {
        Self {
            id: DRAFT_ID.to_string(),
            title: DEFAULT_TITLE.to_string(),
            text: String::new(),
            voice_id: crate::voices::VOICES[0].id.to_string(),
            settings: VoiceSettings::default(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Rough spoken length shown in the projects list.
    pub fn estimated_seconds(&self) -> usize {
        self.text.chars().count().div_ceil(10)
    }
}

/// Project list persisted as `<dir>/sawtak_projects.json`.
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectStore {
    /// Load the store from `dir`. A missing file is an empty list.
    pub fn open(dir: &Path) -> Result<Self, ProjectError> {
        let path = dir.join(format!("{}.json", STORAGE_KEY));
        let projects = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(ProjectError::Read)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Vec::new()
        };

        tracing::info!("Loaded {} projects from {}", projects.len(), path.display());
        Ok(Self { path, projects })
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Insert or replace by id. A project whose id is not stored yet (the
    /// draft included) is added under a fresh id. Returns the stored project.
    pub fn save(&mut self, project: &Project) -> Result<Project, ProjectError> {
        let mut stored = project.clone();
        stored.settings = stored.settings.clamped();

        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = stored.clone(),
            None => {
                stored.id = new_project_id();
                self.projects.push(stored.clone());
            }
        }

        self.persist()?;
        tracing::info!("Saved project {} ('{}')", stored.id, stored.title);
        Ok(stored)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), ProjectError> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            return Err(ProjectError::NotFound(id.to_string()));
        }

        self.persist()?;
        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    fn persist(&self) -> Result<(), ProjectError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(ProjectError::Write)?;
        }
        let json = serde_json::to_string(&self.projects)?;
        fs::write(&self.path, json).map_err(ProjectError::Write)
    }
}

fn new_project_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::Emotion;

    #[test]
    fn test_draft_defaults() {
        let draft = Project::new_draft();
        assert_eq!(draft.id, DRAFT_ID);
        assert_eq!(draft.title, DEFAULT_TITLE);
        assert_eq!(draft.voice_id, "v1");
        assert_eq!(draft.settings.emotion, Emotion::Neutral);
        assert_eq!(draft.word_count(), 0);
    }

    #[test]
    fn test_word_count_and_estimate() {
        let mut project = Project::new_draft();
        project.text = "  مرحبا   بكم\nفي صوتك ".to_string();
        assert_eq!(project.word_count(), 4);

        project.text = "a".repeat(21);
        assert_eq!(project.estimated_seconds(), 3);
    }

    #[test]
    fn test_legacy_json_shape() {
        let raw = r#"[{
            "id": "k3j2h1g0f",
            "title": "إعلان",
            "text": "نص",
            "voiceId": "v5",
            "settings": {"emotion": "حماسي", "emotionLevel": 90, "pitch": 1, "speed": 1.1, "intensity": 85},
            "createdAt": 1718000000000,
            "audioUrl": "blob:ignored"
        }]"#;
        let projects: Vec<Project> = serde_json::from_str(raw).unwrap();
        assert_eq!(projects[0].settings.emotion, Emotion::Enthusiastic);
        assert_eq!(projects[0].settings.emotion_level, 90.0);
        assert_eq!(projects[0].voice_id, "v5");
    }
}
