use crate::audio::{encode_wav, AudioBuffer};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

pub const DEFAULT_DOWNLOAD_TITLE: &str = "صوتك";

/// One finished generation: the decoded buffer and its WAV encoding.
#[derive(Debug, Clone)]
pub struct GeneratedClip {
    pub buffer: AudioBuffer,
    pub wav: Vec<u8>,
    pub voice_id: String,
}

impl GeneratedClip {
    pub fn new(buffer: AudioBuffer, voice_id: &str) -> Self {
        let wav = encode_wav(&buffer);
        Self {
            buffer,
            wav,
            voice_id: voice_id.to_string(),
        }
    }

    pub fn info(&self) -> ClipInfo {
        ClipInfo {
            voice_id: self.voice_id.clone(),
            duration_secs: self.buffer.duration_secs,
            sample_rate: self.buffer.sample_rate,
            channels: self.buffer.channel_count(),
            wav_bytes: self.wav.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipInfo {
    pub voice_id: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub wav_bytes: usize,
}

/// `<title>.wav`, falling back to the default title when blank. Characters
/// that cannot appear in a file name become `_`.
pub fn download_file_name(title: &str) -> String {
    static UNSAFE_RE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE_RE
        .get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("valid file name regex"));

    let trimmed = title.trim();
    let base = if trimmed.is_empty() {
        DEFAULT_DOWNLOAD_TITLE
    } else {
        trimmed
    };

    let cleaned = re.replace_all(base, "_");
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        format!("{}.wav", DEFAULT_DOWNLOAD_TITLE)
    } else {
        format!("{}.wav", cleaned)
    }
}
