use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tts::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const CONFIG_DIR: &str = "voice-studio";
const CONFIG_FILE: &str = "config.json";
const API_KEY_XOR_KEY: &[u8] = b"sawtak-local-key-v1";
const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_VOICE_ID: &str = "v1";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub user_name: String,
    pub gemini_api_key_obfuscated: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_voice_id: String,
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            gemini_api_key_obfuscated: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
            output_dir: None,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(normalize_timeout(self.request_timeout_secs))
    }

    /// Environment key first, then the stored one.
    pub fn api_key(&self) -> Option<String> {
        [API_KEY_ENV, LEGACY_API_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .or_else(|| decode_api_key(self))
    }

    pub fn set_api_key(&mut self, api_key: &str) {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            self.gemini_api_key_obfuscated = None;
        } else {
            self.gemini_api_key_obfuscated = Some(obfuscate_api_key(trimmed));
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub user_name: String,
    pub has_api_key: bool,
    pub api_key_masked: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_voice_id: String,
    pub output_dir: Option<PathBuf>,
}

pub fn summary(config: &AppConfig) -> ConfigSummary {
    let key = config.api_key();
    ConfigSummary {
        user_name: config.user_name.clone(),
        has_api_key: key.is_some(),
        api_key_masked: key.map(|k| mask_api_key(&k)),
        model: config.model.clone(),
        api_base_url: config.api_base_url.clone(),
        request_timeout_secs: normalize_timeout(config.request_timeout_secs),
        default_voice_id: config.default_voice_id.clone(),
        output_dir: config.output_dir.clone(),
    }
}

/// Per-user data directory, `<data_dir>/voice-studio`.
pub fn default_dir() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join(CONFIG_DIR))
        .ok_or_else(|| "Failed to resolve data dir".to_string())
}

pub fn normalize_timeout(secs: u64) -> u64 {
    if secs == 0 {
        DEFAULT_TIMEOUT_SECS
    } else {
        secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS)
    }
}

pub fn normalize_voice_id(input: &str) -> String {
    let trimmed = input.trim();
    if crate::voices::find_voice(trimmed).is_some() {
        trimmed.to_string()
    } else {
        DEFAULT_VOICE_ID.to_string()
    }
}

pub fn load_or_create(dir: &Path) -> Result<AppConfig, String> {
    let path = config_path(dir)?;
    if !path.exists() {
        let config = AppConfig::default();
        save_raw(&path, &config)?;
        return Ok(config);
    }

    let raw = fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
    match serde_json::from_str::<AppConfig>(&raw) {
        Ok(mut config) => {
            normalize_config(&mut config);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("Config unreadable ({}), resetting to defaults", e);
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(&path, backup);
            let config = AppConfig::default();
            save_raw(&path, &config)?;
            Ok(config)
        }
    }
}

pub fn save(dir: &Path, config: &AppConfig) -> Result<(), String> {
    let path = config_path(dir)?;
    save_raw(&path, config)
}

pub fn decode_api_key(config: &AppConfig) -> Option<String> {
    config
        .gemini_api_key_obfuscated
        .as_deref()
        .and_then(deobfuscate_api_key)
}

fn config_path(dir: &Path) -> Result<PathBuf, String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
    Ok(dir.join(CONFIG_FILE))
}

fn save_raw(path: &Path, config: &AppConfig) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to save config: {}", e))
}

fn normalize_config(config: &mut AppConfig) {
    config.user_name = config.user_name.trim().to_string();
    config.request_timeout_secs = normalize_timeout(config.request_timeout_secs);
    config.default_voice_id = normalize_voice_id(&config.default_voice_id);
    if config.model.trim().is_empty() {
        config.model = DEFAULT_MODEL.to_string();
    }
    if config.api_base_url.trim().is_empty() {
        config.api_base_url = DEFAULT_BASE_URL.to_string();
    }
}

fn obfuscate_api_key(api_key: &str) -> String {
    let mut bytes = api_key.as_bytes().to_vec();
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte ^= API_KEY_XOR_KEY[idx % API_KEY_XOR_KEY.len()];
    }
    BASE64_STANDARD.encode(bytes)
}

fn deobfuscate_api_key(obfuscated: &str) -> Option<String> {
    let mut bytes = BASE64_STANDARD.decode(obfuscated).ok()?;
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte ^= API_KEY_XOR_KEY[idx % API_KEY_XOR_KEY.len()];
    }
    String::from_utf8(bytes).ok()
}

fn mask_api_key(api_key: &str) -> String {
    if api_key.len() <= 10 || !api_key.is_ascii() {
        return "******".to_string();
    }

    let prefix = &api_key[..6];
    let suffix = &api_key[api_key.len().saturating_sub(4)..];
    format!("{}********{}", prefix, suffix)
}
