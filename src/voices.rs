// Voice catalog and content-style presets

use crate::tts::{Emotion, VoiceSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: Gender,
    pub description: &'static str,
    pub preview_text: &'static str,
    /// Prebuilt voice preset name on the remote service
    pub gemini_voice_name: &'static str,
    pub tags: &'static [&'static str],
}

pub const VOICES: &[Voice] = &[
    Voice {
        id: "v1",
        name: "كريم",
        gender: Gender::Male,
        description: "حيوي، ودود، وشبابي",
        preview_text: "مرحباً بكم في منصة صوتك، حيث نحول كلماتكم إلى واقع مسموع.",
        gemini_voice_name: "Puck",
        tags: &["شبابي", "حيوي"],
    },
    Voice {
        id: "v2",
        name: "ليلى",
        gender: Gender::Female,
        description: "هادئة، رصينة، وواضحة",
        preview_text: "أهلاً بك، أنا ليلى، سأكون سعيدة بمساعدتك في تسجيل محتواك القادم.",
        gemini_voice_name: "Kore",
        tags: &["هادئ", "رسمي"],
    },
    Voice {
        id: "v3",
        name: "سامي",
        gender: Gender::Male,
        description: "واثق، إخباري، وقوي",
        preview_text: "إليكم آخر الأخبار والتطورات العالمية في موجزنا اليومي.",
        gemini_voice_name: "Charon",
        tags: &["إخباري", "واثق"],
    },
    Voice {
        id: "v4",
        name: "نور",
        gender: Gender::Female,
        description: "شبابية، مشرقة، وناعمة",
        preview_text: "يلا نبدأ مشروعنا الجديد اليوم بأفضل جودة صوت ممكنة!",
        gemini_voice_name: "Zephyr",
        tags: &["شبابي", "حماسي"],
    },
    Voice {
        id: "v5",
        name: "فارس",
        gender: Gender::Male,
        description: "قوي، حماسي، ومؤثر",
        preview_text: "لا تتنازل عن حلمك، النجاح يبدأ بخطوة واحدة واثقة.",
        gemini_voice_name: "Fenrir",
        tags: &["حماسي", "إعلاني"],
    },
];

pub fn find_voice(id: &str) -> Option<&'static Voice> {
    VOICES.iter().find(|v| v.id == id)
}

/// Catalog voice for `id`, or the first voice when the id is unknown.
pub fn voice_or_default(id: &str) -> &'static Voice {
    find_voice(id).unwrap_or(&VOICES[0])
}

/// Substring search over name and description, optionally narrowed by gender.
pub fn search_voices(query: &str, gender: Option<Gender>) -> Vec<&'static Voice> {
    let query = query.trim();
    VOICES
        .iter()
        .filter(|v| query.is_empty() || v.name.contains(query) || v.description.contains(query))
        .filter(|v| gender.map_or(true, |g| v.gender == g))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentStyle {
    #[serde(rename = "مخصص")]
    Custom,
    #[serde(rename = "إعلاني")]
    Advertising,
    #[serde(rename = "تعليمي")]
    Educational,
    #[serde(rename = "وثائقي")]
    Documentary,
    #[serde(rename = "بودكاست")]
    Podcast,
    #[serde(rename = "أخبار")]
    News,
    #[serde(rename = "سوشيال ميديا")]
    SocialMedia,
}

/// Partial settings a style overrides. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StylePreset {
    pub emotion: Option<Emotion>,
    pub emotion_level: Option<f32>,
    pub speed: Option<f32>,
    pub intensity: Option<f32>,
    pub voice_id: Option<&'static str>,
}

impl ContentStyle {
    pub const ALL: [ContentStyle; 7] = [
        ContentStyle::Custom,
        ContentStyle::Advertising,
        ContentStyle::Educational,
        ContentStyle::Documentary,
        ContentStyle::Podcast,
        ContentStyle::News,
        ContentStyle::SocialMedia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentStyle::Custom => "مخصص",
            ContentStyle::Advertising => "إعلاني",
            ContentStyle::Educational => "تعليمي",
            ContentStyle::Documentary => "وثائقي",
            ContentStyle::Podcast => "بودكاست",
            ContentStyle::News => "أخبار",
            ContentStyle::SocialMedia => "سوشيال ميديا",
        }
    }

    pub fn preset(&self) -> StylePreset {
        let preset = |emotion, level, speed, intensity, voice| StylePreset {
            emotion: Some(emotion),
            emotion_level: Some(level),
            speed: Some(speed),
            intensity: Some(intensity),
            voice_id: Some(voice),
        };

        match self {
            ContentStyle::Custom => StylePreset::default(),
            ContentStyle::Advertising => preset(Emotion::Enthusiastic, 90.0, 1.1, 85.0, "v5"),
            ContentStyle::Educational => preset(Emotion::Calm, 50.0, 0.95, 40.0, "v2"),
            ContentStyle::Documentary => preset(Emotion::Formal, 70.0, 0.85, 60.0, "v3"),
            ContentStyle::Podcast => preset(Emotion::Friendly, 60.0, 1.0, 50.0, "v4"),
            ContentStyle::News => preset(Emotion::Formal, 80.0, 1.0, 70.0, "v3"),
            ContentStyle::SocialMedia => preset(Emotion::Enthusiastic, 75.0, 1.05, 80.0, "v1"),
        }
    }

    /// Apply the preset to a voice id and settings pair. Pitch is never
    /// touched by a style.
    pub fn apply(&self, voice_id: &mut String, settings: &mut VoiceSettings) {
        let preset = self.preset();
        if let Some(id) = preset.voice_id {
            *voice_id = id.to_string();
        }
        if let Some(emotion) = preset.emotion {
            settings.emotion = emotion;
        }
        if let Some(level) = preset.emotion_level {
            settings.emotion_level = level;
        }
        if let Some(speed) = preset.speed {
            settings.speed = speed;
        }
        if let Some(intensity) = preset.intensity {
            settings.intensity = intensity;
        }
    }

    /// Lookup by Arabic label or English variant name (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL.into_iter().find(|style| {
            style.label() == trimmed || format!("{:?}", style).eq_ignore_ascii_case(trimmed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_lookup_falls_back_to_first() {
        assert_eq!(voice_or_default("v3").gemini_voice_name, "Charon");
        assert_eq!(voice_or_default("missing").id, "v1");
        assert_eq!(voice_or_default("v1").gemini_voice_name, "Puck");
    }

    #[test]
    fn test_search_and_filter() {
        let female = search_voices("", Some(Gender::Female));
        assert_eq!(
            female.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec!["v2", "v4"]
        );

        let by_description = search_voices("إخباري", None);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, "v3");

        assert!(search_voices("ليلى", Some(Gender::Male)).is_empty());
    }

    #[test]
    fn test_apply_advertising() {
        let mut voice_id = "v1".to_string();
        let mut settings = VoiceSettings {
            pitch: 1.3,
            ..VoiceSettings::default()
        };

        ContentStyle::Advertising.apply(&mut voice_id, &mut settings);

        assert_eq!(voice_id, "v5");
        assert_eq!(settings.emotion, Emotion::Enthusiastic);
        assert_eq!(settings.emotion_level, 90.0);
        assert_eq!(settings.speed, 1.1);
        assert_eq!(settings.intensity, 85.0);
        assert_eq!(settings.pitch, 1.3);
    }

    #[test]
    fn test_custom_changes_nothing() {
        let mut voice_id = "v4".to_string();
        let mut settings = VoiceSettings::default();
        ContentStyle::Custom.apply(&mut voice_id, &mut settings);
        assert_eq!(voice_id, "v4");
        assert_eq!(settings, VoiceSettings::default());
    }

    #[test]
    fn test_preset_voices_exist() {
        for style in ContentStyle::ALL {
            if let Some(id) = style.preset().voice_id {
                assert!(find_voice(id).is_some(), "{:?} -> {}", style, id);
            }
        }
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(ContentStyle::parse("news"), Some(ContentStyle::News));
        assert_eq!(ContentStyle::parse("بودكاست"), Some(ContentStyle::Podcast));
        assert_eq!(ContentStyle::parse("jazz"), None);
    }
}
