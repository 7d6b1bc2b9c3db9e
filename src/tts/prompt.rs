// Natural-language instruction sent with every synthesis request

use super::types::VoiceSettings;

/// Adverb for an emotion level, bucketed by `floor(level / 25) * 25`.
///
/// Steps, not a gradient: 24 is "quietly", 25 is "softly". Levels whose
/// bucket falls outside the table (and NaN) have no adverb.
pub fn intensity_adverb(level: f32) -> &'static str {
    // Anything in [100, 125) still buckets to 100
    if !(0.0..125.0).contains(&level) {
        return "";
    }

    let bucket = (level / 25.0).floor() as u32 * 25;
    match bucket {
        0 => "quietly",
        25 => "softly",
        50 => "",
        75 => "distinctly",
        100 => "very strongly",
        _ => "",
    }
}

/// Prompt for the voice model: tone line, style line, then the text.
pub fn build_prompt(text: &str, settings: &VoiceSettings) -> String {
    let adverb = intensity_adverb(settings.emotion_level);
    let tone = if adverb.is_empty() {
        settings.emotion.label().to_string()
    } else {
        format!("{} {}", settings.emotion.label(), adverb)
    };

    format!(
        "Act as a professional Arabic voice artist.\n\
        Tone: {}.\n\
        Style: Speak clearly, respect Arabic diacritics (Tashkeel) if present, and maintain appropriate pauses.\n\
        Text to speak: {}",
        tone, text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::types::Emotion;

    const ADVERBS: [&str; 5] = ["quietly", "softly", "", "distinctly", "very strongly"];

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(intensity_adverb(0.0), "quietly");
        assert_eq!(intensity_adverb(24.0), "quietly");
        assert_eq!(intensity_adverb(24.9), "quietly");
        assert_eq!(intensity_adverb(25.0), "softly");
        assert_eq!(intensity_adverb(49.0), "softly");
        assert_eq!(intensity_adverb(50.0), "");
        assert_eq!(intensity_adverb(74.0), "");
        assert_eq!(intensity_adverb(75.0), "distinctly");
        assert_eq!(intensity_adverb(90.0), "distinctly");
        assert_eq!(intensity_adverb(99.0), "distinctly");
        assert_eq!(intensity_adverb(100.0), "very strongly");
    }

    #[test]
    fn test_every_level_maps_to_known_adverb() {
        for level in 0..=100 {
            let adverb = intensity_adverb(level as f32);
            assert!(ADVERBS.contains(&adverb), "level {level} -> {adverb:?}");
        }
    }

    #[test]
    fn test_out_of_range_has_no_adverb() {
        assert_eq!(intensity_adverb(-1.0), "");
        assert_eq!(intensity_adverb(125.0), "");
        assert_eq!(intensity_adverb(f32::NAN), "");
        assert_eq!(intensity_adverb(f32::INFINITY), "");
        assert_eq!(intensity_adverb(f32::NEG_INFINITY), "");
        assert_eq!(intensity_adverb(1.0e30), "");
        assert_eq!(intensity_adverb(-1.0e30), "");
        assert_eq!(intensity_adverb(f32::MAX), "");
        assert_eq!(intensity_adverb(f32::MIN), "");
        assert_eq!(intensity_adverb(124.9), "very strongly");
    }

    #[test]
    fn test_huge_level_prompt_has_plain_tone() {
        let settings = VoiceSettings {
            emotion_level: f32::MAX,
            ..VoiceSettings::default()
        };
        let prompt = build_prompt("x", &settings);
        assert!(prompt.contains("Tone: محايد.\n"));
        assert!(prompt.ends_with("Text to speak: x"));
    }

    #[test]
    fn test_advertising_preset_prompt() {
        let settings = VoiceSettings {
            emotion: Emotion::Enthusiastic,
            emotion_level: 90.0,
            pitch: 1.0,
            speed: 1.1,
            intensity: 85.0,
        };
        let prompt = build_prompt("مرحبا", &settings);

        assert!(prompt.contains("Tone: حماسي distinctly."));
        assert!(!prompt.contains("very strongly"));
        assert!(prompt.ends_with("Text to speak: مرحبا"));
    }

    #[test]
    fn test_neutral_prompt_has_no_dangling_space() {
        let prompt = build_prompt("نص", &VoiceSettings::default());
        assert!(prompt.contains("Tone: محايد.\n"));
    }
}
