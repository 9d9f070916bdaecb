//! Heuristic language detection.
//!
//! Script-range matches (dedicated Unicode blocks) take precedence over
//! roman-script keyword counting. This is a best-effort signal for prompt
//! building, not translation-grade detection.

use serde::{Deserialize, Serialize};

use crate::keywords;
use crate::matching::count_hits;

/// Detected language of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Tamil,
    Hindi,
    /// Romanized Tamil mixed with English, two or more keyword hits.
    Tanglish,
    /// A single romanized Tamil keyword hit.
    TanglishLight,
    /// Romanized Hindi mixed with English, two or more keyword hits.
    Hinglish,
    /// A single romanized Hindi keyword hit.
    HinglishLight,
    /// Hits in more than one roman keyword family.
    Mixed,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Tamil => "tamil",
            Language::Hindi => "hindi",
            Language::Tanglish => "tanglish",
            Language::TanglishLight => "tanglish_light",
            Language::Hinglish => "hinglish",
            Language::HinglishLight => "hinglish_light",
            Language::Mixed => "mixed",
            Language::Unknown => "unknown",
        }
    }
}

/// Detect the language of normalized text.
///
/// Layering: a Tamil or Devanagari script character decides immediately;
/// otherwise roman keyword hits are counted per family, with hits in both
/// families resolving to [`Language::Mixed`].
pub fn detect_language(t: &str) -> Language {
    if t.chars().any(is_tamil_char) {
        return Language::Tamil;
    }
    if t.chars().any(is_devanagari_char) {
        return Language::Hindi;
    }

    let tamil_hits = count_hits(t, keywords::TAMIL_ROMAN);
    let hindi_hits = count_hits(t, keywords::HINDI_ROMAN);

    match (tamil_hits, hindi_hits) {
        (t, h) if t > 0 && h > 0 => Language::Mixed,
        (t, _) if t >= 2 => Language::Tanglish,
        (1, _) => Language::TanglishLight,
        (_, h) if h >= 2 => Language::Hinglish,
        (_, 1) => Language::HinglishLight,
        _ => Language::English,
    }
}

fn is_tamil_char(c: char) -> bool {
    ('\u{0B80}'..='\u{0BFF}').contains(&c)
}

fn is_devanagari_char(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tamil_script_wins_over_roman_hits() {
        assert_eq!(detect_language("வணக்கம் bhai"), Language::Tamil);
    }

    #[test]
    fn test_devanagari_script() {
        assert_eq!(detect_language("क्या हाल है"), Language::Hindi);
    }

    #[test]
    fn test_plain_english() {
        assert_eq!(
            detect_language("see you at the office tomorrow"),
            Language::English
        );
    }

    #[test]
    fn test_tanglish_two_hits() {
        assert_eq!(detect_language("semma scene machi"), Language::Tanglish);
    }

    #[test]
    fn test_tanglish_light_single_hit() {
        assert_eq!(detect_language("ok machi see you"), Language::TanglishLight);
    }

    #[test]
    fn test_hinglish_two_hits() {
        assert_eq!(detect_language("kya bol raha hai bhai"), Language::Hinglish);
    }

    #[test]
    fn test_mixed_when_both_families_hit() {
        assert_eq!(detect_language("machi kya plan"), Language::Mixed);
    }
}
