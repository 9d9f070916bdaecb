//! Personality and learned-style data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A tenant's personality: manual traits plus whatever the trainer learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    /// Base tone ("casual", "warm", ...).
    pub tone: String,
    /// Typical reply length in words.
    pub avg_length: u32,
    /// Whether replies should use emojis at all.
    pub use_emoji: bool,
    /// 0 = maximally casual, 100 = maximally formal.
    pub formality: u8,
    /// Manually configured example phrases.
    pub example_phrases: Vec<String>,
    /// Style learned from message history. Replaced wholesale per training
    /// run, never merged incrementally.
    pub learned: LearnedStyle,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            tone: "casual".to_string(),
            avg_length: 15,
            use_emoji: true,
            formality: 50,
            example_phrases: Vec::new(),
            learned: LearnedStyle::default(),
        }
    }
}

/// Global style patterns extracted from a tenant's outgoing messages.
///
/// Every field defaults to empty so a partially filled model response
/// deserializes cleanly - the trainer never fabricates missing patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedStyle {
    pub greetings: Vec<String>,
    pub affirmatives: Vec<String>,
    pub negatives: Vec<String>,
    pub fillers: Vec<String>,
    pub closings: Vec<String>,
    pub emoji_favorites: Vec<String>,
    pub avg_word_count: Option<f64>,
    pub detected_languages: Vec<String>,
    pub primary_language: Option<String>,
    pub language_mix: Option<String>,
    pub tone_summary: Option<String>,
    pub signature_phrases: Vec<String>,
    pub abbreviation_style: Option<String>,
    pub code_switching_pattern: Option<String>,
    /// Per-contact style, keyed by normalized contact key.
    pub per_contact: BTreeMap<String, ContactStyle>,
    pub contacts_analyzed: u32,
    /// Set when the trainer fell back to local statistics because the
    /// model call failed. Carries the failure reason for diagnostics.
    pub fallback_reason: Option<String>,
}

impl LearnedStyle {
    /// Parse a learned style from its stored JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// True when no global pattern was learned at all.
    pub fn is_empty(&self) -> bool {
        self.greetings.is_empty()
            && self.affirmatives.is_empty()
            && self.negatives.is_empty()
            && self.fillers.is_empty()
            && self.closings.is_empty()
            && self.emoji_favorites.is_empty()
            && self.signature_phrases.is_empty()
            && self.tone_summary.is_none()
            && self.language_mix.is_none()
    }

    /// Look up the per-contact style for a display name.
    ///
    /// Tries the exact normalized key first, then falls back to substring
    /// matching against keys and stored contact names. The fuzzy path can
    /// collide for similarly named contacts; see DESIGN.md.
    pub fn contact_style(&self, contact_name: &str) -> Option<&ContactStyle> {
        let key = contact_key(contact_name);
        if let Some(style) = self.per_contact.get(&key) {
            return Some(style);
        }

        let name_lower = contact_name.trim().to_lowercase();
        if name_lower.is_empty() {
            return None;
        }
        self.per_contact.iter().find_map(|(k, style)| {
            let stored_name = style.contact_name.to_lowercase();
            if k.contains(&name_lower)
                || name_lower.contains(k.as_str())
                || (!stored_name.is_empty() && stored_name.contains(&name_lower))
            {
                Some(style)
            } else {
                None
            }
        })
    }

    /// Render the learned patterns as prompt context lines.
    pub fn context_block(&self) -> String {
        let mut out = String::new();
        push_list(&mut out, "How you greet people", &self.greetings);
        push_list(&mut out, "How you say yes/agree", &self.affirmatives);
        push_list(&mut out, "How you say no/disagree", &self.negatives);
        push_list(&mut out, "Filler words you use", &self.fillers);
        push_list(&mut out, "How you end chats", &self.closings);
        if !self.emoji_favorites.is_empty() {
            out.push_str(&format!(
                "\n- Your favorite emojis: {}",
                self.emoji_favorites.join(" ")
            ));
        }
        push_list(&mut out, "Signature phrases", &self.signature_phrases);
        push_opt(&mut out, "Language style", &self.language_mix);
        push_opt(&mut out, "Overall tone", &self.tone_summary);
        push_opt(&mut out, "Abbreviation style", &self.abbreviation_style);
        push_list(&mut out, "Languages you speak", &self.detected_languages);
        push_opt(&mut out, "Your primary language", &self.primary_language);
        push_opt(
            &mut out,
            "Code-switching habit",
            &self.code_switching_pattern,
        );
        out
    }
}

/// How the tenant talks to one specific contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactStyle {
    pub tone: Option<String>,
    pub language: Option<String>,
    pub emoji_usage: Option<String>,
    pub sample_replies: Vec<String>,
    pub relationship_hint: Option<String>,
    pub unique_patterns: Option<String>,
    pub contact_name: String,
    pub messages_analyzed: u32,
}

impl ContactStyle {
    /// Render the per-contact patterns as prompt context lines.
    pub fn context_block(&self, display_name: &str) -> String {
        let mut out = format!("\n\nHOW YOU SPECIFICALLY TALK TO {}:", display_name);
        push_opt(&mut out, "Your tone with them", &self.tone);
        if !self.sample_replies.is_empty() {
            out.push_str(&format!(
                "\n- Example replies to them: \"{}\"",
                self.sample_replies.join("\", \"")
            ));
        }
        push_opt(&mut out, "Language with them", &self.language);
        push_opt(&mut out, "Emoji usage with them", &self.emoji_usage);
        push_opt(&mut out, "Unique to them", &self.unique_patterns);
        out
    }
}

/// Normalize a contact display name into a per-contact map key.
pub fn contact_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        out.push_str(&format!("\n- {}: {}", label, items.join(", ")));
    }
}

fn push_opt(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            out.push_str(&format!("\n- {}: {}", label, v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_key_normalization() {
        assert_eq!(contact_key("Rahul Bhaiya"), "rahul_bhaiya");
        assert_eq!(contact_key("  Sam  "), "sam");
    }

    #[test]
    fn test_learned_style_from_partial_json() {
        let style = LearnedStyle::from_json(r#"{"greetings": ["yo", "oyee"]}"#).unwrap();
        assert_eq!(style.greetings, vec!["yo", "oyee"]);
        assert!(style.affirmatives.is_empty());
        assert!(style.tone_summary.is_none());
    }

    #[test]
    fn test_contact_style_exact_key() {
        let mut style = LearnedStyle::default();
        style.per_contact.insert(
            "rahul_bhaiya".to_string(),
            ContactStyle {
                contact_name: "Rahul Bhaiya".to_string(),
                ..Default::default()
            },
        );
        assert!(style.contact_style("Rahul Bhaiya").is_some());
    }

    #[test]
    fn test_contact_style_fuzzy_fallback() {
        let mut style = LearnedStyle::default();
        style.per_contact.insert(
            "rahul_bhaiya".to_string(),
            ContactStyle {
                contact_name: "Rahul Bhaiya".to_string(),
                ..Default::default()
            },
        );
        // Platform metadata sometimes carries only part of the saved name.
        assert!(style.contact_style("Rahul").is_some());
        assert!(style.contact_style("Priya").is_none());
    }

    #[test]
    fn test_context_block_skips_empty_fields() {
        let style = LearnedStyle {
            greetings: vec!["hey".to_string()],
            ..Default::default()
        };
        let block = style.context_block();
        assert!(block.contains("How you greet people: hey"));
        assert!(!block.contains("Signature phrases"));
    }

    #[test]
    fn test_is_empty() {
        assert!(LearnedStyle::default().is_empty());
        let style = LearnedStyle {
            closings: vec!["ttyl".to_string()],
            ..Default::default()
        };
        assert!(!style.is_empty());
    }
}
