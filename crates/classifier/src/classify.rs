//! Intent and sentiment classification.

use serde::{Deserialize, Serialize};

use crate::keywords;
use crate::language::{detect_language, Language};
use crate::matching::{
    contains_any, normalize, starts_with_any, whole_text_matches,
};

/// What the contact is trying to do with their message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Question,
    Request,
    FollowUp,
    Emotional,
    Statement,
    Farewell,
    /// Media-only messages bypass classification entirely.
    Media,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Question => "question",
            Intent::Request => "request",
            Intent::FollowUp => "follow_up",
            Intent::Emotional => "emotional",
            Intent::Statement => "statement",
            Intent::Farewell => "farewell",
            Intent::Media => "media",
        }
    }
}

/// Emotional tone of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Happy,
    Sad,
    Angry,
    Urgent,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Happy => "happy",
            Sentiment::Sad => "sad",
            Sentiment::Angry => "angry",
            Sentiment::Urgent => "urgent",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Result of classifying one incoming message. Ephemeral - never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub language: Language,
    pub needs_reply: bool,
}

impl ClassificationResult {
    /// The fixed result used for media-only messages, which skip the
    /// keyword rules entirely.
    pub fn media() -> Self {
        Self {
            intent: Intent::Media,
            sentiment: Sentiment::Neutral,
            language: Language::Unknown,
            needs_reply: false,
        }
    }
}

/// Classify one message.
///
/// Intent families are evaluated in a fixed priority order and the first
/// match wins. Sentiment is resolved by an independent ladder because
/// urgency must override tone ("urgent ya jaldi karo" is urgent, not
/// happy). Empty or whitespace-only input yields statement/neutral with
/// `needs_reply = false`.
pub fn classify(text: &str) -> ClassificationResult {
    let t = normalize(text);

    if t.is_empty() {
        return ClassificationResult {
            intent: Intent::Statement,
            sentiment: Sentiment::Neutral,
            language: Language::Unknown,
            needs_reply: false,
        };
    }

    let intent = detect_intent(&t);
    let sentiment = detect_sentiment(&t);
    let language = detect_language(&t);

    // Short acknowledgements ("ok", "thanks", a thumbs-up) and farewells
    // don't warrant an automated reply.
    let needs_reply = !(whole_text_matches(&t, keywords::ACKNOWLEDGEMENTS)
        || intent == Intent::Farewell);

    ClassificationResult {
        intent,
        sentiment,
        language,
        needs_reply,
    }
}

fn detect_intent(t: &str) -> Intent {
    let word_count = t.split_whitespace().count();

    if starts_with_any(t, keywords::GREETINGS) && word_count <= 6 {
        return Intent::Greeting;
    }
    if t.contains('?') || first_word_in(t, keywords::QUESTION_STARTERS) {
        return Intent::Question;
    }
    if contains_any(t, keywords::REQUESTS) {
        return Intent::Request;
    }
    if whole_text_matches(t, keywords::FOLLOW_UPS) {
        return Intent::FollowUp;
    }
    if contains_any(t, keywords::EMOTIONAL) {
        return Intent::Emotional;
    }
    if starts_with_any(t, keywords::FAREWELLS) {
        return Intent::Farewell;
    }
    Intent::Statement
}

fn detect_sentiment(t: &str) -> Sentiment {
    if contains_any(t, keywords::URGENT) {
        Sentiment::Urgent
    } else if contains_any(t, keywords::ANGRY) {
        Sentiment::Angry
    } else if contains_any(t, keywords::SAD) {
        Sentiment::Sad
    } else if contains_any(t, keywords::HAPPY) {
        Sentiment::Happy
    } else {
        Sentiment::Neutral
    }
}

fn first_word_in(t: &str, table: &[&str]) -> bool {
    t.split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .map_or(false, |w| table.contains(&w))
}
