//! Urgency flag for inbound messages.

use serde::{Deserialize, Serialize};

use crate::classify::Sentiment;
use crate::keywords;
use crate::matching::{contains_any, normalize};

/// Urgency of an inbound message. Set exactly once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Important,
    Emergency,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Important => "important",
            Urgency::Emergency => "emergency",
        }
    }
}

/// Derive urgency from message text and its resolved sentiment.
///
/// Urgent sentiment or an emergency-class keyword escalates to emergency;
/// an important-class keyword marks the message important; everything else
/// is normal.
pub fn detect_urgency(text: &str, sentiment: Sentiment) -> Urgency {
    if sentiment == Sentiment::Urgent {
        return Urgency::Emergency;
    }
    let t = normalize(text);
    if contains_any(&t, keywords::EMERGENCY_WORDS) {
        Urgency::Emergency
    } else if contains_any(&t, keywords::IMPORTANT_WORDS) {
        Urgency::Important
    } else {
        Urgency::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;

    #[test]
    fn test_emergency_from_sentiment() {
        let result = classify("emergency call me now");
        assert_eq!(
            detect_urgency("emergency call me now", result.sentiment),
            Urgency::Emergency
        );
    }

    #[test]
    fn test_important_keyword() {
        assert_eq!(
            detect_urgency("this is important, please call me back", Sentiment::Neutral),
            Urgency::Important
        );
    }

    #[test]
    fn test_normal_by_default() {
        assert_eq!(
            detect_urgency("lunch tomorrow?", Sentiment::Neutral),
            Urgency::Normal
        );
    }
}
