//! Deterministic canned replies for when the model is unavailable.

use classifier::{ClassificationResult, Intent, Sentiment, Urgency};

/// Used when a tenant's configured fallback text is empty. A reply is
/// never empty.
pub const DEFAULT_FALLBACK: &str =
    "Hey, caught up with something right now. Will text you back soon!";

/// Pick the canned reply for a message the model could not answer.
///
/// Greeting, sad-emotional, and question intents get their own variant;
/// important messages get an acknowledgement appended to the tenant's
/// fallback text; everything else gets the fallback text as-is.
pub fn fallback_reply(
    fallback_text: &str,
    classification: &ClassificationResult,
    urgency: Urgency,
) -> String {
    let base = if fallback_text.trim().is_empty() {
        DEFAULT_FALLBACK
    } else {
        fallback_text.trim()
    };

    match classification.intent {
        Intent::Greeting => {
            "Hey! Kinda caught up right now, will text you back soon 👋".to_string()
        }
        Intent::Emotional if classification.sentiment == Sentiment::Sad => {
            "Hey, I saw your message ❤️ I'm a bit tied up right now but I'll reply \
             properly soon, promise."
                .to_string()
        }
        Intent::Question => {
            format!("{} Will answer that properly when I'm free.", base)
        }
        _ if urgency == Urgency::Important => {
            format!("{} Noted this seems important, will prioritize it.", base)
        }
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier::classify;

    #[test]
    fn test_greeting_variant() {
        let c = classify("hey!");
        let reply = fallback_reply("Busy rn", &c, Urgency::Normal);
        assert!(reply.contains("👋"));
    }

    #[test]
    fn test_sad_variant() {
        let c = classify("feeling really sad today");
        let reply = fallback_reply("Busy rn", &c, Urgency::Normal);
        assert!(reply.contains("❤️"));
    }

    #[test]
    fn test_question_appends_acknowledgement() {
        let c = classify("what time works for you?");
        let reply = fallback_reply("Busy rn", &c, Urgency::Normal);
        assert_eq!(reply, "Busy rn Will answer that properly when I'm free.");
    }

    #[test]
    fn test_important_annotation() {
        let c = classify("the package arrived this morning");
        let reply = fallback_reply("Busy rn", &c, Urgency::Important);
        assert!(reply.starts_with("Busy rn"));
        assert!(reply.contains("important"));
    }

    #[test]
    fn test_never_empty() {
        let c = classify("the package arrived this morning");
        let reply = fallback_reply("   ", &c, Urgency::Normal);
        assert_eq!(reply, DEFAULT_FALLBACK);
    }
}
