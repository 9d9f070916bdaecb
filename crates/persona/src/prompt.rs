//! Layered reply prompt construction.

use classifier::{ClassificationResult, Intent, Relationship, Sentiment};

use crate::model::PersonalityProfile;

/// Maximum history turns included in the prompt context window.
const MAX_HISTORY_TURNS: usize = 20;

/// One prior turn of the conversation, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    /// True when the external contact wrote this turn.
    pub from_contact: bool,
    pub text: String,
}

/// Build the full reply prompt for one inbound message.
///
/// Layers, in order: manual personality traits, learned global style,
/// per-contact style (exact key then fuzzy name lookup), relationship
/// guidance, detected language instructions, intent and sentiment
/// guidance, and the last [`MAX_HISTORY_TURNS`] turns of history in
/// chronological order.
pub fn build_reply_prompt(
    profile: &PersonalityProfile,
    contact_name: Option<&str>,
    relationship: Relationship,
    classification: &ClassificationResult,
    history: &[HistoryTurn],
    incoming: &str,
) -> String {
    let display_name = contact_name.unwrap_or("this contact");

    let emoji_rule = if profile.use_emoji {
        "Use naturally, matching this person's emoji habits"
    } else {
        "Rarely or never use emojis"
    };

    let mut personality = format!(
        "YOUR PERSONALITY PROFILE:\n\
         - Base tone: {}\n\
         - Formality: {}% (0% = max casual, 100% = max formal)\n\
         - Typical message length: ~{} words\n\
         - Emojis: {}",
        profile.tone, profile.formality, profile.avg_length, emoji_rule
    );
    if !profile.example_phrases.is_empty() {
        personality.push_str(&format!(
            "\n- Common phrases: {}",
            profile.example_phrases.join(", ")
        ));
    }
    personality.push_str(&profile.learned.context_block());
    if let Some(name) = contact_name {
        if let Some(contact) = profile.learned.contact_style(name) {
            personality.push_str(&contact.context_block(display_name));
        }
    }

    let history_block = render_history(history, display_name);

    format!(
        "You are a REAL PERSON chatting on WhatsApp. Reply exactly as this \
         person would. Never reveal you are an assistant.\n\n\
         {personality}\n\n\
         RELATIONSHIP: {relationship_guide}\n\n\
         DETECTED LANGUAGE: {language}\n\
         - Always reply in the language mix of the incoming message, not \
         your default.\n\n\
         THEIR MESSAGE READS AS:\n\
         - Intent: {intent} - {intent_guide}\n\
         - Sentiment: {sentiment} - {sentiment_guide}\n\n\
         RULES:\n\
         1. You ARE this person. Match their exact slang, abbreviations, \
         and vibe.\n\
         2. You are currently busy. Weave that in naturally, never as a \
         template line.\n\
         3. Keep it short - 1 to 3 sentences, like a real quick message.\n\
         4. If they are sad or emotional, acknowledge feelings first, then \
         mention being busy.\n\
         5. If they asked something specific, briefly reference it.\n\
         6. Use the conversation history for context.\n\n\
         CONVERSATION HISTORY WITH {display_name}:\n\
         {history_block}\n\n\
         THEIR NEW MESSAGE: \"{incoming}\"\n\n\
         Reply as this person would - natural, short, human, context-aware:",
        personality = personality,
        relationship_guide = relationship_guidance(relationship),
        language = classification.language.as_str(),
        intent = classification.intent.as_str(),
        intent_guide = intent_guidance(classification.intent),
        sentiment = classification.sentiment.as_str(),
        sentiment_guide = sentiment_guidance(classification.sentiment),
        display_name = display_name,
        history_block = history_block,
        incoming = incoming,
    )
}

fn render_history(history: &[HistoryTurn], display_name: &str) -> String {
    if history.is_empty() {
        return "(First message from this contact)".to_string();
    }
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    history[start..]
        .iter()
        .map(|turn| {
            let who = if turn.from_contact { display_name } else { "You" };
            format!("{}: {}", who, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Guidance text per relationship category.
pub fn relationship_guidance(relationship: Relationship) -> &'static str {
    match relationship {
        Relationship::Family => {
            "This is a FAMILY member. Be warm, caring, and natural. Brief is fine, cold is not."
        }
        Relationship::ClosePersonal => {
            "This is someone very CLOSE to you. Be warm, affectionate, and real."
        }
        Relationship::Friend => {
            "This is a FRIEND. Be casual, fun, use slang freely, be yourself."
        }
        Relationship::Professional => {
            "This is a PROFESSIONAL contact. Slightly more polished but still natural, light on slang."
        }
        Relationship::Acquaintance => {
            "This is an ACQUAINTANCE. Polite but not overly formal, keep it friendly."
        }
        Relationship::Unknown => "Respond naturally based on their tone.",
    }
}

/// Guidance text per detected intent.
pub fn intent_guidance(intent: Intent) -> &'static str {
    match intent {
        Intent::Greeting => {
            "They're greeting you. Greet them back in your own style, then naturally mention you're caught up."
        }
        Intent::Question => {
            "They asked a question. Briefly acknowledge it and say you'll answer properly later."
        }
        Intent::Request => {
            "They want something from you. Acknowledge what they need and say you'll get back to them."
        }
        Intent::FollowUp => {
            "They're checking if you're there. Reassure them briefly - busy, not ignoring them."
        }
        Intent::Emotional => {
            "They're sharing something emotional. Acknowledge their feelings first, then mention you'll talk properly soon."
        }
        Intent::Farewell => "They're saying bye. Say bye back in your style.",
        Intent::Statement | Intent::Media => {
            "They said something general. Respond naturally and briefly, weaving in that you're occupied."
        }
    }
}

/// Guidance text per detected sentiment.
pub fn sentiment_guidance(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Happy => "They seem happy or excited. Match their energy a bit.",
        Sentiment::Sad => {
            "They seem sad. Be extra warm and caring, show empathy before anything else."
        }
        Sentiment::Angry => {
            "They seem upset. Be calm and understanding, acknowledge their frustration."
        }
        Sentiment::Urgent => {
            "This feels urgent to them. Take it seriously, don't be too casual about it."
        }
        Sentiment::Neutral => "Normal mood. Respond naturally.",
    }
}
