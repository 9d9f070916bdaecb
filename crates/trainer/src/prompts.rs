//! Prompt construction for the two analysis phases.

/// Phase-1 prompt: one person's outgoing messages, most recent first.
pub fn global_prompt(messages: &[String]) -> String {
    format!(
        "Analyze these WhatsApp messages sent by ONE person. Extract their UNIQUE \
         communication style and personality patterns.\n\n\
         MESSAGES (most recent first):\n{}\n\n\
         Analyze carefully and return ONLY a valid JSON object (no markdown, no code \
         blocks, no explanation) with these fields:\n\
         {{\n\
           \"greetings\": [\"list of greetings they actually use, e.g. hey, oyee, yo, hi bro\"],\n\
           \"affirmatives\": [\"how they say yes/okay, e.g. hmm, mm, yeah, acha, haan, ok\"],\n\
           \"negatives\": [\"how they say no, e.g. nah, nahi, nope, na\"],\n\
           \"fillers\": [\"filler words/sounds they use, e.g. like, basically, actually, arrey\"],\n\
           \"closings\": [\"how they end conversations, e.g. bye, chal, ok bye, ttyl\"],\n\
           \"emoji_favorites\": [\"their most used emojis\"],\n\
           \"avg_word_count\": 8,\n\
           \"detected_languages\": [\"languages present in the messages\"],\n\
           \"primary_language\": \"the language they use most\",\n\
           \"language_mix\": \"description of language patterns e.g. 'English with Hindi slang'\",\n\
           \"tone_summary\": \"brief description of their communication tone and energy\",\n\
           \"signature_phrases\": [\"unique phrases they frequently use\"],\n\
           \"abbreviation_style\": \"how they shorten words, e.g. 'u' for 'you', 'msg' for 'message'\",\n\
           \"code_switching_pattern\": \"when and how they switch between languages\"\n\
         }}\n\n\
         IMPORTANT: Base this ONLY on the actual messages above. Don't invent patterns \
         that aren't there. If a field has no matches, use an empty array [].",
        messages.join("\n")
    )
}

/// Phase-2 prompt: how the tenant talks to one specific contact, with
/// they-said/you-replied pairs when available.
pub fn contact_prompt(
    contact_name: &str,
    own_messages: &[&str],
    pairs: &[(String, String)],
) -> String {
    let pairs_block = if pairs.is_empty() {
        String::new()
    } else {
        let rendered = pairs
            .iter()
            .map(|(they, you)| format!("They: \"{}\" -> You: \"{}\"", they, you))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "\n\nCONVERSATION PAIRS (what {} said -> how this person replied):\n{}",
            contact_name, rendered
        )
    };

    format!(
        "Analyze how this person talks to \"{contact_name}\" specifically on WhatsApp.\n\n\
         THEIR MESSAGES TO {contact_name}:\n{messages}{pairs_block}\n\n\
         Return ONLY a valid JSON (no markdown, no code blocks):\n\
         {{\n\
           \"tone\": \"how they talk to this specific person (e.g. very casual, formal, affectionate, professional, playful)\",\n\
           \"language\": \"language they use with this person (e.g. pure English, Hinglish, Hindi, mix)\",\n\
           \"emoji_usage\": \"how they use emojis with this person (heavy, moderate, rarely, never)\",\n\
           \"sample_replies\": [\"3-5 short examples of how they'd typically reply to this person\"],\n\
           \"relationship_hint\": \"inferred relationship (friend, close friend, family, colleague, boss, romantic, acquaintance)\",\n\
           \"unique_patterns\": \"any special way they talk to THIS person that differs from their general style\"\n\
         }}",
        contact_name = contact_name,
        messages = own_messages.join("\n"),
        pairs_block = pairs_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_prompt_embeds_messages() {
        let prompt = global_prompt(&["oyee what's up".to_string(), "chal bye".to_string()]);
        assert!(prompt.contains("oyee what's up\nchal bye"));
        assert!(prompt.contains("\"greetings\""));
    }

    #[test]
    fn test_contact_prompt_with_pairs() {
        let pairs = vec![("lunch?".to_string(), "can't today".to_string())];
        let prompt = contact_prompt("Amma", &["on my way"], &pairs);
        assert!(prompt.contains("talks to \"Amma\""));
        assert!(prompt.contains("They: \"lunch?\" -> You: \"can't today\""));
    }

    #[test]
    fn test_contact_prompt_without_pairs() {
        let prompt = contact_prompt("Sam", &["ok"], &[]);
        assert!(!prompt.contains("CONVERSATION PAIRS"));
    }
}
