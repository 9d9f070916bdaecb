//! Local statistics used when the model is unavailable.

use std::collections::HashMap;

/// How many favorite emojis the fallback keeps.
const TOP_EMOJIS: usize = 5;

/// Average word count across messages. Zero-message input yields zero.
pub fn avg_word_count(messages: &[String]) -> f64 {
    if messages.is_empty() {
        return 0.0;
    }
    let total: usize = messages
        .iter()
        .map(|m| m.split_whitespace().count())
        .sum();
    total as f64 / messages.len() as f64
}

/// Most frequently used emojis, most common first.
pub fn favorite_emojis(messages: &[String]) -> Vec<String> {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for message in messages {
        for c in message.chars().filter(|c| is_emoji(*c)) {
            *counts.entry(c).or_default() += 1;
        }
    }
    let mut ranked: Vec<(char, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(TOP_EMOJIS)
        .map(|(c, _)| c.to_string())
        .collect()
}

/// Covers the common emoji blocks plus the dingbats range (which holds
/// the red heart). Not exhaustive, and doesn't need to be for frequency
/// ranking.
fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1F5FF
        | 0x1F600..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1FAFF
        | 0x2600..=0x27BF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_avg_word_count() {
        let messages = msgs(&["one two three", "four five"]);
        assert!((avg_word_count(&messages) - 2.5).abs() < f64::EPSILON);
        assert_eq!(avg_word_count(&[]), 0.0);
    }

    #[test]
    fn test_favorite_emojis_ranked_by_frequency() {
        let messages = msgs(&["nice 😂😂", "lol 😂 🔥", "ok 🔥", "❤️"]);
        let favorites = favorite_emojis(&messages);
        assert_eq!(favorites[0], "😂");
        assert_eq!(favorites[1], "🔥");
        assert!(favorites.contains(&"❤".to_string()));
    }

    #[test]
    fn test_no_emojis() {
        assert!(favorite_emojis(&msgs(&["plain text only"])).is_empty());
    }
}
