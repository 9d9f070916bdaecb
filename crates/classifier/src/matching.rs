//! Word-boundary keyword matching over normalized text.

/// Normalize a message for rule evaluation: lowercase and trim.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Count word-boundary occurrences of `keyword` in `text`.
///
/// A boundary is the start/end of the string or any non-alphanumeric
/// character, so "da" matches in "ok da" but not in "today". Keywords may
/// contain spaces ("vera level") or be emoji glyphs.
pub(crate) fn count_keyword(text: &str, keyword: &str) -> usize {
    debug_assert!(!keyword.is_empty());
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = text[start..].find(keyword) {
        let at = start + pos;
        let end = at + keyword.len();
        let before_ok = text[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            count += 1;
        }
        start = end;
    }
    count
}

/// True if any keyword in the table occurs at a word boundary.
pub(crate) fn contains_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|k| count_keyword(text, k) > 0)
}

/// Total word-boundary hits across a table.
pub(crate) fn count_hits(text: &str, table: &[&str]) -> usize {
    table.iter().map(|k| count_keyword(text, k)).sum()
}

/// True if the text starts with any keyword, followed by a boundary.
pub(crate) fn starts_with_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|k| {
        text.starts_with(k)
            && text[k.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// True if the text, stripped of trailing punctuation, equals a table entry.
pub(crate) fn whole_text_matches(text: &str, table: &[&str]) -> bool {
    let stripped = text.trim_end_matches(['?', '!', '.', ' ']);
    table.iter().any(|k| *k == stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_keyword_boundaries() {
        assert_eq!(count_keyword("ok da", "da"), 1);
        assert_eq!(count_keyword("today was fine", "da"), 0);
        assert_eq!(count_keyword("da da da", "da"), 3);
    }

    #[test]
    fn test_count_keyword_phrase() {
        assert_eq!(count_keyword("that was vera level bro", "vera level"), 1);
    }

    #[test]
    fn test_count_keyword_emoji() {
        assert_eq!(count_keyword("haha 😂😂", "😂"), 2);
    }

    #[test]
    fn test_starts_with_any() {
        assert!(starts_with_any("hey there", &["hey"]));
        assert!(!starts_with_any("heyday plans", &["hey"]));
    }

    #[test]
    fn test_whole_text_matches() {
        assert!(whole_text_matches("ok", &["ok"]));
        assert!(whole_text_matches("any update?", &["any update"]));
        assert!(!whole_text_matches("ok so about tomorrow", &["ok"]));
    }
}
