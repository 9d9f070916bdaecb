//! Best-effort cleanup of model output.
//!
//! Models wrap JSON in markdown fences, add trailing commas, and prepend
//! prose. These helpers strip and repair the common malformations; the
//! client bounds itself to one extraction-and-reparse attempt before
//! surfacing a parse error.

/// Remove markdown code fences (```json ... ``` or plain ```).
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Trim surrounding quote and backtick characters from a plain-text reply.
pub fn trim_outer_quotes(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}

/// Drop commas that directly precede `}` or `]` outside of strings.
pub fn repair_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    // trailing comma, drop it
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Extract the first balanced `{...}` substring, respecting strings.
pub fn extract_balanced_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn test_trim_outer_quotes() {
        assert_eq!(trim_outer_quotes("\"hey, busy rn\""), "hey, busy rn");
        assert_eq!(trim_outer_quotes("`reply`"), "reply");
        assert_eq!(trim_outer_quotes("no quotes"), "no quotes");
    }

    #[test]
    fn test_repair_trailing_commas() {
        let broken = r#"{"items": ["a", "b",], "n": 1,}"#;
        let repaired = repair_trailing_commas(broken);
        assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn test_repair_keeps_commas_inside_strings() {
        let text = r#"{"phrase": "wait, what?"}"#;
        assert_eq!(repair_trailing_commas(text), text);
    }

    #[test]
    fn test_extract_balanced_object() {
        let noisy = "Here is your analysis:\n{\"tone\": \"casual\"}\nHope it helps!";
        assert_eq!(extract_balanced_object(noisy), Some("{\"tone\": \"casual\"}"));
    }

    #[test]
    fn test_extract_nested_object() {
        let nested = r#"x {"a": {"b": 2}} y"#;
        assert_eq!(extract_balanced_object(nested), Some(r#"{"a": {"b": 2}}"#));
    }

    #[test]
    fn test_extract_respects_braces_in_strings() {
        let tricky = r#"{"a": "closing } brace"}"#;
        assert_eq!(extract_balanced_object(tricky), Some(tricky));
    }

    #[test]
    fn test_extract_unbalanced_returns_none() {
        assert_eq!(extract_balanced_object("{\"a\": 1"), None);
        assert_eq!(extract_balanced_object("no json here"), None);
    }
}
