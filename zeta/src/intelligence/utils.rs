use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Pronoun contractions and their expansions.
const CONTRACTIONS: &[(&str, &str)] = &[
    (r"(?i)\b(i)['’]m\b", "$1 am"),
    (r"(?i)\b(you|we|they)['’]re\b", "$1 are"),
    (r"(?i)\b(it|he|she|that|what|there|who|where)['’]s\b", "$1 is"),
];

fn contraction_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CONTRACTIONS
            .iter()
            .map(|(pattern, expansion)| {
                (
                    Regex::new(pattern).expect("static contraction pattern must compile"),
                    *expansion,
                )
            })
            .collect()
    })
}

/// Expand pronoun contractions ("I'm" -> "I am", "it's" -> "it is") so that
/// word-level comparisons see the full verb. Possessives ("Dana's") are kept.
pub fn expand_contractions(text: &str) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(text);
    for (pattern, expansion) in contraction_patterns() {
        if pattern.is_match(&out) {
            out = Cow::Owned(pattern.replace_all(&out, *expansion).into_owned());
        }
    }
    out
}

/// Lowercased alphanumeric words of `text`, in order.
pub fn normalize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Words joined by single spaces with a space on both ends, so that a keyword
/// phrase can be matched on word boundaries with `contains(" kw ")`.
pub fn padded_words(text: &str) -> String {
    let words = normalize_words(text);
    let mut padded = String::with_capacity(text.len() + 2);
    padded.push(' ');
    for word in words {
        padded.push_str(&word);
        padded.push(' ');
    }
    padded
}

/// True when `padded` (see [`padded_words`]) contains `phrase` as whole words.
pub fn contains_phrase(padded: &str, phrase: &str) -> bool {
    let needle = padded_words(phrase);
    needle.len() > 2 && padded.contains(&needle)
}

/// Case-insensitive prefix test for storage commands. Leading whitespace is
/// ignored; an empty text never matches.
pub fn is_storage_command(text: &str, prefix: &str) -> bool {
    strip_storage_prefix(text, prefix).is_some()
}

/// Text after the storage prefix with leading whitespace removed, or `None`
/// when `text` is not a storage command.
pub fn strip_storage_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() || prefix.is_empty() {
        return None;
    }

    let prefix_chars = prefix.chars().count();
    let end = match trimmed.char_indices().nth(prefix_chars) {
        Some((idx, _)) => idx,
        None if trimmed.chars().count() == prefix_chars => trimmed.len(),
        None => return None,
    };

    let head = &trimmed[..end];
    if head.to_lowercase() == prefix.to_lowercase() {
        Some(trimmed[end..].trim_start())
    } else {
        None
    }
}

/// Longest prefix of `text` made of whole grapheme clusters with at most
/// `max_chars` characters.
pub fn truncate_graphemes(text: &str, max_chars: usize) -> &str {
    let mut chars = 0usize;
    let mut end = 0usize;
    for (idx, grapheme) in text.grapheme_indices(true) {
        let len = grapheme.chars().count();
        if chars + len > max_chars {
            break;
        }
        chars += len;
        end = idx + grapheme.len();
    }
    &text[..end]
}

/// Distinct significant words used to look facts up by subject.
pub fn subject_terms(text: &str) -> Vec<String> {
    const MAX_TERMS: usize = 16;

    let mut seen = HashSet::new();
    normalize_words(&expand_contractions(text))
        .into_iter()
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| seen.insert(w.clone()))
        .take(MAX_TERMS)
        .collect()
}

/// Canonical snake_case label: "Favorite Color" -> "favorite_color".
pub fn to_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_phrase_matching() {
        let padded = padded_words("What's my API-Key again?");
        assert_eq!(padded, " what s my api key again ");
        assert!(contains_phrase(&padded, "api key"));
        assert!(!contains_phrase(&padded, "key again now"));
        assert!(!contains_phrase(&padded, ""));
    }

    #[test]
    fn test_storage_prefix_case_insensitive() {
        assert!(is_storage_command("Remember: x", "remember:"));
        assert!(is_storage_command("  REMEMBER:x", "remember:"));
        assert!(is_storage_command("remember:", "remember:"));
        assert!(!is_storage_command("remember that", "remember:"));
        assert!(!is_storage_command("", "remember:"));
        assert!(!is_storage_command("rem", "remember:"));
    }

    #[test]
    fn test_strip_storage_prefix() {
        assert_eq!(
            strip_storage_prefix("Remember:   my name is Bo", "remember:"),
            Some("my name is Bo")
        );
        assert_eq!(strip_storage_prefix("Remember:", "remember:"), Some(""));
        assert_eq!(strip_storage_prefix("What is my name?", "remember:"), None);
    }

    #[test]
    fn test_strip_prefix_multibyte_text() {
        assert_eq!(strip_storage_prefix("Réméṁber: x", "remember:"), None);
        assert_eq!(strip_storage_prefix("日本語", "remember:"), None);
    }

    #[test]
    fn test_truncate_graphemes_keeps_clusters_whole() {
        assert_eq!(truncate_graphemes("hello", 3), "hel");
        assert_eq!(truncate_graphemes("hello", 10), "hello");
        // "e" + combining acute is two chars, one grapheme
        assert_eq!(truncate_graphemes("cafe\u{301}", 4), "caf");
        assert_eq!(truncate_graphemes("cafe\u{301}", 5), "cafe\u{301}");
        assert_eq!(truncate_graphemes("", 5), "");
    }

    #[test]
    fn test_expand_contractions() {
        assert_eq!(expand_contractions("I'm 25"), "I am 25");
        assert_eq!(expand_contractions("they’re late, it's fine"), "they are late, it is fine");
        assert_eq!(expand_contractions("Dana's car"), "Dana's car");
        assert!(matches!(expand_contractions("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_subject_terms_expand_contractions() {
        assert_eq!(subject_terms("I'm 25"), vec!["am", "25"]);
    }

    #[test]
    fn test_subject_terms_dedup_and_filter() {
        assert_eq!(
            subject_terms("Actually I am 25, I AM!"),
            vec!["actually", "am", "25"]
        );
    }

    #[test]
    fn test_to_label() {
        assert_eq!(to_label("Favorite Color"), "favorite_color");
        assert_eq!(to_label("  API token "), "api_token");
        assert_eq!(to_label("e-mail address!"), "e_mail_address");
        assert_eq!(to_label("___"), "");
    }
}
