/// Returns at most `max_chars` characters of `text`, never splitting a
/// multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_text_is_unchanged() {
        assert_eq!(truncate_chars("abc", 200), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "x".repeat(600);
        assert_eq!(truncate_chars(&text, 500).len(), 500);
        assert_eq!(truncate_chars(&text, 200).len(), 200);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 3), "日本語");
    }
}
