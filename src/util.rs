use std::any::Any;

pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }

    if max <= 3 {
        return s.chars().take(max).collect();
    }

    let truncated: String = s.chars().take(max - 3).collect();
    format!("{}...", truncated)
}

/// Make server-provided text safe to put on the terminal.
///
/// Markup characters such as `<` and `>` are kept as literal text (ratatui
/// never interprets them). What the terminal *does* interpret are control
/// characters, so ESC and the other C0/C1 controls are replaced with U+FFFD.
/// Newlines and tabs survive; `\r\n` is folded to `\n`.
pub fn sanitize_display(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    out.push('\n');
                }
            }
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            c if c.is_control() => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Render a panic payload caught by `catch_unwind` as text.
pub fn panic_detail(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("héllo wörld", 6), "hél...");
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_sanitize_keeps_markup_literal() {
        let text = "<script>alert('x')</script> & <b>bold</b>";
        assert_eq!(sanitize_display(text), text);
    }

    #[test]
    fn test_sanitize_neutralizes_escape_sequences() {
        let cleaned = sanitize_display("red \u{1b}[31mtext\u{1b}[0m");
        assert!(!cleaned.contains('\u{1b}'));
        assert!(cleaned.contains("[31mtext"));
    }

    #[test]
    fn test_sanitize_normalizes_line_endings() {
        assert_eq!(sanitize_display("a\r\nb\rc\td"), "a\nb\nc    d");
    }

    #[test]
    fn test_panic_detail_reads_common_payloads() {
        assert_eq!(panic_detail(Box::new("boom")), "boom");
        assert_eq!(panic_detail(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_detail(Box::new(42u8)), "unknown panic payload");
    }
}
