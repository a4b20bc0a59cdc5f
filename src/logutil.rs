//! Log hygiene for user-supplied strings.
//!
//! Usernames, pet names, topic titles and comment text all end up in log
//! lines. Anything multi-line or control-laden would break the
//! one-event-per-line format, so user strings are escaped on their way
//! into a log macro.

/// Longest preview of a user string a single log line will carry.
const MAX_PREVIEW: usize = 300;

/// Escape a user-supplied string for single-line logging. Newlines, tabs
/// and carriage returns become their two-character escapes, backslashes are
/// doubled, other control characters appear as `\xNN`, and anything past
/// [`MAX_PREVIEW`] characters is dropped behind an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_whitespace_controls() {
        assert_eq!(escape_log("cool\npet\tname"), "cool\\npet\\tname");
        assert_eq!(escape_log("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn hex_escapes_other_control_chars() {
        assert_eq!(escape_log("ding\x07"), "ding\\x07");
    }

    #[test]
    fn long_strings_are_truncated() {
        let long = "x".repeat(MAX_PREVIEW + 50);
        let escaped = escape_log(&long);
        assert!(escaped.ends_with('…'));
        assert_eq!(escaped.chars().count(), MAX_PREVIEW + 1);
    }
}
