//! Logging helpers for player-supplied strings (character names, emails,
//! ids typed at the CLI) so each log record stays on one line.

/// Longest preview written for a single value.
const MAX_PREVIEW: usize = 120;

/// Escape a string for single-line logging. Backslash, `\n`, `\r` and `\t`
/// get their usual escapes and other control characters become `\xNN`.
/// Values over [`MAX_PREVIEW`] characters are cut with an ellipsis.
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
