//! Identifier validity and string escaping for synthesized text.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

static RESERVED_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with",
    ]
    .into_iter()
    .collect()
});

fn is_identifier_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_ascii_digit() || ch == '\u{200c}' || ch == '\u{200d}'
}

/// Whether `text` can be written as a bare identifier.
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first) && chars.all(is_identifier_part) && !RESERVED_WORDS.contains(text)
}

/// Escape `text` for a string literal delimited by `quote`.
pub fn escape_string(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `text` is the canonical spelling of a non-negative number, so it
/// may be written as a numeric property name.
pub fn is_numeric_literal_name(text: &str) -> bool {
    text.parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= 0.0 && format_number(n) == text)
}

/// JavaScript-style number formatting for integral and simple decimal values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == value.trunc() && value.abs() < 1e21 {
        format!("{}", value as i128)
    } else {
        format!("{value}")
    }
}
