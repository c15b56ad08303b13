//! Escape handling for FHIR search values.
//!
//! The search grammar reserves four characters, each of which may be escaped
//! with `\`:
//! - `,` separates OR alternatives
//! - `$` separates composite components
//! - `|` separates token system/code and quantity number/system/code
//! - `\` escapes any of the above (and itself)
//!
//! Splitting deliberately leaves escapes intact so that callers can re-emit a
//! value exactly as received; [`unescape`] is applied only where a segment
//! becomes a stored semantic field, and [`escape`] restores the wire form on
//! emission.

/// Split `input` on every unescaped occurrence of `sep`.
///
/// A separator preceded by an odd number of backslashes is part of the value,
/// not a boundary. The returned segments keep their escapes.
pub fn split_unescaped(input: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            out.push(&input[start..i]);
            start = i + sep.len_utf8();
        }
    }
    out.push(&input[start..]);
    out
}

/// Remove one level of escaping: `\\`, `\,`, `\$`, and `\|` become the bare
/// character. Unrecognized pairs and a trailing backslash pass through
/// verbatim.
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | ',' | '$' | '|')) => out.push(next),
            Some(next) => {
                out.push(c);
                out.push(next);
            }
            None => out.push(c),
        }
    }
    out
}

/// Escape the reserved characters so the value survives the next split.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | ',' | '$' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
