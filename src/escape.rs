//! Escape decoding for double-quoted scalars.
//!
//! The scanner leaves the contents of a double-quoted scalar undecoded
//! because escapes such as `\L` expand beyond their written length and
//! cannot always be rewritten in place. The decoder here runs over the
//! raw contents once; a scalar without a single backslash keeps its
//! buffer untouched.

use std::iter::Peekable;
use std::str::Chars;

/// Decode the escape sequences of a double-quoted scalar.
///
/// The scanner has already rejected malformed escapes, so an unknown
/// escape letter or a non-hex digit here is a scanner bug.
pub(crate) fn decode_double_quoted(raw: String) -> String {
    if !raw.contains('\\') {
        return raw;
    }
    let mut string = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            string.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => string.push('\0'),
            Some('a') => string.push('\x07'),
            Some('b') => string.push('\x08'),
            Some('t' | '\t') => string.push('\t'),
            Some('n') => string.push('\n'),
            Some('v') => string.push('\x0B'),
            Some('f') => string.push('\x0C'),
            Some('r') => string.push('\r'),
            Some('e') => string.push('\x1B'),
            Some(' ') => string.push(' '),
            Some('"') => string.push('"'),
            Some('\\') => string.push('\\'),
            // NEL (#x85)
            Some('N') => string.push('\u{0085}'),
            // #xA0
            Some('_') => string.push('\u{00a0}'),
            // LS (#x2028)
            Some('L') => string.push('\u{2028}'),
            // PS (#x2029)
            Some('P') => string.push('\u{2029}'),
            Some('x') => string.push(hex_escape(&mut chars, 2)),
            Some('u') => string.push(hex_escape(&mut chars, 4)),
            Some('U') => string.push(hex_escape(&mut chars, 8)),
            // An escaped line break is removed entirely; CR LF counts
            // as one break.
            Some('\r') => {
                chars.next_if_eq(&'\n');
            }
            Some('\n' | '\u{0085}' | '\u{2028}' | '\u{2029}') => {}
            other => {
                debug_assert!(false, "scanner passed an unknown escape: {other:?}");
                if let Some(other) = other {
                    string.push(other);
                }
            }
        }
    }
    string
}

/// Read a fixed number of hex digits and return the code point they
/// spell.
fn hex_escape(chars: &mut Peekable<Chars<'_>>, width: u32) -> char {
    let mut value = 0u32;
    for _ in 0..width {
        let digit = chars.next().and_then(|ch| ch.to_digit(16));
        debug_assert!(digit.is_some(), "scanner passed a non-hex escape digit");
        value = value << 4 | digit.unwrap_or(0);
    }
    debug_assert!(
        char::from_u32(value).is_some(),
        "scanner passed an escape outside the Unicode range"
    );
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}
