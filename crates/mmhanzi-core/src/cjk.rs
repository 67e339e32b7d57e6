//! # CJK Helpers
//!
//! Character-class checks and codepoint decoding shared by the parsers.
//!
//! The source data identifies characters three ways: as literal hanzi, as
//! `U+XXXX` codepoint tokens, and as bare hex tokens. All three funnel
//! through here.

/// First character of the CJK Unified Ideographs block.
const CJK_FIRST: char = '\u{4E00}';

/// Last character of the CJK Unified Ideographs block.
const CJK_LAST: char = '\u{9FFF}';

/// Check whether a character is a CJK unified ideograph.
#[must_use]
pub fn is_cjk(c: char) -> bool {
    (CJK_FIRST..=CJK_LAST).contains(&c)
}

/// Find the first CJK character in a string.
#[must_use]
pub fn first_cjk(s: &str) -> Option<char> {
    s.chars().find(|&c| is_cjk(c))
}

/// Decode a codepoint token such as `U+4E2D` or bare `4E2D`.
///
/// Tokens must be 4 to 6 hex digits, optionally prefixed with `U+`. The
/// length floor keeps short numbers like `12` from being mistaken for
/// codepoints. Returns `None` for malformed tokens and for values that are
/// not Unicode scalar values (the surrogate range).
#[must_use]
pub fn parse_codepoint(token: &str) -> Option<char> {
    let digits = token
        .strip_prefix("U+")
        .or_else(|| token.strip_prefix("u+"))
        .unwrap_or(token);
    if !(4..=6).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    char::from_u32(value)
}

// =============================================================================
// TESTS
// =============================================================================
