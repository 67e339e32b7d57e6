//! # Dictionary Parser
//!
//! Permissive parser for `dictionary.txt`, producing a character →
//! pinyin/meaning/radical map.
//!
//! Two line shapes are understood:
//! - JSON object per line (the upstream dataset shape): `character`,
//!   `pinyin` (string or list of readings), `definition`/`meaning`,
//!   `radical`
//! - plain text: the character somewhere on the line (literal or as a
//!   codepoint token), a pinyin token, and the meaning as the remainder
//!
//! Text lines cannot name a radical, so the field stays empty for them.
//! Like the graphics parser, this one is total: unusable lines land in the
//! report.

use crate::{cjk, SkipReason, SkippedLine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A pinyin syllable with an optional tone digit, e.g. `zhong1` or `lü:4`.
static PINYIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-zü:]+[0-5]?$").expect("pinyin regex"));

// =============================================================================
// ENTRY TYPES
// =============================================================================

/// Dictionary metadata for one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    /// Romanized reading, possibly with a tone digit.
    pub pinyin: String,
    /// English gloss.
    pub meaning: String,
    /// Radical, when the source carries one.
    pub radical: String,
}

/// Outcome of parsing a dictionary file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictReport {
    /// Successfully parsed entries, ordered by codepoint.
    pub entries: BTreeMap<char, DictEntry>,
    /// Lines the heuristics could not handle.
    pub skipped: Vec<SkippedLine>,
}

// =============================================================================
// FILE PARSING
// =============================================================================

/// Parse a dictionary file.
///
/// Blank lines and `#` comments are ignored silently. Duplicate characters
/// keep the last entry seen.
#[must_use]
pub fn parse_file(input: &str) -> DictReport {
    let mut entries = BTreeMap::new();
    let mut skipped = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok((ch, entry)) => {
                entries.insert(ch, entry);
            }
            Err(reason) => skipped.push(SkippedLine {
                line: idx + 1,
                reason,
            }),
        }
    }
    DictReport { entries, skipped }
}

/// Parse a single dictionary line.
pub fn parse_line(line: &str) -> Result<(char, DictEntry), SkipReason> {
    let line = line.trim();

    if line.starts_with('{') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(line) {
            if let Some(parsed) = parse_json_line(&map) {
                return Ok(parsed);
            }
            // An object without a character field still gets a chance with
            // the text heuristics; the raw line may contain the hanzi.
        }
    }

    parse_text_line(line)
}

/// Extract an entry from a decoded JSON dictionary object.
fn parse_json_line(map: &Map<String, Value>) -> Option<(char, DictEntry)> {
    let ch = map
        .get("character")
        .or_else(|| map.get("char"))
        .and_then(Value::as_str)
        .and_then(|s| s.chars().next())?;

    let pinyin = match map.get("pinyin") {
        Some(Value::String(s)) => s.clone(),
        // Upstream stores a list of readings; the first one wins.
        Some(Value::Array(items)) => items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    let meaning = map
        .get("definition")
        .or_else(|| map.get("meaning"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let radical = map
        .get("radical")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some((
        ch,
        DictEntry {
            pinyin,
            meaning,
            radical,
        },
    ))
}

/// Apply the plain-text heuristics to a line.
fn parse_text_line(line: &str) -> Result<(char, DictEntry), SkipReason> {
    // The character is the first hanzi on the line; failing that, a leading
    // codepoint token that decodes to one.
    let scanned = line
        .char_indices()
        .find(|&(_, c)| cjk::is_cjk(c))
        .map(|(pos, c)| (c, line[pos + c.len_utf8()..].trim()));

    let (ch, rest) = match scanned {
        Some(found) => found,
        None => {
            let (first, rest) = match line.split_once(char::is_whitespace) {
                Some((first, rest)) => (first, rest.trim()),
                None => (line, ""),
            };
            match cjk::parse_codepoint(first).filter(|&c| cjk::is_cjk(c)) {
                Some(ch) => (ch, rest),
                None => return Err(SkipReason::NoCharacter),
            }
        }
    };

    // Pinyin: first token shaped like a syllable, else the first token.
    let mut tokens = rest.split_whitespace();
    let pinyin = tokens
        .clone()
        .find(|t| PINYIN_RE.is_match(t))
        .or_else(|| tokens.next())
        .unwrap_or_default()
        .to_string();

    // Meaning: everything after the first occurrence of the pinyin token.
    let meaning = if pinyin.is_empty() {
        rest.to_string()
    } else {
        match rest.find(&pinyin) {
            Some(pos) => rest[pos + pinyin.len()..].trim().to_string(),
            None => rest.to_string(),
        }
    };

    Ok((
        ch,
        DictEntry {
            pinyin,
            meaning,
            radical: String::new(),
        },
    ))
}

// =============================================================================
// TESTS
// =============================================================================
