//! # Graphics Parser
//!
//! Permissive parser for the `graphics.txt` stroke data shipped with
//! Make Me a Hanzi and its many in-the-wild variants.
//!
//! Supported shapes:
//! - JSON object per line, with the character under `character`, `char`,
//!   `hanzi` or `glyph`, or as a sole codepoint-shaped key, and stroke data
//!   under `strokes`, `paths`, `shape` or `data`
//! - a codepoint token (`U+4E2D` or `4E2D`) followed by stroke groups
//! - a literal hanzi somewhere on the line, followed by stroke groups
//! - one JSON object for the whole file, keyed by character or codepoint
//!
//! Stroke groups are separated by `;`, `|` or `/`; points are `x,y` pairs
//! or loose runs of numbers paired up in order.
//!
//! Parsing is total. A line the heuristics cannot place is recorded in the
//! report, never an error.

use crate::{cjk, Point, SkipReason, SkippedLine, Stroke};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Character → stroke paths, ordered by codepoint.
pub type StrokeMap = BTreeMap<char, Vec<Stroke>>;

/// JSON keys that may carry the character of an entry object.
const CHARACTER_KEYS: [&str; 4] = ["character", "char", "hanzi", "glyph"];

/// JSON keys that may carry the stroke data of an entry object.
const STROKE_KEYS: [&str; 4] = ["strokes", "paths", "shape", "data"];

/// Matches an `x,y` point; comma or whitespace separated.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d+(?:\.\d+)?)[,\s]+(-?\d+(?:\.\d+)?)").expect("pair regex")
});

/// Matches one signed decimal number.
static NUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number regex"));

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of parsing a graphics file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicsReport {
    /// Successfully parsed stroke data.
    pub strokes: StrokeMap,
    /// Lines the heuristics could not handle.
    pub skipped: Vec<SkippedLine>,
}

// =============================================================================
// FILE PARSING
// =============================================================================

/// Parse an entire graphics file into a character → strokes map.
///
/// Tries the whole input as a single JSON map first, then falls back to
/// line-by-line heuristics. A character parsed with empty strokes is kept
/// with an empty list, but never overwrites a previous non-empty entry;
/// a non-empty parse replaces whatever came before it.
#[must_use]
pub fn parse_file(input: &str) -> GraphicsReport {
    if let Some(strokes) = parse_json_document(input) {
        return GraphicsReport {
            strokes,
            skipped: Vec::new(),
        };
    }

    let mut strokes = StrokeMap::new();
    let mut skipped = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok((ch, parsed)) if parsed.is_empty() => {
                strokes.entry(ch).or_default();
            }
            Ok((ch, parsed)) => {
                strokes.insert(ch, parsed);
            }
            Err(reason) => skipped.push(SkippedLine {
                line: idx + 1,
                reason,
            }),
        }
    }
    GraphicsReport { strokes, skipped }
}

/// Try the whole input as one JSON object keyed by character or codepoint.
///
/// Returns `None` when the input is not a single JSON map, or when none of
/// its keys resolve to a character — the latter covers a one-line JSON-lines
/// file, whose top-level keys are field names, not characters.
fn parse_json_document(input: &str) -> Option<StrokeMap> {
    let trimmed = input.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let map: Map<String, Value> = serde_json::from_str(trimmed).ok()?;
    let mut strokes = StrokeMap::new();
    for (key, value) in &map {
        if let Some(ch) = key_to_char(key) {
            strokes.insert(ch, normalize_raw_strokes(value));
        }
    }
    if strokes.is_empty() && !map.is_empty() {
        return None;
    }
    Some(strokes)
}

/// Resolve a top-level JSON key to its character.
///
/// Keys may be codepoint tokens (`U+4E2D`, `4E2D`), single characters, or
/// longer strings containing the hanzi.
fn key_to_char(key: &str) -> Option<char> {
    if let Some(ch) = cjk::parse_codepoint(key) {
        return Some(ch);
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => cjk::first_cjk(key),
    }
}

// =============================================================================
// LINE PARSING
// =============================================================================

/// Parse a single graphics line into a character and its strokes.
///
/// An empty stroke list is a valid result: the line named a character but
/// carried no stroke data the heuristics could read.
pub fn parse_line(line: &str) -> Result<(char, Vec<Stroke>), SkipReason> {
    let line = line.trim();

    // JSON-looking lines decode directly. A decoded object that names no
    // character is skipped; a decode failure falls through to the token
    // heuristics below.
    if line.starts_with('{') || line.starts_with('[') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(line) {
            return parse_json_line(&map);
        }
    }

    let (first, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (line, ""),
    };

    let character = cjk::parse_codepoint(first).or_else(|| cjk::first_cjk(line));
    let Some(ch) = character else {
        return Err(SkipReason::NoCharacter);
    };

    Ok((ch, parse_stroke_groups(rest)))
}

/// Extract character and strokes from a decoded JSON entry object.
fn parse_json_line(map: &Map<String, Value>) -> Result<(char, Vec<Stroke>), SkipReason> {
    let mut character = None;
    for key in CHARACTER_KEYS {
        if let Some(s) = map.get(key).and_then(Value::as_str) {
            character = s.chars().next();
            if character.is_some() {
                break;
            }
        }
    }

    // Single-entry objects may use the codepoint itself as the key:
    // {"4E2D": [...]}
    let mut from_sole_key = false;
    if character.is_none() && map.len() == 1 {
        if let Some(key) = map.keys().next() {
            character = cjk::parse_codepoint(key);
            from_sole_key = character.is_some();
        }
    }

    let Some(ch) = character else {
        return Err(SkipReason::JsonWithoutCharacter);
    };

    let mut raw = None;
    for key in STROKE_KEYS {
        if let Some(value) = map.get(key) {
            raw = Some(value);
            break;
        }
    }
    if raw.is_none() && from_sole_key {
        raw = map.values().next();
    }

    let strokes = raw.map(normalize_raw_strokes).unwrap_or_default();
    Ok((ch, strokes))
}

/// Normalize raw JSON stroke data into point lists.
///
/// Accepts a list of strokes where each stroke is a flat number list
/// (paired up in order), a list of `[x, y]` pairs, or a string to mine for
/// numbers; also accepts a bare string for the whole value. Strokes that
/// fit none of these shapes are dropped.
fn normalize_raw_strokes(raw: &Value) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    match raw {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(elems) if elems.first().is_some_and(Value::is_number) => {
                        let nums: Vec<f64> = elems.iter().filter_map(Value::as_f64).collect();
                        let points = pair_up(&nums);
                        if !points.is_empty() {
                            strokes.push(points);
                        }
                    }
                    Value::Array(elems) if elems.first().is_some_and(Value::is_array) => {
                        if let Some(points) = as_point_list(elems) {
                            strokes.push(points);
                        }
                    }
                    Value::String(s) => {
                        let points = pair_up(&extract_numbers(s));
                        if !points.is_empty() {
                            strokes.push(points);
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::String(s) => {
            let points = pair_up(&extract_numbers(s));
            if !points.is_empty() {
                strokes.push(points);
            }
        }
        _ => {}
    }
    strokes
}

/// Read a stroke given as a list of `[x, y]` pairs.
///
/// Every element must be exactly two numbers, or the whole stroke is
/// rejected.
fn as_point_list(elems: &[Value]) -> Option<Stroke> {
    let mut points = Vec::with_capacity(elems.len());
    for elem in elems {
        let pair = elem.as_array()?;
        if pair.len() != 2 {
            return None;
        }
        points.push([pair[0].as_f64()?, pair[1].as_f64()?]);
    }
    if points.is_empty() { None } else { Some(points) }
}

// =============================================================================
// STROKE GROUP HEURISTICS
// =============================================================================

/// Split the remainder of a text line into strokes.
///
/// Groups are separated by `;`, `|` or `/`. Within a group, `x,y` pairs
/// win; failing that, any loose numbers are paired up in order.
fn parse_stroke_groups(rest: &str) -> Vec<Stroke> {
    let mut strokes = Vec::new();
    for group in rest.split([';', '|', '/']) {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let pairs = extract_pairs(group);
        if !pairs.is_empty() {
            strokes.push(pairs);
            continue;
        }
        let nums = extract_numbers(group);
        if nums.len() >= 2 {
            let points = pair_up(&nums);
            if !points.is_empty() {
                strokes.push(points);
            }
        }
    }
    strokes
}

/// Find all `x,y` point pairs in a group.
fn extract_pairs(text: &str) -> Vec<Point> {
    PAIR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let x = caps.get(1)?.as_str().parse().ok()?;
            let y = caps.get(2)?.as_str().parse().ok()?;
            Some([x, y])
        })
        .collect()
}

/// Find all signed decimal numbers in a piece of text.
fn extract_numbers(text: &str) -> Vec<f64> {
    NUM_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Pair a flat number list into points; an odd trailing number is dropped.
fn pair_up(nums: &[f64]) -> Vec<Point> {
    nums.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn json_line_with_median_pairs() {
        let line = r#"{"character": "中", "medians": [[[10, 20], [30, 40]]], "paths": [[[1, 2], [3, 4]], [[5, 6], [7, 8]]]}"#;
        let (ch, strokes) = parse_line(line).expect("parses");
        assert_eq!(ch, '中');
        assert_eq!(strokes, vec![
            vec![[1.0, 2.0], [3.0, 4.0]],
            vec![[5.0, 6.0], [7.0, 8.0]],
        ]);
    }

    #[test]
    fn json_line_with_flat_number_strokes() {
        let line = r#"{"char": "好", "strokes": [[1, 2, 3, 4, 5], [6, 7, 8, 9]]}"#;
        let (ch, strokes) = parse_line(line).expect("parses");
        assert_eq!(ch, '好');
        // Odd trailing number is dropped.
        assert_eq!(strokes, vec![
            vec![[1.0, 2.0], [3.0, 4.0]],
            vec![[6.0, 7.0], [8.0, 9.0]],
        ]);
    }

    #[test]
    fn json_line_with_svg_path_strings() {
        // Upstream graphics.txt stores strokes as SVG path strings; the
        // numbers inside them pair up.
        let line = r#"{"character": "一", "strokes": ["M 10 20 L 30 40"]}"#;
        let (ch, strokes) = parse_line(line).expect("parses");
        assert_eq!(ch, '一');
        assert_eq!(strokes, vec![vec![[10.0, 20.0], [30.0, 40.0]]]);
    }

    #[test]
    fn json_line_with_codepoint_key() {
        let line = r#"{"4E2D": [[1, 2, 3, 4]]}"#;
        let (ch, strokes) = parse_line(line).expect("parses");
        assert_eq!(ch, '中');
        assert_eq!(strokes, vec![vec![[1.0, 2.0], [3.0, 4.0]]]);
    }

    #[test]
    fn json_line_without_character_is_skipped() {
        let line = r#"{"width": 1024, "height": 1024}"#;
        assert_eq!(parse_line(line), Err(SkipReason::JsonWithoutCharacter));
    }

    #[test]
    fn codepoint_prefixed_line() {
        let (ch, strokes) = parse_line("U+4E2D 10,20 30,40; 50,60 70,80").expect("parses");
        assert_eq!(ch, '中');
        assert_eq!(strokes, vec![
            vec![[10.0, 20.0], [30.0, 40.0]],
            vec![[50.0, 60.0], [70.0, 80.0]],
        ]);
    }

    #[test]
    fn hanzi_line_with_loose_numbers() {
        let (ch, strokes) = parse_line("中 10 20 30 40 | 50 60").expect("parses");
        assert_eq!(ch, '中');
        assert_eq!(strokes, vec![
            vec![[10.0, 20.0], [30.0, 40.0]],
            vec![[50.0, 60.0]],
        ]);
    }

    #[test]
    fn hanzi_found_mid_line() {
        let (ch, _) = parse_line("glyph: 安 1,2 3,4").expect("parses");
        assert_eq!(ch, '安');
    }

    #[test]
    fn negative_and_decimal_coordinates() {
        let (_, strokes) = parse_line("中 -1.5,2 3,-4.25").expect("parses");
        assert_eq!(strokes, vec![vec![[-1.5, 2.0], [3.0, -4.25]]]);
    }

    #[test]
    fn line_without_character_is_skipped() {
        assert_eq!(parse_line("1,2 3,4"), Err(SkipReason::NoCharacter));
        assert_eq!(parse_line("hello world"), Err(SkipReason::NoCharacter));
    }

    #[test]
    fn character_with_no_stroke_data() {
        let (ch, strokes) = parse_line("中").expect("parses");
        assert_eq!(ch, '中');
        assert!(strokes.is_empty());
    }

    #[test]
    fn file_mixed_line_formats() {
        let input = "\
U+4E2D 1,2 3,4\n\
好 5 6 7 8\n\
\n\
not a graphics line\n";
        let report = parse_file(input);
        assert_eq!(report.strokes.len(), 2);
        assert!(report.strokes.contains_key(&'中'));
        assert!(report.strokes.contains_key(&'好'));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 4);
        assert_eq!(report.skipped[0].reason, SkipReason::NoCharacter);
    }

    #[test]
    fn empty_parse_does_not_clobber_nonempty_entry() {
        let input = "中 1,2 3,4\n中\n";
        let report = parse_file(input);
        assert_eq!(report.strokes[&'中'], vec![vec![[1.0, 2.0], [3.0, 4.0]]]);

        // A later non-empty parse does replace the entry.
        let input = "中\n中 5,6 7,8\n";
        let report = parse_file(input);
        assert_eq!(report.strokes[&'中'], vec![vec![[5.0, 6.0], [7.0, 8.0]]]);
    }

    #[test]
    fn whole_file_json_map() {
        let input = r#"{"U+4E2D": [[1, 2, 3, 4]], "好": [[[5, 6], [7, 8]]]}"#;
        let report = parse_file(input);
        assert!(report.skipped.is_empty());
        assert_eq!(report.strokes[&'中'], vec![vec![[1.0, 2.0], [3.0, 4.0]]]);
        assert_eq!(report.strokes[&'好'], vec![vec![[5.0, 6.0], [7.0, 8.0]]]);
    }

    #[test]
    fn single_entry_object_file_parses_as_one_line() {
        // A one-line JSON-lines file must not be mistaken for a whole-file
        // map keyed by field names.
        let input = r#"{"character": "中", "strokes": [[1, 2, 3, 4]]}"#;
        let report = parse_file(input);
        assert_eq!(report.strokes.len(), 1);
        assert_eq!(report.strokes[&'中'], vec![vec![[1.0, 2.0], [3.0, 4.0]]]);
    }

    #[test]
    fn point_list_with_malformed_pair_drops_stroke() {
        let line = r#"{"character": "中", "strokes": [[[1, 2], [3, 4, 5]], [[6, 7]]]}"#;
        let (_, strokes) = parse_line(line).expect("parses");
        assert_eq!(strokes, vec![vec![[6.0, 7.0]]]);
    }

    #[test]
    fn pair_up_drops_odd_trailing_number() {
        assert_eq!(pair_up(&[1.0, 2.0, 3.0]), vec![[1.0, 2.0]]);
        assert!(pair_up(&[1.0]).is_empty());
        assert!(pair_up(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn parse_line_is_total(line in "\\PC*") {
            // Any input is either parsed or skipped, never a panic.
            let _ = parse_line(&line);
        }

        #[test]
        fn parse_file_is_total(input in "\\PC*") {
            let _ = parse_file(&input);
        }

        #[test]
        fn pair_up_halves_the_input(nums in proptest::collection::vec(-1000.0f64..1000.0, 0..20)) {
            prop_assert_eq!(pair_up(&nums).len(), nums.len() / 2);
        }
    }
}
