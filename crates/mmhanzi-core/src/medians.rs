//! # Median Filtering
//!
//! Strict parsing and lesson-subset filtering of the curated stroke-median
//! dataset.
//!
//! Unlike `graphics.txt` variants from the wild, this dataset is
//! machine-generated JSON lines. A malformed line means corruption, so the
//! parser fails loudly instead of skipping.

use crate::{ParseError, Stroke};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DATASET ENTRIES
// =============================================================================

/// One record of the stroke-median dataset.
///
/// Records carry more fields upstream (outline strokes, radical strokes);
/// only the character and its medians survive the conversion. Records
/// without medians exist and are dropped by the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianEntry {
    /// The character, as the dataset stores it (a one-character string).
    pub character: String,
    /// Median path per stroke, absent on some records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medians: Option<Vec<Stroke>>,
}

/// Parse the whole dataset from JSON-lines text.
///
/// Blank lines are tolerated; anything else that fails to decode is an
/// error carrying its 1-based line number.
pub fn parse_dataset(input: &str) -> Result<Vec<MedianEntry>, ParseError> {
    let mut entries = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line).map_err(|source| ParseError::DatasetLine {
            line: idx + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

// =============================================================================
// LESSON SET
// =============================================================================

/// The set of characters a lesson curriculum needs.
///
/// Built from an arbitrary string: every non-whitespace character is a
/// member. This matches how curricula are maintained — as one long string
/// of hanzi, pasted from the lesson material.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonSet {
    chars: BTreeSet<char>,
}

impl LessonSet {
    /// Build a lesson set from the characters of a string.
    #[must_use]
    pub fn new(spec: &str) -> Self {
        Self {
            chars: spec.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// Membership test for a dataset character field.
    ///
    /// Dataset characters are strings; only a string that is exactly one
    /// lesson character is a member.
    #[must_use]
    pub fn contains_str(&self, s: &str) -> bool {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.chars.contains(&c),
            _ => false,
        }
    }

    /// Number of characters in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Check whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

// =============================================================================
// FILTERING
// =============================================================================

/// Keep the entries a lesson set needs, in dataset order.
///
/// An entry survives when its character is in the set and it actually
/// carries medians.
#[must_use]
pub fn filter_lessons(entries: Vec<MedianEntry>, lessons: &LessonSet) -> Vec<MedianEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.medians.is_some() && lessons.contains_str(&entry.character))
        .collect()
}

/// Serialize entries back to JSON lines, one compact object per line.
pub fn to_jsonl(entries: &[MedianEntry]) -> serde_json::Result<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    Ok(out)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> &'static str {
        concat!(
            r#"{"character": "中", "medians": [[[10, 20], [30, 40]]], "strokes": ["M 1 2"]}"#,
            "\n",
            r#"{"character": "好", "medians": [[[1, 2]]]}"#,
            "\n",
            r#"{"character": "的"}"#,
            "\n",
            r#"{"character": "安", "medians": [[[5, 6]]]}"#,
            "\n",
        )
    }

    #[test]
    fn parse_dataset_reads_all_records() {
        let entries = parse_dataset(dataset()).expect("parses");
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].character, "中");
        assert_eq!(
            entries[0].medians,
            Some(vec![vec![[10.0, 20.0], [30.0, 40.0]]])
        );
        // Record without medians is kept by the parser.
        assert_eq!(entries[2].medians, None);
    }

    #[test]
    fn parse_dataset_tolerates_blank_lines() {
        let input = "\n{\"character\": \"中\", \"medians\": []}\n\n";
        let entries = parse_dataset(input).expect("parses");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn parse_dataset_fails_with_line_number() {
        let input = "{\"character\": \"中\", \"medians\": []}\nnot json\n";
        let err = parse_dataset(input).expect_err("must fail");
        let ParseError::DatasetLine { line, .. } = err;
        assert_eq!(line, 2);
    }

    #[test]
    fn lesson_set_membership() {
        let lessons = LessonSet::new("中安 好\n再見");
        assert_eq!(lessons.len(), 6);
        assert!(lessons.contains_str("中"));
        assert!(lessons.contains_str("見"));
        assert!(!lessons.contains_str("的"));
        // Multi-character strings are never members.
        assert!(!lessons.contains_str("再見"));
        assert!(!lessons.contains_str(""));
    }

    #[test]
    fn filter_keeps_order_and_drops_medianless() {
        let entries = parse_dataset(dataset()).expect("parses");
        let lessons = LessonSet::new("安的中");
        let kept = filter_lessons(entries, &lessons);
        // 的 has no medians, 好 is not a lesson character; dataset order
        // is preserved for the rest.
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].character, "中");
        assert_eq!(kept[1].character, "安");
    }

    #[test]
    fn jsonl_roundtrip() {
        let entries = parse_dataset(dataset()).expect("parses");
        let lessons = LessonSet::new("中好安的");
        let kept = filter_lessons(entries, &lessons);
        let jsonl = to_jsonl(&kept).expect("serializes");

        assert_eq!(jsonl.lines().count(), 3);
        // Hanzi are written as UTF-8, not escaped.
        assert!(jsonl.contains('中'));
        // The dropped upstream fields are gone.
        assert!(!jsonl.contains("strokes"));

        let reparsed = parse_dataset(&jsonl).expect("round-trips");
        assert_eq!(reparsed, kept);
    }

    #[test]
    fn empty_lesson_set_keeps_nothing() {
        let entries = parse_dataset(dataset()).expect("parses");
        let kept = filter_lessons(entries, &LessonSet::new(""));
        assert!(kept.is_empty());
    }
}
