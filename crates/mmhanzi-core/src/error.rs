//! # Error Types
//!
//! Failures of the strict dataset path. The permissive parsers never fail;
//! they report unusable lines instead (see [`crate::SkippedLine`]).

use thiserror::Error;

/// Errors produced while reading the curated stroke-median dataset.
///
/// The dataset is machine-generated JSON lines, so a malformed line means
/// the input is corrupt and the conversion must stop rather than silently
/// drop data.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A dataset line was not a valid entry object.
    #[error("invalid dataset entry on line {line}: {source}")]
    DatasetLine {
        /// 1-based line number in the input.
        line: usize,
        /// The underlying JSON decode error.
        #[source]
        source: serde_json::Error,
    },
}
