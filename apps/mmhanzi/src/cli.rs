//! # CLI Commands
//!
//! File I/O and diagnostics around the pure conversion engine.
//!
//! Each `cmd_*` function backs one subcommand and is exercised directly by
//! the integration tests. Skipped input lines surface here as warnings;
//! the core never logs.

use mmhanzi_core::medians::{self, LessonSet};
use mmhanzi_core::{dict, graphics};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Lesson characters of the consuming app's curriculum, used when no
/// character set is given on the command line.
pub const DEFAULT_LESSON_CHARS: &str = "點唱歌分見面從中午得銀行時候後天大安下次沒問題對了\
有空再見在午餐剛下課下午半比賽結束最近忙每天書法課開始字寫可以問等一下有事有意思坐火車跟玩\
怎麼慢鐘頭比較快車票非常但是又舒服站或是臺南高鐵網路上便利商店同學參觀古代騎機車載捷運比故\
宮博物院中國公共汽車不行計程車差不多";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors of the command layer.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An output file or directory could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The stroke-median dataset was malformed.
    #[error(transparent)]
    Parse(#[from] mmhanzi_core::ParseError),
    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The lesson character set resolved to no characters.
    #[error("the lesson character set is empty")]
    EmptyLessonSet,
}

fn read_input(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// MEDIANS COMMAND
// =============================================================================

/// Filter the stroke-median dataset down to a lesson character set.
///
/// The lesson set comes from `chars`, from the contents of `chars_file`,
/// or from the built-in curriculum, in that order of preference.
pub fn cmd_medians(
    input: &Path,
    output: &Path,
    chars: Option<&str>,
    chars_file: Option<&Path>,
) -> Result<(), CliError> {
    let lessons = load_lesson_set(chars, chars_file)?;
    info!(characters = lessons.len(), "lesson set loaded");

    let entries = medians::parse_dataset(&read_input(input)?)?;
    let total = entries.len();
    let kept = medians::filter_lessons(entries, &lessons);
    info!(
        total,
        kept = kept.len(),
        "filtered dataset to lesson characters"
    );

    write_output(output, &medians::to_jsonl(&kept)?)?;
    info!(path = %output.display(), "wrote filtered medians");
    Ok(())
}

/// Resolve the lesson character set from the command-line options.
fn load_lesson_set(
    chars: Option<&str>,
    chars_file: Option<&Path>,
) -> Result<LessonSet, CliError> {
    let spec = match (chars, chars_file) {
        (Some(spec), _) => spec.to_string(),
        (None, Some(path)) => read_input(path)?,
        (None, None) => DEFAULT_LESSON_CHARS.to_string(),
    };
    let lessons = LessonSet::new(&spec);
    if lessons.is_empty() {
        return Err(CliError::EmptyLessonSet);
    }
    Ok(lessons)
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Convert `graphics.txt` / `dictionary.txt` into normalized JSON maps.
///
/// A missing input file is a warning, not an error: the tool converts
/// whatever it is given and still succeeds, like the script it replaces.
pub fn cmd_convert(graphics_path: &Path, dict_path: &Path, out_dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(out_dir).map_err(|source| CliError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    if graphics_path.exists() {
        convert_graphics(graphics_path, &out_dir.join("graphics.json"))?;
    } else {
        warn!(path = %graphics_path.display(), "graphics file not found, skipping");
    }

    if dict_path.exists() {
        convert_dict(dict_path, &out_dir.join("dict.json"))?;
    } else {
        warn!(path = %dict_path.display(), "dictionary file not found, skipping");
    }

    Ok(())
}

fn convert_graphics(input: &Path, output: &Path) -> Result<(), CliError> {
    let report = graphics::parse_file(&read_input(input)?);
    for skipped in &report.skipped {
        warn!("graphics {skipped}");
    }
    info!(
        characters = report.strokes.len(),
        skipped = report.skipped.len(),
        "parsed graphics file"
    );
    write_output(output, &serde_json::to_string_pretty(&report.strokes)?)?;
    info!(path = %output.display(), "wrote graphics map");
    Ok(())
}

fn convert_dict(input: &Path, output: &Path) -> Result<(), CliError> {
    let report = dict::parse_file(&read_input(input)?);
    for skipped in &report.skipped {
        warn!("dictionary {skipped}");
    }
    info!(
        entries = report.entries.len(),
        skipped = report.skipped.len(),
        "parsed dictionary file"
    );
    write_output(output, &serde_json::to_string_pretty(&report.entries)?)?;
    info!(path = %output.display(), "wrote dictionary map");
    Ok(())
}
