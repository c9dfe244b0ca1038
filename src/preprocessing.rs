//! Line normalization applied before diffing
//!
//! Normalization makes the comparison keys insensitive to the noise that
//! routinely changes between versions of source code: indentation, tabs,
//! casing, inline comments, operator spacing, and trailing semicolons.
//! The engine itself never looks inside a key; everything here is glue in
//! front of it.

use crate::engine::line::{FileSequence, Line};
use anyhow::Context;
use regex::Regex;
use std::path::Path;

const COMMENT_PATTERN: &str = r"//|#";
const OPERATOR_PATTERN: &str = r"([=+\-*/<>])";
const SPACE_RUN_PATTERN: &str = r"\s+";

/// Turns raw source lines into comparison keys.
///
/// Compiles its patterns once; reuse one normalizer across files.
#[derive(Debug)]
pub struct Normalizer {
    comment: Regex,
    operator: Regex,
    spaces: Regex,
}

impl Normalizer {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Normalizer {
            comment: Regex::new(COMMENT_PATTERN)?,
            operator: Regex::new(OPERATOR_PATTERN)?,
            spaces: Regex::new(SPACE_RUN_PATTERN)?,
        })
    }

    /// Normalize one line: trim, tabs to spaces, lowercase, strip `//` and
    /// `#` comments, space out basic operators, collapse space runs, drop
    /// trailing semicolons. Comment-only lines normalize to the empty key.
    pub fn normalize(&self, line: &str) -> String {
        let line = line.trim().replace('\t', " ").to_lowercase();

        let line = match self.comment.find(&line) {
            Some(found) => line[..found.start()].trim().to_string(),
            None => line,
        };
        if line.is_empty() {
            return String::new();
        }

        let line = self.operator.replace_all(&line, " $1 ");
        let line = self.spaces.replace_all(&line, " ");
        line.trim_end_matches([' ', ';']).to_string()
    }

    /// Split a file's content into lines and attach normalized keys.
    pub fn sequence_from_text(&self, text: &str) -> FileSequence {
        let lines = text
            .lines()
            .map(|line| Line::new(line.to_string(), self.normalize(line)))
            .collect();
        FileSequence::new(lines)
    }
}

/// Load a file into a sequence, normalized when a normalizer is given and
/// verbatim otherwise. Unreadable or non-UTF-8 files are boundary errors;
/// the engine never sees them.
pub fn load_file(path: &Path, normalizer: Option<&Normalizer>) -> anyhow::Result<FileSequence> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(match normalizer {
        Some(normalizer) => normalizer.sequence_from_text(&text),
        None => FileSequence::verbatim(text.lines().map(str::to_string)),
    })
}
