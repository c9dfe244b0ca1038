use sha1::{Digest, Sha1};
use std::fmt::Display;

/// A single alignment operation between the old and the new sequence.
/// Indices are 0-based positions in the respective file.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Keys compared equal.
    Match { old: usize, new: usize },
    /// Keys differ but the combined similarity reached the threshold.
    SimilarityMatch { old: usize, new: usize, score: f64 },
    /// The new line has no correspondence in the old sequence.
    Insert { new: usize },
    /// The old line has no correspondence in the new sequence.
    Delete { old: usize },
}

impl EditOp {
    /// Literal token encoding consumed by line-tracking tools:
    /// `old:new`, `old~new`, `new+`, `old-`.
    pub fn as_token(&self) -> String {
        match self {
            EditOp::Match { old, new } => format!("{old}:{new}"),
            EditOp::SimilarityMatch { old, new, .. } => format!("{old}~{new}"),
            EditOp::Insert { new } => format!("{new}+"),
            EditOp::Delete { old } => format!("{old}-"),
        }
    }

    pub fn old_index(&self) -> Option<usize> {
        match *self {
            EditOp::Match { old, .. }
            | EditOp::SimilarityMatch { old, .. }
            | EditOp::Delete { old } => Some(old),
            EditOp::Insert { .. } => None,
        }
    }

    pub fn new_index(&self) -> Option<usize> {
        match *self {
            EditOp::Match { new, .. }
            | EditOp::SimilarityMatch { new, .. }
            | EditOp::Insert { new } => Some(new),
            EditOp::Delete { .. } => None,
        }
    }
}

impl Display for EditOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

/// An ordered, total alignment between two sequences.
///
/// Every old index appears in exactly one `Match`, `SimilarityMatch`, or
/// `Delete`; every new index in exactly one `Match`, `SimilarityMatch`, or
/// `Insert`. Old indices are non-decreasing across the script, and new
/// indices are non-decreasing among operations that define one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    pub fn new(ops: Vec<EditOp>) -> Self {
        EditScript { ops }
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<EditOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.ops.iter().map(EditOp::as_token).collect()
    }

    /// Canonical single-string rendering, used for hashing.
    pub fn render(&self) -> String {
        self.tokens().join("|")
    }

    /// SHA-1 hex digest of the canonical rendering. Deterministic for
    /// identical inputs and options, so callers can use it as a cache key.
    pub fn digest(&self) -> String {
        let digest = Sha1::digest(self.render().as_bytes());
        digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>()
    }
}
