use crate::engine::edit::{EditOp, EditScript};
use crate::engine::line::FileSequence;
use crate::engine::myers::MyersDiff;
use crate::engine::similarity::SimilarityMatcher;
use anyhow::{anyhow, bail};
use derive_new::new;
use std::collections::{HashMap, HashSet};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Tunable parameters for one diff run.
///
/// Passed explicitly into both passes; nothing is ambient or shared, so
/// concurrent diff calls cannot observe each other's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Minimum combined score for a fuzzy match; a pair scoring exactly
    /// the threshold is accepted.
    pub similarity_threshold: f64,
    /// When false the fuzzy pass is skipped entirely and the result is
    /// the exact-match script.
    pub use_similarity: bool,
    pub content_weight: f64,
    pub context_weight: f64,
    /// Lines on each side of a candidate that feed its context vector.
    pub context_radius: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            similarity_threshold: 0.6,
            use_similarity: true,
            content_weight: 0.6,
            context_weight: 0.4,
            context_radius: 4,
        }
    }
}

impl DiffOptions {
    /// Reject invalid configuration before any computation starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            bail!(
                "invalid configuration: similarity threshold {} is outside [0, 1]",
                self.similarity_threshold
            );
        }
        for (name, weight) in [
            ("content", self.content_weight),
            ("context", self.context_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                bail!(
                    "invalid configuration: {} weight {} is outside [0, 1]",
                    name,
                    weight
                );
            }
        }
        if (self.content_weight + self.context_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!(
                "invalid configuration: content and context weights must sum to 1, got {} + {}",
                self.content_weight,
                self.context_weight
            );
        }

        Ok(())
    }
}

/// Two-pass hybrid diff over a pair of file sequences.
///
/// The exact pass aligns equal comparison keys via the shortest edit
/// script; the fuzzy pass then re-examines the leftover deletes and
/// inserts and links the sufficiently similar ones. The merged script is
/// total and monotonic: every old index appears exactly once, every new
/// index appears exactly once, and indices never decrease along the
/// script.
#[derive(Debug, new)]
pub struct HybridDiff<'d> {
    old: &'d FileSequence,
    new: &'d FileSequence,
    options: DiffOptions,
}

impl HybridDiff<'_> {
    pub fn diff(&self) -> anyhow::Result<EditScript> {
        self.options.validate()?;

        let old_keys = self.old.keys();
        let new_keys = self.new.keys();
        let base = MyersDiff::new(&old_keys, &new_keys).diff();

        let mut exact: HashMap<usize, usize> = HashMap::new();
        let mut unresolved_old = Vec::new();
        let mut unresolved_new = Vec::new();
        for op in base.ops() {
            match *op {
                EditOp::Match { old, new } => {
                    exact.insert(old, new);
                }
                EditOp::Delete { old } => unresolved_old.push(old),
                EditOp::Insert { new } => unresolved_new.push(new),
                EditOp::SimilarityMatch { old, new, .. } => {
                    return Err(anyhow!(
                        "exact pass produced a similarity match {}~{}",
                        old,
                        new
                    ));
                }
            }
        }

        let fuzzy = if self.options.use_similarity {
            let anchors: Vec<(usize, usize)> =
                exact.iter().map(|(&old, &new)| (old, new)).collect();
            SimilarityMatcher::new(self.old, self.new, &self.options).select(
                &unresolved_old,
                &unresolved_new,
                &anchors,
            )
        } else {
            Vec::new()
        };

        let fuzzy_by_old: HashMap<usize, (usize, f64)> = fuzzy
            .iter()
            .map(|candidate| (candidate.old, (candidate.new, candidate.score)))
            .collect();
        let consumed_new: HashSet<usize> =
            fuzzy.iter().map(|candidate| candidate.new).collect();

        // Rebuild in old-index order, substituting consumed delete/insert
        // pairs with their similarity match.
        let mut by_old = Vec::with_capacity(self.old.len());
        for old in 0..self.old.len() {
            if let Some(&new) = exact.get(&old) {
                by_old.push(EditOp::Match { old, new });
            } else if let Some(&(new, score)) = fuzzy_by_old.get(&old) {
                by_old.push(EditOp::SimilarityMatch { old, new, score });
            } else {
                by_old.push(EditOp::Delete { old });
            }
        }

        // Interleave leftover inserts immediately before the first
        // operation whose new index exceeds them, restoring monotonicity.
        let mut inserts = unresolved_new
            .iter()
            .copied()
            .filter(|new| !consumed_new.contains(new))
            .peekable();
        let mut ops = Vec::with_capacity(self.old.len() + self.new.len());
        for op in by_old {
            if let Some(new) = op.new_index() {
                while let Some(&pending) = inserts.peek() {
                    if pending >= new {
                        break;
                    }
                    ops.push(EditOp::Insert { new: pending });
                    inserts.next();
                }
            }
            ops.push(op);
        }
        ops.extend(inserts.map(|new| EditOp::Insert { new }));

        Ok(EditScript::new(ops))
    }

    /// The merged script together with the SHA-1 digest of its canonical
    /// rendering.
    pub fn diff_with_digest(&self) -> anyhow::Result<(EditScript, String)> {
        let script = self.diff()?;
        let digest = script.digest();
        Ok((script, digest))
    }
}
