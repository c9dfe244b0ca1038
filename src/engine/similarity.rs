use crate::engine::hybrid::DiffOptions;
use crate::engine::line::FileSequence;
use derive_new::new;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A scored pairing of an unresolved old line with an unresolved new line.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub old: usize,
    pub new: usize,
    pub score: f64,
}

/// Fuzzy second-pass matcher for the lines the exact pass left unresolved.
///
/// Every cross pair is scored with a weighted blend of content similarity
/// (normalized Levenshtein over the comparison keys) and context similarity
/// (cosine over bag-of-words vectors of the surrounding lines). Pairs are
/// then consumed greedily in descending score order, subject to the
/// threshold, one-use-per-index, and order preservation against every
/// already-placed pair. The greedy sweep is a heuristic, not an optimal
/// assignment; ties fall to the smallest old index, then the smallest new
/// index, and callers depend on that tie-breaking.
#[derive(Debug, new)]
pub struct SimilarityMatcher<'s> {
    old: &'s FileSequence,
    new: &'s FileSequence,
    options: &'s DiffOptions,
}

impl SimilarityMatcher<'_> {
    /// Select a conflict-free, order-preserving set of fuzzy matches among
    /// the unresolved indices. `anchors` are the `(old, new)` pairs already
    /// placed by the exact pass; no selected candidate may invert the
    /// relative order of any placed pair.
    pub fn select(
        &self,
        unresolved_old: &[usize],
        unresolved_new: &[usize],
        anchors: &[(usize, usize)],
    ) -> Vec<Candidate> {
        if unresolved_old.is_empty() || unresolved_new.is_empty() {
            return Vec::new();
        }

        let old_contexts: HashMap<usize, HashMap<String, usize>> = unresolved_old
            .iter()
            .map(|&idx| (idx, context_counts(self.old, idx, self.options.context_radius)))
            .collect();
        let new_contexts: HashMap<usize, HashMap<String, usize>> = unresolved_new
            .iter()
            .map(|&idx| (idx, context_counts(self.new, idx, self.options.context_radius)))
            .collect();

        let mut candidates = Vec::with_capacity(unresolved_old.len() * unresolved_new.len());
        for &old in unresolved_old {
            let old_key = self.old.lines()[old].key.as_str();
            for &new in unresolved_new {
                let new_key = self.new.lines()[new].key.as_str();
                let content = content_score(old_key, new_key);
                let context = cosine_similarity(&old_contexts[&old], &new_contexts[&new]);
                let score =
                    self.options.content_weight * content + self.options.context_weight * context;
                candidates.push(Candidate { old, new, score });
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.old.cmp(&b.old))
                .then_with(|| a.new.cmp(&b.new))
        });

        let mut placed: Vec<(usize, usize)> = anchors.to_vec();
        let mut used_old = HashSet::new();
        let mut used_new = HashSet::new();
        let mut selected = Vec::new();

        for candidate in candidates {
            if candidate.score < self.options.similarity_threshold {
                break;
            }
            if used_old.contains(&candidate.old) || used_new.contains(&candidate.new) {
                continue;
            }
            if crosses_placed_pair(&placed, candidate.old, candidate.new) {
                continue;
            }

            used_old.insert(candidate.old);
            used_new.insert(candidate.new);
            placed.push((candidate.old, candidate.new));
            selected.push(candidate);
        }

        selected
    }
}

/// True when pairing `(old, new)` would invert the relative order of an
/// already-placed pair.
fn crosses_placed_pair(placed: &[(usize, usize)], old: usize, new: usize) -> bool {
    placed
        .iter()
        .any(|&(a, b)| (a < old && b > new) || (a > old && b < new))
}

/// Content similarity in `[0, 1]`: one minus the Levenshtein distance
/// normalized by the longer key. Two empty keys count as identical.
fn content_score(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (1.0 - distance as f64 / longest as f64).clamp(0.0, 1.0)
}

/// Levenshtein edit distance over characters, two-row DP.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Bag-of-words counts over the keys of the lines within `radius` of
/// `idx`, the line itself excluded. Out-of-range neighbors contribute
/// nothing.
fn context_counts(
    sequence: &FileSequence,
    idx: usize,
    radius: usize,
) -> HashMap<String, usize> {
    let lines = sequence.lines();
    let start = idx.saturating_sub(radius);
    let end = (idx + radius + 1).min(lines.len());

    let mut counts = HashMap::new();
    for (offset, line) in lines[start..end].iter().enumerate() {
        if start + offset == idx {
            continue;
        }
        for token in line.key.split_whitespace() {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Cosine similarity between two non-negative frequency vectors, in
/// `[0, 1]`. Two empty contexts are treated as identical; exactly one
/// empty context shares nothing with the other.
fn cosine_similarity(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(token, &count_a)| {
            b.get(token).map(|&count_b| count_a as f64 * count_b as f64)
        })
        .sum();

    let norm_a = a.values().map(|&v| (v * v) as f64).sum::<f64>().sqrt();
    let norm_b = b.values().map(|&v| (v * v) as f64).sum::<f64>().sqrt();
    let denominator = norm_a * norm_b;
    if denominator == 0.0 {
        return 0.0;
    }

    (dot / denominator).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use crate::engine::hybrid::DiffOptions;
    use crate::engine::line::FileSequence;
    use crate::engine::similarity::{
        SimilarityMatcher, content_score, cosine_similarity, crosses_placed_pair, levenshtein,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn counts(tokens: &[&str]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for token in tokens {
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
        counts
    }

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "abc", 0)]
    #[case("abc", "", 3)]
    #[case("", "xyz", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    fn computes_levenshtein_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
    }

    #[rstest]
    fn content_score_is_normalized_by_longer_key() {
        // distance 3 over length 7
        let score = content_score("kitten", "sitting");
        assert!((score - (1.0 - 3.0 / 7.0)).abs() < 1e-12);
    }

    #[rstest]
    fn content_score_of_empty_keys_is_one() {
        assert_eq!(content_score("", ""), 1.0);
    }

    #[rstest]
    fn cosine_of_identical_bags_is_one() {
        let bag = counts(&["int", "x", "=", "5"]);
        assert!((cosine_similarity(&bag, &bag) - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn cosine_of_disjoint_bags_is_zero() {
        let a = counts(&["foo"]);
        let b = counts(&["bar"]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[rstest]
    fn cosine_of_two_empty_bags_is_one() {
        assert_eq!(cosine_similarity(&HashMap::new(), &HashMap::new()), 1.0);
        assert_eq!(cosine_similarity(&HashMap::new(), &counts(&["x"])), 0.0);
    }

    #[rstest]
    fn detects_order_inversions_against_placed_pairs() {
        let placed = vec![(2, 2)];
        assert!(crosses_placed_pair(&placed, 1, 3));
        assert!(crosses_placed_pair(&placed, 3, 1));
        assert!(!crosses_placed_pair(&placed, 1, 1));
        assert!(!crosses_placed_pair(&placed, 3, 3));
    }

    #[rstest]
    fn matches_similar_lines_above_threshold() {
        let old = FileSequence::verbatim(["foo(a,b)"]);
        let new = FileSequence::verbatim(["foo(a, b, c)"]);
        let options = DiffOptions::default();

        let matcher = SimilarityMatcher::new(&old, &new, &options);
        let selected = matcher.select(&[0], &[0], &[]);

        assert_eq!(selected.len(), 1);
        assert_eq!((selected[0].old, selected[0].new), (0, 0));
        assert!(selected[0].score >= options.similarity_threshold);
    }

    #[rstest]
    fn rejects_pairs_below_threshold() {
        let old = FileSequence::verbatim(["alpha beta gamma"]);
        let new = FileSequence::verbatim(["0123456789012345"]);
        let options = DiffOptions::default();

        let matcher = SimilarityMatcher::new(&old, &new, &options);

        assert_eq!(matcher.select(&[0], &[0], &[]).len(), 0);
    }

    #[rstest]
    fn accepts_score_exactly_at_threshold() {
        // Identical keys and no context: content 1.0, context 1.0.
        let old = FileSequence::verbatim(["same line"]);
        let new = FileSequence::verbatim(["same line"]);
        let options = DiffOptions {
            similarity_threshold: 1.0,
            ..DiffOptions::default()
        };

        let matcher = SimilarityMatcher::new(&old, &new, &options);

        assert_eq!(matcher.select(&[0], &[0], &[]).len(), 1);
    }

    #[rstest]
    fn never_inverts_exact_match_anchors() {
        let old = FileSequence::verbatim(["shared_line_xyz", "anchor"]);
        let new = FileSequence::verbatim(["anchor", "shared_line_xyz"]);
        let options = DiffOptions::default();

        // The anchor maps old 1 -> new 0; pairing old 0 with new 1 would
        // cross it, however similar the lines are.
        let matcher = SimilarityMatcher::new(&old, &new, &options);
        let selected = matcher.select(&[0], &[1], &[(1, 0)]);

        assert_eq!(selected.len(), 0);
    }

    #[rstest]
    fn consumes_each_index_at_most_once() {
        let old = FileSequence::verbatim(["value = compute(input)"]);
        let new = FileSequence::verbatim(["value = compute(input);", "value = compute(inputs)"]);
        let options = DiffOptions::default();

        let matcher = SimilarityMatcher::new(&old, &new, &options);
        let selected = matcher.select(&[0], &[0, 1], &[]);

        assert_eq!(selected.len(), 1);
        // Equal scores tie-break to the smallest new index.
        assert_eq!((selected[0].old, selected[0].new), (0, 0));
    }
}
