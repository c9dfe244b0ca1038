use crate::engine::edit::{EditOp, EditScript};
use derive_new::new;

/// Exact shortest-edit-script search over two comparison-key sequences.
///
/// Classic frontier-based search over the edit graph: for each edit
/// distance `d` the furthest reachable `x` is kept per diagonal
/// `k = x - y` in a flat vector indexed by `offset + k`, and every step
/// greedily extends along free diagonal runs (equal keys) so unchanged
/// regions stay contiguous. When two minimal scripts exist the insertion
/// predecessor wins unless the deletion predecessor reaches strictly
/// further, which yields the positionally earliest script.
///
/// Runs in `O(N * D)` where `N` is the combined length and `D` the edit
/// distance; `O(N^2)` when the inputs share nothing.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    old: &'d [T],
    new: &'d [T],
}

impl<T: Eq> MyersDiff<'_, T> {
    /// Frontier snapshots per edit distance, up to the first `d` that
    /// reaches `(n, m)`.
    fn compute_trace(&self) -> Vec<Vec<isize>> {
        let (n, m) = (self.old.len() as isize, self.new.len() as isize);
        let offset = (n + m) as usize;

        let mut frontier = vec![0isize; 2 * offset + 1];
        let mut trace = Vec::new();

        for d in 0..=(n + m) {
            trace.push(frontier.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (offset as isize + k) as usize;

                // Entering diagonal k costs one non-diagonal move: from
                // k+1 it is an insertion (x unchanged), from k-1 a
                // deletion (x advances). Prefer the insertion predecessor
                // unless deleting reaches strictly further.
                let mut x = if k == -d {
                    frontier[idx + 1]
                } else if k == d {
                    frontier[idx - 1] + 1
                } else {
                    let from_delete = frontier[idx - 1] + 1;
                    let from_insert = frontier[idx + 1];
                    if from_delete > from_insert {
                        from_delete
                    } else {
                        from_insert
                    }
                };

                // Free diagonal run while keys agree.
                let mut y = x - k;
                while x < n && y < m && self.old[x as usize] == self.new[y as usize] {
                    x += 1;
                    y += 1;
                }

                frontier[idx] = x;

                if x >= n && y >= m {
                    return trace;
                }
            }
        }

        trace
    }

    /// Walk the trace backwards from `(n, m)`, recovering each move as a
    /// `(prev_x, prev_y, x, y)` segment in reverse order.
    fn backtrack(&self) -> Vec<(isize, isize, isize, isize)> {
        let (mut x, mut y) = (self.old.len() as isize, self.new.len() as isize);
        let offset = (x + y) as usize;
        let mut path = Vec::new();

        let trace = self.compute_trace();

        for (d, frontier) in trace.iter().enumerate().rev() {
            let k = x - y;

            let prev_k = if k == -(d as isize) {
                k + 1
            } else if k == d as isize {
                k - 1
            } else {
                let from_delete = frontier[(offset as isize + k - 1) as usize] + 1;
                let from_insert = frontier[(offset as isize + k + 1) as usize];
                if from_delete > from_insert { k - 1 } else { k + 1 }
            };

            let prev_x = frontier[(offset as isize + prev_k) as usize];
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                path.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                path.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        path
    }

    /// The minimal edit script aligning the two sequences. Contains only
    /// `Match`, `Insert`, and `Delete` operations.
    pub fn diff(&self) -> EditScript {
        if self.old.is_empty() && self.new.is_empty() {
            return EditScript::default();
        }

        let mut ops = Vec::new();

        for (prev_x, prev_y, x, y) in self.backtrack() {
            if x == prev_x {
                // Only y advanced: a line of the new file has no counterpart.
                if prev_y < self.new.len() as isize {
                    ops.push(EditOp::Insert {
                        new: prev_y as usize,
                    });
                }
            } else if y == prev_y {
                // Only x advanced: a line of the old file has no counterpart.
                if prev_x < self.old.len() as isize {
                    ops.push(EditOp::Delete {
                        old: prev_x as usize,
                    });
                }
            } else {
                // Diagonal move: keys compared equal.
                ops.push(EditOp::Match {
                    old: prev_x as usize,
                    new: prev_y as usize,
                });
            }
        }

        ops.reverse();
        EditScript::new(ops)
    }
}
