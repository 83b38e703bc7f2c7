//! Covering solvers.
//!
//! Given a [`CoveringMatrix`], select rows whose distinguished pairs together cover all
//! pairs of i-sets, at minimum total cost. Two solvers are provided:
//!
//! - [`solve_exact`]: branch and bound over sets of at most `d` rows, normally
//!   `d = ⌈log₂ μ⌉` (the fewest that can tell `μ` classes apart). Each level branches
//!   on the rows distinguishing the lowest uncovered pair, and drops partial selections
//!   whose cost already reaches the best cover found. Ties go to the first cover found.
//! - [`solve_heuristic`]: greedy construction (most newly covered pairs first) followed
//!   by [`improve`], a 1-exchange local search that replaces a selected row by a
//!   cheaper one as long as the cover stays complete.

use log::debug;

use crate::encoding::{CoveringMatrix, CoveringRow};
use crate::pairs::PairSet;
use crate::utils::ceil_log2;

/// Upper bound on the partial selections visited by [`solve_exact`].
pub const EXACT_NODE_BUDGET: u64 = 1 << 24;

/// A selection of covering-matrix rows.
#[derive(Debug, Clone, Default)]
pub struct Cover {
    /// Selected rows, in selection order.
    pub rows: Vec<CoveringRow>,
}

impl Cover {
    /// Total cost of the selection.
    pub fn cost(&self) -> u32 {
        self.rows.iter().map(|r| r.cost).sum()
    }

    /// Union of the pairs distinguished by the selected rows.
    pub fn pairs(&self) -> PairSet {
        self.rows.iter().fold(PairSet::empty(), |acc, r| acc.union(r.pairs))
    }
}

struct ExactSearch<'a> {
    matrix: &'a CoveringMatrix,
    depth: usize,
    limit: u32,
    budget: u64,
    max_pairs: usize,
    found: u32,
    nodes: u64,
    best_cost: u32,
    best: Vec<usize>,
    stack: Vec<usize>,
}

impl ExactSearch<'_> {
    /// Returns false once the search must stop.
    ///
    /// Every cover has to distinguish the lowest pair not yet covered, so each level
    /// only branches on the rows that do.
    fn search(&mut self, covered: PairSet, cost: u32) -> bool {
        let missing = self.matrix.target.difference(covered);
        let Some(pair) = missing.iter().next() else {
            return true;
        };
        let levels_left = self.depth - self.stack.len();
        if missing.len() > levels_left * self.max_pairs {
            return true;
        }

        for i in 0..self.matrix.rows.len() {
            let row = &self.matrix.rows[i];
            // Rows are sorted by cost, so nothing further in this level can be cheaper.
            if cost + row.cost >= self.best_cost {
                break;
            }
            if !row.pairs.contains(pair) {
                continue;
            }
            self.nodes += 1;
            if self.nodes > self.budget {
                return false;
            }

            let covered = covered.union(row.pairs);
            self.stack.push(i);
            if covered == self.matrix.target {
                self.found += 1;
                self.best_cost = cost + row.cost;
                self.best = self.stack.clone();
                if self.found >= self.limit {
                    self.stack.pop();
                    return false;
                }
            } else if levels_left > 1 && !self.search(covered, cost + row.cost) {
                self.stack.pop();
                return false;
            }
            self.stack.pop();
        }
        true
    }
}

/// Minimum number of rows that can cover all pairs of `multiplicity` i-sets.
pub fn min_depth(multiplicity: u32) -> usize {
    ceil_log2(multiplicity) as usize
}

/// Finds the cheapest cover with at most `depth` rows.
///
/// The search stops early after `limit` improving covers, or when the node budget runs
/// out; the best cover seen so far is returned. Returns `None` if none was found.
pub fn solve_exact(matrix: &CoveringMatrix, depth: usize, limit: u32) -> Option<Cover> {
    solve_exact_bounded(matrix, depth, limit, EXACT_NODE_BUDGET)
}

fn solve_exact_bounded(matrix: &CoveringMatrix, depth: usize, limit: u32, budget: u64) -> Option<Cover> {
    if matrix.is_empty() || depth == 0 {
        return None;
    }
    let mut search = ExactSearch {
        matrix,
        depth,
        limit: limit.max(1),
        budget,
        max_pairs: matrix.rows.iter().map(|r| r.pairs.len()).max().unwrap_or(0),
        found: 0,
        nodes: 0,
        best_cost: u32::MAX,
        best: Vec::new(),
        stack: Vec::with_capacity(depth),
    };
    let complete = search.search(PairSet::empty(), 0);

    debug!(
        "exact covering: depth {}, {} covers, {} nodes, best cost {}{}",
        depth,
        search.found,
        search.nodes,
        search.best_cost,
        if complete || search.found >= search.limit { "" } else { " (node budget exhausted)" }
    );

    if search.best.is_empty() {
        return None;
    }
    Some(Cover {
        rows: search.best.iter().map(|&i| matrix.rows[i]).collect(),
    })
}

/// Greedily builds a cover of at most `max_rows` rows, then improves it by local search.
pub fn solve_heuristic(matrix: &CoveringMatrix, max_rows: usize, max_iter: u32) -> Option<Cover> {
    if matrix.is_empty() {
        return None;
    }

    let mut selected: Vec<usize> = Vec::new();
    let mut covered = PairSet::empty();

    while covered != matrix.target && selected.len() < max_rows {
        // Most newly covered pairs wins; rows are sorted by cost, so ties go to the cheaper.
        let mut best: Option<(usize, usize)> = None;
        for (i, row) in matrix.rows.iter().enumerate() {
            let gain = row.pairs.difference(covered).len();
            if gain == 0 || selected.contains(&i) {
                continue;
            }
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((i, gain));
            }
        }
        let (i, _) = best?;
        covered = covered.union(matrix.rows[i].pairs);
        selected.push(i);
    }

    if covered != matrix.target {
        debug!("heuristic covering: no cover within {} rows", max_rows);
        return None;
    }

    improve(matrix, &mut selected, max_iter);

    let cover = Cover {
        rows: selected.iter().map(|&i| matrix.rows[i]).collect(),
    };
    debug!("heuristic covering: {} rows, cost {}", cover.rows.len(), cover.cost());
    Some(cover)
}

/// 1-exchange local search: replaces selected rows by cheaper ones keeping the cover complete.
///
/// Runs until no replacement improves the cost, or for at most `max_iter` rounds.
pub fn improve(matrix: &CoveringMatrix, selected: &mut [usize], max_iter: u32) {
    for _ in 0..max_iter {
        let mut improved = false;
        for s in 0..selected.len() {
            let others = selected
                .iter()
                .enumerate()
                .filter(|&(t, _)| t != s)
                .fold(PairSet::empty(), |acc, (_, &i)| acc.union(matrix.rows[i].pairs));
            let current_cost = matrix.rows[selected[s]].cost;

            let replacement = matrix.rows.iter().enumerate().position(|(i, row)| {
                row.cost < current_cost && !selected.contains(&i) && others.union(row.pairs) == matrix.target
            });
            if let Some(i) = replacement {
                selected[s] = i;
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
}
