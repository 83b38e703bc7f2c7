//! Free-set search.
//!
//! # Theory
//!
//! An Ashenhurst-Curtis decomposition splits the inputs into a *free set* `F`, which
//! feeds the top LUT directly, and a *bound set* `B`, which feeds the bound-set LUTs:
//!
//! ```text
//! f(F, B) = h(F, g₁(B), ..., gᵣ(B))
//! ```
//!
//! The bound-set LUTs must tell apart every pair of bound-set assignments whose
//! columns differ, so the column multiplicity `μ` of the partition dictates
//! `r ≥ ⌈log₂ μ⌉`. The search tries every free set of each admissible size and keeps
//! the one with the lowest multiplicity.
//!
//! # Enumeration
//!
//! Candidate free sets of size `k` are visited in lexicographic order. Moving from one
//! combination to the next only swaps the truth-table positions whose rank in the
//! combination changed, so each step costs a handful of [`TruthTable::swap_vars`]
//! calls instead of a rebuild. The first `offset` positions hold late-arriving inputs
//! and never move.

use log::{debug, trace};

use crate::error::AcdError;
use crate::multiplicity::column_multiplicity;
use crate::params::AcdParams;
use crate::truth_table::{TruthTable, MAX_NUM_VARS};
use crate::types::{Permutation, Profile};

/// Extra cost of a free set that leaves more than `lut_size` bound-set inputs.
pub const NON_SUPPORT_REDUCING_PENALTY: u32 = 128;

/// Outcome of the free-set search.
#[derive(Debug, Copy, Clone)]
pub struct FreeSetSearch {
    /// Truth table permuted so that the free set occupies the low positions.
    pub tt: TruthTable,
    /// Original input at each position of `tt`.
    pub perm: Permutation,
    /// Number of free-set variables.
    pub free_set_size: usize,
    /// Column multiplicity of the chosen partition.
    pub multiplicity: u32,
}

impl FreeSetSearch {
    /// Returns the original inputs in the free set.
    pub fn profile(&self) -> Profile {
        self.perm.prefix_profile(self.free_set_size)
    }

    /// Returns the number of bound-set variables.
    pub fn bound_set_size(&self) -> usize {
        self.tt.num_vars() - self.free_set_size
    }
}

/// Lexicographic stepper over the combinations of positions `offset..num_vars`.
///
/// `rel` maps positions to variables of the table the enumeration started from, and
/// `inv` is its inverse.
struct CombinationStepper {
    num_vars: usize,
    k: usize,
    offset: usize,
    rel: Permutation,
    inv: [usize; MAX_NUM_VARS],
}

impl CombinationStepper {
    fn new(num_vars: usize, k: usize, offset: usize) -> Self {
        debug_assert!(offset < k && k < num_vars);
        let mut inv = [0; MAX_NUM_VARS];
        for (i, v) in inv.iter_mut().enumerate() {
            *v = i;
        }
        Self {
            num_vars,
            k,
            offset,
            rel: Permutation::identity(num_vars),
            inv,
        }
    }

    /// Advances to the next combination, swapping `tt` along. Returns false when done.
    fn advance(&mut self, tt: &mut TruthTable) -> bool {
        let (n, k) = (self.num_vars, self.k);

        let mut i = k - 1;
        while self.rel.var(i) == n - k + i {
            if i == self.offset {
                return false;
            }
            i -= 1;
        }

        // Bump position `i` to the next variable.
        let var_old = self.rel.var(i);
        let pos_new = self.inv[var_old + 1];
        self.inv.swap(var_old + 1, var_old);
        self.rel.swap_with(tt, i, pos_new);

        // Reset the following positions to consecutive variables.
        for j in i + 1..k {
            let var_old = self.rel.var(j);
            let target = self.rel.var(j - 1) + 1;
            let pos_new = self.inv[target];
            self.inv.swap(target, var_old);
            self.rel.swap_with(tt, j, pos_new);
        }

        true
    }
}

/// Enumerates all free sets of `free_set_size` positions that keep the first `offset`
/// positions fixed, and returns the permuted table, the permutation and the cost of the
/// cheapest one. Ties go to the first combination found.
pub fn enumerate_free_sets(
    tt: &TruthTable,
    perm: &Permutation,
    free_set_size: usize,
    offset: usize,
    mut cost_fn: impl FnMut(&TruthTable) -> u32,
) -> (TruthTable, Permutation, u32) {
    let num_vars = tt.num_vars();
    debug_assert!(free_set_size >= offset);

    if free_set_size == offset || free_set_size >= num_vars {
        return (*tt, *perm, cost_fn(tt));
    }

    let mut current = *tt;
    let mut stepper = CombinationStepper::new(num_vars, free_set_size, offset);
    let mut best = (current, stepper.rel, u32::MAX);

    loop {
        let cost = cost_fn(&current);
        trace!("free set {} -> cost {}", perm.compose(&stepper.rel).prefix_profile(free_set_size), cost);
        if cost < best.2 {
            best = (current, stepper.rel, cost);
        }
        if !stepper.advance(&mut current) {
            break;
        }
    }

    let (best_tt, best_rel, best_cost) = best;
    (best_tt, perm.compose(&best_rel), best_cost)
}

/// Moves the late-arriving inputs of `profile` to the lowest positions, in ascending order.
pub fn reposition_late_arriving(tt: &mut TruthTable, perm: &mut Permutation, profile: Profile) {
    for (i, var) in profile.iter().enumerate() {
        if let Some(pos) = perm.position(var) {
            if pos != i {
                perm.swap_with(tt, i, pos);
            }
        }
    }
}

/// Searches the best free set of `tt` under `params`, honouring the delay profile.
pub fn find_free_set(tt: &TruthTable, params: &AcdParams, delay_profile: Profile) -> Result<FreeSetSearch, AcdError> {
    match search_sizes(tt, params, delay_profile) {
        Err(AcdError::NoFeasibleFreeSet) if params.try_no_late_arrival && delay_profile.count() > 0 => {
            debug!("no free set with late arrivals {}, retrying without", delay_profile);
            search_sizes(tt, params, Profile::default())
        }
        res => res,
    }
}

fn search_sizes(tt: &TruthTable, params: &AcdParams, delay_profile: Profile) -> Result<FreeSetSearch, AcdError> {
    let num_vars = tt.num_vars();
    let lut_size = params.lut_size as usize;
    let late_arriving = delay_profile.count();

    let limit = (params.lut_size - 1).min(params.max_free_set_vars) as usize;
    if late_arriving > limit {
        return Err(AcdError::InfeasibleDelayProfile { late_arriving, limit });
    }

    let mut start_tt = *tt;
    let mut start_perm = Permutation::identity(num_vars);
    reposition_late_arriving(&mut start_tt, &mut start_perm, delay_profile);

    let offset = late_arriving;
    let mut start = offset.max(1);
    if params.support_reducing_only {
        start = start.max(num_vars.saturating_sub(lut_size));
    }
    let end = params.free_set_ceiling(num_vars);

    let mut best: Option<FreeSetSearch> = None;
    let mut best_cost = u32::MAX;

    for k in start..=end {
        let (tt_p, perm_p, multiplicity) =
            enumerate_free_sets(&start_tt, &start_perm, k, offset, |t| column_multiplicity(t, k));

        let penalty = if num_vars - k > lut_size {
            NON_SUPPORT_REDUCING_PENALTY
        } else {
            0
        };
        debug!(
            "free set size {}: multiplicity {} (penalty {}), free set {}",
            k,
            multiplicity,
            penalty,
            perm_p.prefix_profile(k)
        );

        let fits = multiplicity <= 1 << (lut_size - k);
        if fits && multiplicity < params.max_multiplicity && multiplicity + penalty < best_cost {
            best_cost = multiplicity + penalty;
            best = Some(FreeSetSearch {
                tt: tt_p,
                perm: perm_p,
                free_set_size: k,
                multiplicity,
            });
            if params.use_first {
                break;
            }
        }
    }

    match best {
        Some(found) => {
            debug!(
                "best free set {} with multiplicity {}",
                found.profile(),
                found.multiplicity
            );
            Ok(found)
        }
        None => Err(AcdError::NoFeasibleFreeSet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    use crate::utils::binomial;

    fn random_tt(rng: &mut ChaCha8Rng, n: usize) -> TruthTable {
        let words: Vec<u64> = (0..TruthTable::words_for(n)).map(|_| rng.random()).collect();
        TruthTable::from_words(n, &words)
    }

    /// Rebuilds the permuted table from scratch: position `i` holds input `perm.var(i)`.
    fn permute_naive(tt: &TruthTable, perm: &Permutation) -> TruthTable {
        TruthTable::from_fn(tt.num_vars(), |row| {
            let mut orig = 0;
            for i in 0..tt.num_vars() {
                if (row >> i) & 1 == 1 {
                    orig |= 1 << perm.var(i);
                }
            }
            tt.get_bit(orig)
        })
    }

    #[test]
    fn test_enumerates_every_combination_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for (n, k, offset) in [(6, 2, 0), (7, 3, 0), (8, 3, 1), (9, 4, 2), (5, 1, 0)] {
            let tt = random_tt(&mut rng, n);
            let mut perm = Permutation::identity(n);
            let mut start = tt;
            // Scramble first to make sure the starting layout is respected.
            perm.swap_with(&mut start, 0, n - 1);

            let mut seen = HashSet::new();
            let mut count = 0;
            let mut stepper = CombinationStepper::new(n, k, offset);
            let mut current = start;
            loop {
                let full = perm.compose(&stepper.rel);
                assert!(full.is_bijection());
                assert_eq!(current, permute_naive(&tt, &full));
                for p in 0..offset {
                    assert_eq!(full.var(p), perm.var(p));
                }
                seen.insert(full.prefix_profile(k));
                count += 1;
                if !stepper.advance(&mut current) {
                    break;
                }
            }
            let expected = binomial((n - offset) as u64, (k - offset) as u64) as usize;
            assert_eq!(count, expected, "n={} k={} offset={}", n, k, offset);
            assert_eq!(seen.len(), expected);
        }
    }

    #[test]
    fn test_enumerate_free_sets_finds_minimum() {
        // f = x5 ? (x0 & x2) : (x0 | x2), over 6 inputs where x1, x3, x4 are unused.
        let tt = TruthTable::from_fn(6, |r| {
            let x = |i: usize| (r >> i) & 1 == 1;
            if x(5) {
                x(0) && x(2)
            } else {
                x(0) || x(2)
            }
        });
        let perm = Permutation::identity(6);
        let (best_tt, best_perm, cost) = enumerate_free_sets(&tt, &perm, 2, 0, |t| column_multiplicity(t, 2));
        assert_eq!(cost, 2);
        assert_eq!(best_perm.prefix_profile(2), Profile::new(0b101));
        assert_eq!(best_tt, permute_naive(&tt, &best_perm));
    }

    #[test]
    fn test_reposition_late_arriving() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let tt = random_tt(&mut rng, 7);
        let mut moved = tt;
        let mut perm = Permutation::identity(7);
        reposition_late_arriving(&mut moved, &mut perm, Profile::new(0b1010010));
        assert_eq!(&perm.as_slice()[..3], &[1, 4, 6]);
        assert!(perm.is_bijection());
        assert_eq!(moved, permute_naive(&tt, &perm));
    }

    #[test]
    fn test_find_free_set_respects_fit() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let params = AcdParams::default();
        for _ in 0..10 {
            let tt = random_tt(&mut rng, 8);
            if let Ok(found) = find_free_set(&tt, &params, Profile::default()) {
                assert!(found.multiplicity <= 1 << (6 - found.free_set_size));
                assert!(found.multiplicity < params.max_multiplicity);
                assert_eq!(column_multiplicity(&found.tt, found.free_set_size), found.multiplicity);
                assert_eq!(found.tt, permute_naive(&tt, &found.perm));
            }
        }
    }

    #[test]
    fn test_use_first_stops_at_first_size() {
        // (x0 & x1) | (x2 & ... & x6): one free variable leaves three columns, the free
        // set {x0, x1} only two.
        let tt = TruthTable::from_fn(7, |r| (r & 3) == 3 || (r >> 2) == 0b11111);

        let found = find_free_set(&tt, &AcdParams::default(), Profile::default()).unwrap();
        assert_eq!(found.free_set_size, 2);
        assert_eq!(found.multiplicity, 2);
        assert_eq!(found.profile(), Profile::new(0b11));

        let params = AcdParams {
            use_first: true,
            ..AcdParams::default()
        };
        let found = find_free_set(&tt, &params, Profile::default()).unwrap();
        assert_eq!(found.free_set_size, 1);
        assert_eq!(found.multiplicity, 3);
    }

    #[test]
    fn test_too_many_late_arrivals() {
        let tt = TruthTable::zero(8);
        let params = AcdParams::with_lut_size(4);
        let res = find_free_set(&tt, &params, Profile::new(0b1111));
        assert_eq!(
            res.unwrap_err(),
            AcdError::InfeasibleDelayProfile {
                late_arriving: 4,
                limit: 3
            }
        );
    }

    #[test]
    fn test_no_support_reducing_free_set() {
        // 10 inputs into 4-LUTs: a support-reducing free set needs 6 variables.
        let tt = TruthTable::nth_var(10, 9);
        let params = AcdParams::with_lut_size(4);
        assert_eq!(
            find_free_set(&tt, &params, Profile::default()).unwrap_err(),
            AcdError::NoFeasibleFreeSet
        );
    }
}
