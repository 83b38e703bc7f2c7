//! Column multiplicity: the cost oracle of the free-set search.
//!
//! With the free set placed at the `k` least significant positions, the truth table
//! splits into `2ⁿ⁻ᵏ` consecutive groups of `2ᵏ` bits. Group `c` is the *column* of
//! bound-set assignment `c`: the residual function of the free-set variables once the
//! bound set is fixed to `c`. The column multiplicity is the number of distinct
//! columns, which bounds how many values the bound-set LUTs must encode.
//!
//! For `k ≤ 3` a column has at most 8 bits, so presence is tracked in a 256-bit map.
//! For `k ∈ {4, 5}` columns are collected, sorted, and counted.

use crate::truth_table::TruthTable;

/// Iterates over the columns of `tt` for a free set of `k` variables, in row order.
pub fn columns(tt: &TruthTable, k: usize) -> impl Iterator<Item = u64> + '_ {
    debug_assert!((1..=5).contains(&k) && k <= tt.num_vars());
    let width = 1 << k;
    let mask = (1u64 << width) - 1;
    let per_word = tt.num_bits().min(64) / width;
    tt.words()
        .iter()
        .flat_map(move |&w| (0..per_word).map(move |g| (w >> (g * width)) & mask))
}

/// Returns the number of distinct columns of `tt` for a free set of `k` variables.
///
/// # Panics
///
/// Panics if `k` is not in `1..=5`.
pub fn column_multiplicity(tt: &TruthTable, k: usize) -> u32 {
    match k {
        1..=3 => column_multiplicity_small(tt, k),
        4 | 5 => column_multiplicity_large(tt, k),
        _ => panic!("Free set of {} variables is not supported", k),
    }
}

fn column_multiplicity_small(tt: &TruthTable, k: usize) -> u32 {
    let mut seen = [0u64; 4];
    for c in columns(tt, k) {
        seen[(c >> 6) as usize] |= 1 << (c & 63);
    }
    seen.iter().map(|w| w.count_ones()).sum()
}

fn column_multiplicity_large(tt: &TruthTable, k: usize) -> u32 {
    let mut values: Vec<u64> = columns(tt, k).collect();
    values.sort_unstable();
    values.dedup();
    values.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    fn naive_multiplicity(tt: &TruthTable, k: usize) -> u32 {
        let mut set = HashSet::new();
        for c in 0..(tt.num_bits() >> k) {
            let column: Vec<bool> = (0..(1 << k)).map(|f| tt.get_bit((c << k) | f)).collect();
            set.insert(column);
        }
        set.len() as u32
    }

    #[test]
    fn test_and_of_two() {
        // x0 & x1: with free set {x0}, columns are 0 (x1=0) and x0 (x1=1).
        let tt = TruthTable::from_words(2, &[0x8]);
        assert_eq!(column_multiplicity(&tt, 1), 2);
    }

    #[test]
    fn test_constant_has_one_column() {
        let tt = TruthTable::one(8);
        for k in 1..=5 {
            assert_eq!(column_multiplicity(&tt, k), 1);
        }
    }

    #[test]
    fn test_matches_naive() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for n in [3, 5, 6, 7, 9] {
            let words: Vec<u64> = (0..TruthTable::words_for(n)).map(|_| rng.random()).collect();
            let tt = TruthTable::from_words(n, &words);
            for k in 1..=n.min(5) {
                assert_eq!(column_multiplicity(&tt, k), naive_multiplicity(&tt, k), "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn test_invariant_under_bound_set_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for n in [6, 8, 10] {
            let words: Vec<u64> = (0..TruthTable::words_for(n)).map(|_| rng.random()).collect();
            let tt = TruthTable::from_words(n, &words);
            for k in 1..=5 {
                let expected = column_multiplicity(&tt, k);
                for _ in 0..6 {
                    let mut p = tt;
                    let i = rng.random_range(k..n);
                    let j = rng.random_range(k..n);
                    p.swap_vars(i, j);
                    assert_eq!(column_multiplicity(&p, k), expected);
                }
            }
        }
    }
}
