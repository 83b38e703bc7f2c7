//! Decomposition assembly.
//!
//! Turns a cover into concrete LUTs:
//!
//! 1. Every selected encoding becomes a bound-set LUT: its ON-set is merged from the
//!    i-sets, don't-cares are resolved, and the support is minimized.
//! 2. Single-input bound-set LUTs are buffers or inverters. They are not emitted; their
//!    input is wired into the top LUT directly (complemented for an inverter).
//! 3. The top LUT is a multiplexer collapsed into one table: for every i-set `j`,
//!    the free-set function of `j` is AND-ed with the bound-set outputs that identify
//!    `j` (positive if `j` is in that LUT's ON-set, negative if in its OFF-set), and
//!    all these terms are OR-ed together.
//!
//! LUT supports are *signal indices*: `0..num_inputs` are the original inputs and
//! `num_inputs + k` is the output of the `k`-th emitted LUT.

use crate::covering::Cover;
use crate::encoding::{merge_isets, minimize_support};
use crate::isets::ISets;
use crate::search::FreeSetSearch;
use crate::truth_table::TruthTable;

/// A single LUT of a decomposition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Lut {
    /// Function over the support, variable `i` being `support[i]`.
    pub tt: TruthTable,
    /// Signal indices feeding the LUT.
    pub support: Vec<usize>,
}

impl Lut {
    /// Returns the number of inputs.
    pub fn fanin(&self) -> usize {
        self.support.len()
    }
}

/// Statistics of a decomposition.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AcdStats {
    /// Number of emitted LUTs.
    pub num_luts: u32,
    /// Depth of the LUT network.
    pub num_levels: u32,
    /// Edge estimate: free-set size, plus one per bound-set LUT, plus their supports.
    pub num_edges: u32,
}

/// Builds a bound-set LUT for every row of `cover`, then the top LUT.
pub fn assemble(search: &FreeSetSearch, isets: &ISets, cover: &Cover) -> (Vec<Lut>, AcdStats) {
    let num_inputs = search.tt.num_vars();
    let free_set_size = search.free_set_size;
    let top_vars = free_set_size + cover.rows.len();
    debug_assert!(top_vars <= num_inputs.max(6));

    let mut luts = Vec::with_capacity(cover.rows.len() + 1);
    let mut top_support: Vec<usize> = (0..free_set_size).map(|i| search.perm.var(i)).collect();
    let mut bound_outputs = Vec::with_capacity(cover.rows.len());
    let mut num_edges = (free_set_size + cover.rows.len()) as u32;

    for (i, row) in cover.rows.iter().enumerate() {
        let (tt, care) = merge_isets(&isets.isets, &row.encoding);
        let (tt, kept) = minimize_support(&tt, &care);
        debug_assert!(!kept.is_empty());
        num_edges += kept.len() as u32;

        let support: Vec<usize> = kept.iter().map(|&j| search.perm.var(free_set_size + j)).collect();
        let mut output = TruthTable::nth_var(top_vars, free_set_size + i);

        if support.len() == 1 {
            top_support.push(support[0]);
            // 0b01 is the inverter.
            if tt.get_bit(0) {
                output = !output;
            }
        } else {
            top_support.push(num_inputs + luts.len());
            luts.push(Lut { tt, support });
        }
        bound_outputs.push(output);
    }

    let mut top = TruthTable::zero(top_vars);
    for (j, free_set_tt) in isets.free_set_tts.iter().enumerate() {
        let mut term = free_set_tt.extended(top_vars);
        for (row, output) in cover.rows.iter().zip(&bound_outputs) {
            if row.encoding.in_onset(j) {
                term &= *output;
            } else if row.encoding.in_offset(j) {
                term &= !*output;
            }
        }
        top |= term;
    }
    luts.push(Lut {
        tt: top,
        support: top_support,
    });

    let stats = AcdStats {
        num_luts: luts.len() as u32,
        num_levels: 2,
        num_edges,
    };
    (luts, stats)
}

/// Builds the single LUT of a function that already fits, over its true support.
pub fn assemble_single(tt: &TruthTable) -> (Vec<Lut>, AcdStats) {
    let (tt, support) = minimize_support(tt, &TruthTable::one(tt.num_vars()));
    let stats = AcdStats {
        num_luts: 1,
        num_levels: 1,
        num_edges: support.len() as u32,
    };
    (vec![Lut { tt, support }], stats)
}

/// Evaluates a LUT network on all input rows; the last LUT is the output.
pub fn simulate(luts: &[Lut], num_inputs: usize) -> TruthTable {
    let mut signals: Vec<TruthTable> = (0..num_inputs).map(|i| TruthTable::nth_var(num_inputs, i)).collect();
    for lut in luts {
        let mut out = TruthTable::zero(num_inputs);
        for m in 0..lut.tt.num_bits() {
            if !lut.tt.get_bit(m) {
                continue;
            }
            let mut minterm = TruthTable::one(num_inputs);
            for (pos, &s) in lut.support.iter().enumerate() {
                if (m >> pos) & 1 == 1 {
                    minterm &= signals[s];
                } else {
                    minterm &= !signals[s];
                }
            }
            out |= minterm;
        }
        signals.push(out);
    }
    signals.pop().unwrap_or_else(|| TruthTable::zero(num_inputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::covering::{min_depth, solve_exact};
    use crate::encoding::{generate_encodings, CoveringMatrix, RowOrder};
    use crate::isets::compute_isets;
    use crate::params::AcdParams;
    use crate::search::find_free_set;
    use crate::types::{Permutation, Profile};

    fn decompose_and_check(tt: &TruthTable, lut_size: u32) -> Vec<Lut> {
        let params = AcdParams::with_lut_size(lut_size);
        let search = find_free_set(tt, &params, Profile::default()).unwrap();
        let isets = compute_isets(&search);
        let mu = isets.multiplicity();
        let matrix = CoveringMatrix::new(&isets, &generate_encodings(mu), lut_size, RowOrder::Exact);
        let cover = solve_exact(&matrix, min_depth(mu), 1000).unwrap();
        let (luts, stats) = assemble(&search, &isets, &cover);
        assert_eq!(stats.num_luts as usize, luts.len());
        for lut in &luts {
            assert!(lut.fanin() <= lut_size as usize);
        }
        assert_eq!(simulate(&luts, tt.num_vars()), *tt);
        luts
    }

    #[test]
    fn test_simulate_single_lut() {
        let luts = vec![Lut {
            tt: TruthTable::from_words(2, &[0x8]),
            support: vec![2, 0],
        }];
        let out = simulate(&luts, 3);
        assert_eq!(out, TruthTable::from_fn(3, |r| r & 0b101 == 0b101));
    }

    #[test]
    fn test_mux_of_xor_and_and() {
        // x6 ? (x0 ^ x1 ^ x2) : (x3 & x4 & x5)
        let tt = TruthTable::from_fn(7, |r| {
            let x = |i: usize| (r >> i) & 1 == 1;
            if x(6) {
                x(0) ^ x(1) ^ x(2)
            } else {
                x(3) && x(4) && x(5)
            }
        });
        decompose_and_check(&tt, 6);
    }

    #[test]
    fn test_xor_with_wide_and() {
        // x0 ^ (x1 & ... & x6): only the free set {x0} has two columns.
        let tt = TruthTable::from_fn(7, |r| ((r & 1) == 1) ^ ((r >> 1) == 0b111111));
        let luts = decompose_and_check(&tt, 6);
        assert_eq!(luts.len(), 2);
        assert_eq!(luts[0].support, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(luts[1].support, vec![0, 7]);
    }

    #[test]
    fn test_mixed_eight_inputs() {
        let tt = TruthTable::from_fn(8, |r| {
            let x = |i: usize| (r >> i) & 1 == 1;
            let g = x(3) && x(4) && !x(5) && x(6) && x(7);
            (x(0) ^ x(1)) ^ (g && x(2))
        });
        decompose_and_check(&tt, 6);
    }

    #[test]
    fn test_single_input_lut_is_elided() {
        // x1 ? x0 : !x0 with free set {x0}: the bound-set LUT is an inverter of x1.
        let tt = TruthTable::from_fn(3, |r| (r & 1) == (r >> 1) & 1);
        let search = FreeSetSearch {
            tt,
            perm: Permutation::identity(3),
            free_set_size: 1,
            multiplicity: 2,
        };
        let isets = compute_isets(&search);
        let matrix = CoveringMatrix::new(&isets, &generate_encodings(2), 4, RowOrder::Exact);
        let cover = Cover {
            rows: matrix.rows.clone(),
        };
        let (luts, stats) = assemble(&search, &isets, &cover);
        assert_eq!(luts.len(), 1);
        assert_eq!(stats.num_luts, 1);
        assert_eq!(luts[0].support, vec![0, 1]);
        assert_eq!(simulate(&luts, 3), tt);
    }

    #[test]
    fn test_assemble_single() {
        // Depends on x0 and x2 only.
        let tt = TruthTable::from_fn(3, |r| (r & 1) ^ ((r >> 2) & 1) == 1);
        let (luts, stats) = assemble_single(&tt);
        assert_eq!(luts.len(), 1);
        assert_eq!(luts[0].support, vec![0, 2]);
        assert_eq!(stats.num_levels, 1);
        assert_eq!(simulate(&luts, 3), tt);
    }
}
