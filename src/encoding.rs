//! Support-minimizing encodings and the covering matrix.
//!
//! # Encodings
//!
//! A bound-set LUT `g` splits the i-sets into an ON-set (columns where `g = 1`), an
//! OFF-set (`g = 0`) and, when allowed, a don't-care set. An [`Encoding`] is such a
//! split, given as two disjoint bitmasks over i-set indices.
//!
//! Don't-cares are allowed only when the multiplicity `μ` is not a power of two. For
//! powers of two every LUT must be a balanced bipartition, since `log₂ μ` LUTs have no
//! slack. I-set 0 is never placed in the OFF-set: swapping ON and OFF yields the
//! complemented LUT, so fixing one side halves the space without losing solutions.
//! The number of encodings follows a closed form:
//!
//! | μ                    | encodings         |
//! |----------------------|-------------------|
//! | power of two         | `C(μ-1, μ/2-1)`: 1, 3, 35, 6435 for 2, 4, 8, 16 |
//! | otherwise            | `2·3^(μ-1)`       |
//!
//! # Covering matrix
//!
//! Each useful encoding becomes a row annotated with the set of i-set pairs it
//! distinguishes (one in ON, the other in OFF) and the support size of the LUT it
//! induces after don't-care minimization. A decomposition needs a set of rows whose
//! pairs together cover all `C(μ, 2)` pairs.

use log::debug;

use crate::isets::ISets;
use crate::pairs::PairSet;
use crate::truth_table::TruthTable;
use crate::utils::{binomial, is_power_of_two, num_pairs};

/// A split of the i-sets into ON-set and OFF-set; the rest are don't-cares.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Encoding {
    pub onset: u32,
    pub offset: u32,
}

impl Encoding {
    /// Returns true if i-set `index` is in the ON-set.
    #[inline]
    pub fn in_onset(&self, index: usize) -> bool {
        (self.onset >> index) & 1 == 1
    }

    /// Returns true if i-set `index` is in the OFF-set.
    #[inline]
    pub fn in_offset(&self, index: usize) -> bool {
        (self.offset >> index) & 1 == 1
    }
}

/// Returns the number of encodings [`generate_encodings`] produces for `multiplicity`.
pub fn expected_encoding_count(multiplicity: u32) -> u64 {
    if multiplicity < 2 {
        0
    } else if is_power_of_two(multiplicity) {
        binomial(multiplicity as u64 - 1, multiplicity as u64 / 2 - 1)
    } else {
        2 * 3u64.pow(multiplicity - 1)
    }
}

/// Enumerates all admissible encodings for `multiplicity` i-sets.
pub fn generate_encodings(multiplicity: u32) -> Vec<Encoding> {
    let mut res = Vec::with_capacity(expected_encoding_count(multiplicity) as usize);
    if multiplicity >= 2 {
        let allow_dc = !is_power_of_two(multiplicity);
        generate_rec(0, Encoding::default(), multiplicity, allow_dc, &mut res);
    }
    debug_assert_eq!(res.len() as u64, expected_encoding_count(multiplicity));
    res
}

fn generate_rec(index: u32, enc: Encoding, multiplicity: u32, allow_dc: bool, res: &mut Vec<Encoding>) {
    if !allow_dc {
        let half = multiplicity / 2;
        if enc.onset.count_ones() > half || enc.offset.count_ones() > half {
            return;
        }
    }

    if index == multiplicity {
        if allow_dc || enc.onset.count_ones() == enc.offset.count_ones() {
            res.push(enc);
        }
        return;
    }

    if allow_dc {
        generate_rec(index + 1, enc, multiplicity, allow_dc, res);
    }
    let on = Encoding {
        onset: enc.onset | (1 << index),
        ..enc
    };
    generate_rec(index + 1, on, multiplicity, allow_dc, res);
    if index > 0 {
        let off = Encoding {
            offset: enc.offset | (1 << index),
            ..enc
        };
        generate_rec(index + 1, off, multiplicity, allow_dc, res);
    }
}

/// Merges the i-sets of an encoding into the LUT function (ON-set) and its care set.
pub fn merge_isets(isets: &[TruthTable], enc: &Encoding) -> (TruthTable, TruthTable) {
    let num_vars = isets[0].num_vars();
    let mut tt = TruthTable::zero(num_vars);
    let mut care = TruthTable::zero(num_vars);
    for (j, iset) in isets.iter().enumerate() {
        if enc.in_onset(j) {
            tt |= *iset;
            care |= *iset;
        } else if enc.in_offset(j) {
            care |= *iset;
        }
    }
    (tt, care)
}

/// Minimizes the support of `tt` within `care`.
///
/// Variables are visited in ascending order. A variable the function does not depend
/// on within the care set is eliminated by fixing the don't-cares along it; the others
/// are compacted to the low positions. Returns the shrunk table and the original
/// positions of the kept variables.
pub fn minimize_support(tt: &TruthTable, care: &TruthTable) -> (TruthTable, Vec<usize>) {
    let mut tt = *tt;
    let mut care = *care;
    let mut kept = Vec::new();

    for j in 0..tt.num_vars() {
        if !tt.has_var_with_care(&care, j) {
            // Also symmetrizes the care set, so later fixes cannot revive `j`.
            tt.adjust_on_dont_care(&mut care, j);
            continue;
        }
        let k = kept.len();
        if k < j {
            tt.swap_vars(k, j);
            care.swap_vars(k, j);
        }
        kept.push(j);
    }

    tt.shrink_to(kept.len());
    (tt, kept)
}

/// Ordering of the covering-matrix rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RowOrder {
    /// Cost first, then more distinguished pairs first.
    Exact,
    /// Cost only.
    Heuristic,
}

/// One admissible encoding in the covering matrix.
#[derive(Debug, Copy, Clone)]
pub struct CoveringRow {
    /// The encoding this row stands for.
    pub encoding: Encoding,
    /// Pairs of i-sets the encoding distinguishes.
    pub pairs: PairSet,
    /// Support size of the induced LUT, flagged with `1 << bound_vars` when above one.
    pub cost: u32,
    /// Key used to order the rows.
    pub sort_cost: f32,
}

/// The covering problem of a decomposition.
#[derive(Debug, Clone)]
pub struct CoveringMatrix {
    pub rows: Vec<CoveringRow>,
    /// All pairs of i-sets.
    pub target: PairSet,
    /// Number of bound-set variables.
    pub bound_vars: usize,
}

impl CoveringMatrix {
    /// Builds the covering matrix of `isets` from `encodings`.
    ///
    /// Rows that distinguish nothing or whose LUT exceeds `lut_size` inputs are dropped.
    /// If the remaining rows cannot cover every pair, the matrix is left empty.
    pub fn new(isets: &ISets, encodings: &[Encoding], lut_size: u32, order: RowOrder) -> Self {
        let multiplicity = isets.multiplicity();
        let bound_vars = isets.isets[0].num_vars();
        let target = PairSet::full(multiplicity);
        let combinations = num_pairs(multiplicity) as f32;

        let mut rows = Vec::new();
        let mut existence = PairSet::empty();

        for enc in encodings {
            let ones_on = enc.onset.count_ones();
            let ones_off = enc.offset.count_ones();
            if ones_on == 0 || ones_off == 0 || ones_on == multiplicity || ones_off == multiplicity {
                continue;
            }

            let pairs = distinguished_pairs(enc, multiplicity);

            let (tt, care) = merge_isets(&isets.isets, enc);
            let (_, kept) = minimize_support(&tt, &care);
            let support = kept.len() as u32;
            if support > lut_size {
                continue;
            }

            let cost = if support > 1 {
                support | (1 << bound_vars)
            } else {
                support
            };

            let sort_cost = match order {
                RowOrder::Exact => cost as f32 + (combinations - pairs.len() as f32) / (combinations + 1.0),
                RowOrder::Heuristic => cost as f32,
            };

            existence = existence.union(pairs);
            rows.push(CoveringRow {
                encoding: *enc,
                pairs,
                cost,
                sort_cost,
            });
        }

        if existence != target {
            debug!(
                "covering matrix: {} rows cover only {} of {} pairs",
                rows.len(),
                existence.len(),
                target.len()
            );
            rows.clear();
        } else {
            // Stable: ties keep enumeration order.
            rows.sort_by(|a, b| a.sort_cost.total_cmp(&b.sort_cost));
            debug!(
                "covering matrix: {} rows from {} encodings, multiplicity {}",
                rows.len(),
                encodings.len(),
                multiplicity
            );
        }

        Self {
            rows,
            target,
            bound_vars,
        }
    }

    /// Returns true if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Support size encoded in a row cost.
    pub fn support_of(&self, cost: u32) -> u32 {
        cost & ((1 << self.bound_vars) - 1)
    }
}

/// Pairs `(j, k)` with one i-set in the ON-set and the other in the OFF-set.
pub fn distinguished_pairs(enc: &Encoding, multiplicity: u32) -> PairSet {
    let opposite = |j: usize, k: usize| enc.in_onset(j) && enc.in_offset(k);
    let mut pairs = PairSet::empty();
    for j in 0..multiplicity {
        for k in j + 1..multiplicity {
            if opposite(j as usize, k as usize) || opposite(k as usize, j as usize) {
                pairs.insert_pair(j, k, multiplicity);
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use test_log::test;

    #[test]
    fn test_encoding_count_powers_of_two() {
        assert_eq!(generate_encodings(2).len(), 1);
        assert_eq!(generate_encodings(4).len(), 3);
        assert_eq!(generate_encodings(8).len(), 35);
        assert_eq!(generate_encodings(16).len(), 6435);
    }

    #[test]
    fn test_encoding_count_with_dont_cares() {
        for mu in [3u32, 5, 6, 7] {
            assert_eq!(generate_encodings(mu).len() as u64, 2 * 3u64.pow(mu - 1), "mu={}", mu);
        }
    }

    #[test]
    fn test_encodings_are_well_formed() {
        for mu in [3u32, 4, 6, 8] {
            let encs = generate_encodings(mu);
            let unique: HashSet<_> = encs.iter().collect();
            assert_eq!(unique.len(), encs.len());
            for e in &encs {
                assert_eq!(e.onset & e.offset, 0);
                assert!(!e.in_offset(0), "i-set 0 is never in the OFF-set");
                assert!((e.onset | e.offset) < (1 << mu));
                if is_power_of_two(mu) {
                    assert_eq!(e.onset.count_ones(), e.offset.count_ones());
                    assert_eq!(e.onset | e.offset, (1 << mu) - 1);
                }
            }
        }
    }

    #[test]
    fn test_distinguished_pairs() {
        // ON = {0, 2}, OFF = {1}, DC = {3} among 4 i-sets.
        let enc = Encoding {
            onset: 0b0101,
            offset: 0b0010,
        };
        let pairs = distinguished_pairs(&enc, 4);
        // (0,1) -> 0, (1,2) -> 3
        assert_eq!(pairs.iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_minimize_support_drops_dont_care_variable() {
        // Care only where x0 == x1; the function x1 there equals x0, so one input suffices.
        let tt = TruthTable::from_fn(3, |r| (r >> 1) & 1 == 1);
        let care = TruthTable::from_fn(3, |r| (r & 1) == (r >> 1) & 1);
        let (min, kept) = minimize_support(&tt, &care);
        assert_eq!(kept.len(), 1);
        assert_eq!(min.num_vars(), 1);
        for r in 0..8 {
            if care.get_bit(r) {
                assert_eq!(min.get_bit((r >> kept[0]) & 1), tt.get_bit(r));
            }
        }
    }

    #[test]
    fn test_minimize_support_keeps_essential_variables() {
        let tt = TruthTable::from_fn(4, |r| (r & 1) ^ ((r >> 3) & 1) == 1);
        let care = TruthTable::one(4);
        let (min, kept) = minimize_support(&tt, &care);
        assert_eq!(kept, vec![0, 3]);
        assert_eq!(min, TruthTable::from_words(2, &[0b0110]));
    }

    #[test]
    fn test_covering_matrix_buffer_rows() {
        // Bound set of 2 variables with 4 i-sets, one per column: every balanced split
        // of the columns is a 2-input function; splits along x0 or x1 are buffers.
        let isets = ISets {
            isets: (0..4).map(|c| TruthTable::from_fn(2, |r| r == c)).collect(),
            free_set_tts: (0..4).map(|v| TruthTable::from_words(2, &[v])).collect(),
        };
        let encs = generate_encodings(4);
        let matrix = CoveringMatrix::new(&isets, &encs, 4, RowOrder::Exact);
        assert_eq!(matrix.rows.len(), 3);
        assert_eq!(matrix.target.len(), 6);
        let costs: Vec<u32> = matrix.rows.iter().map(|r| r.cost).collect();
        // Two single-input splits, then the XOR split flagged as a multi-input LUT.
        assert_eq!(costs, vec![1, 1, 2 | (1 << 2)]);
        assert_eq!(matrix.support_of(costs[2]), 2);
    }
}
