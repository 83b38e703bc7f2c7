//! I-set extraction.
//!
//! Once the free set is fixed, every bound-set assignment (column) belongs to exactly
//! one *i-set*: the class of columns sharing the same free-set function. I-sets are
//! numbered in order of first appearance, so i-set 0 always contains column 0.

use crate::multiplicity::columns;
use crate::search::FreeSetSearch;
use crate::truth_table::TruthTable;

/// I-sets of a partition together with their free-set functions.
#[derive(Debug, Clone)]
pub struct ISets {
    /// One indicator table per i-set, over the bound-set variables.
    pub isets: Vec<TruthTable>,
    /// The free-set function shared by the columns of each i-set.
    pub free_set_tts: Vec<TruthTable>,
}

impl ISets {
    /// Returns the number of i-sets (the column multiplicity).
    pub fn multiplicity(&self) -> u32 {
        self.isets.len() as u32
    }
}

/// Partitions the columns of `search.tt` into i-sets.
pub fn compute_isets(search: &FreeSetSearch) -> ISets {
    let free_set_size = search.free_set_size;
    let bound_vars = search.bound_set_size();

    let mut values: Vec<u64> = Vec::with_capacity(search.multiplicity as usize);
    let mut isets: Vec<TruthTable> = Vec::with_capacity(search.multiplicity as usize);

    for (column, value) in columns(&search.tt, free_set_size).enumerate() {
        let index = match values.iter().position(|&v| v == value) {
            Some(index) => index,
            None => {
                values.push(value);
                isets.push(TruthTable::zero(bound_vars));
                values.len() - 1
            }
        };
        isets[index].set_bit(column, true);
    }

    debug_assert_eq!(isets.len() as u32, search.multiplicity);

    let free_set_tts = values
        .iter()
        .map(|&v| TruthTable::from_words(free_set_size, &[v]))
        .collect();

    ISets { isets, free_set_tts }
}
