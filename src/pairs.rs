//! Fixed-width bit set over pairs of i-sets.
//!
//! Every row of the covering matrix records which pairs of i-sets its encoding
//! distinguishes. With at most 16 i-sets there are at most `C(16, 2) = 120` pairs,
//! so a single `u128` holds the whole set and unions are one instruction.

use crate::utils::{num_pairs, pair_index};

/// A set of pairs, indexed in nested-loop order (see [`pair_index`]).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PairSet(u128);

impl PairSet {
    /// Maximum number of pairs.
    pub const CAPACITY: usize = 128;

    /// Creates an empty set.
    pub const fn empty() -> Self {
        PairSet(0)
    }

    /// Creates the set of all pairs among `multiplicity` i-sets.
    pub fn full(multiplicity: u32) -> Self {
        let n = num_pairs(multiplicity);
        debug_assert!(n as usize <= Self::CAPACITY);
        if n as usize == Self::CAPACITY {
            PairSet(u128::MAX)
        } else {
            PairSet((1u128 << n) - 1)
        }
    }

    /// Returns the number of pairs in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Inserts the pair with the given index.
    #[inline]
    pub fn insert(&mut self, index: u32) {
        self.0 |= 1u128 << index;
    }

    /// Inserts the pair `(j, k)` among `multiplicity` i-sets.
    #[inline]
    pub fn insert_pair(&mut self, j: u32, k: u32, multiplicity: u32) {
        self.insert(pair_index(j, k, multiplicity));
    }

    /// Returns true if the pair with the given index is in the set.
    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        (self.0 >> index) & 1 == 1
    }

    /// Returns the union of two sets.
    #[inline]
    pub fn union(self, other: PairSet) -> PairSet {
        PairSet(self.0 | other.0)
    }

    /// Returns the pairs of `self` that are not in `other`.
    #[inline]
    pub fn difference(self, other: PairSet) -> PairSet {
        PairSet(self.0 & !other.0)
    }

    /// Returns an iterator over the pair indices in the set.
    pub fn iter(&self) -> PairSetIter {
        PairSetIter { rest: self.0 }
    }
}

/// Iterator over pair indices in a [`PairSet`].
pub struct PairSetIter {
    rest: u128,
}

impl Iterator for PairSetIter {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest == 0 {
            return None;
        }
        let index = self.rest.trailing_zeros();
        self.rest &= self.rest - 1; // Clear lowest set bit
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_empty() {
        let s = PairSet::empty();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert!(!s.contains(0));
    }

    #[test]
    fn test_full() {
        assert_eq!(PairSet::full(2).len(), 1);
        assert_eq!(PairSet::full(5).len(), 10);
        assert_eq!(PairSet::full(16).len(), 120);
        assert!(PairSet::full(16).contains(119));
        assert!(!PairSet::full(16).contains(120));
    }

    #[test]
    fn test_insert_pair() {
        let mut s = PairSet::empty();
        s.insert_pair(0, 3, 4);
        s.insert_pair(1, 2, 4);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_union_difference() {
        let mut a = PairSet::empty();
        a.insert(1);
        a.insert(100);
        let mut b = PairSet::empty();
        b.insert(100);
        b.insert(5);
        let u = a.union(b);
        assert_eq!(u.len(), 3);
        assert!(a.difference(u).is_empty());
        assert!(!b.difference(a).is_empty());
        assert_eq!(a.difference(b).iter().collect::<Vec<_>>(), vec![1]);
    }
}
