//! Newtypes for variable bookkeeping during decomposition.
//!
//! Two notions of "variable" coexist: the *original* input index of the function
//! given by the caller, and the *logical position* a variable currently occupies in a
//! (permuted) truth table. [`Permutation`] maps positions to original inputs, and
//! [`Profile`] is a set of original inputs (the delay profile and the free set).
use std::fmt;

use crate::truth_table::{TruthTable, MAX_NUM_VARS};

/// Position-to-input map of a permuted truth table.
///
/// `perm.var(i)` is the original input currently sitting at logical position `i`.
///
/// # Invariants
///
/// - The map is a bijection on `0..len`.
/// - Whenever two positions are swapped, the truth table they describe is swapped
///   the same way (see [`Permutation::swap_with`]).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Permutation {
    len: usize,
    map: [usize; MAX_NUM_VARS],
}

impl Permutation {
    /// Creates the identity permutation on `len` positions.
    pub fn identity(len: usize) -> Self {
        assert!(len <= MAX_NUM_VARS, "At most {} variables are supported", MAX_NUM_VARS);
        let mut map = [0; MAX_NUM_VARS];
        for (i, m) in map.iter_mut().enumerate() {
            *m = i;
        }
        Self { len, map }
    }

    /// Returns the number of positions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the original input at logical position `pos`.
    #[inline]
    pub fn var(&self, pos: usize) -> usize {
        debug_assert!(pos < self.len);
        self.map[pos]
    }

    /// Returns the logical position of original input `var`.
    pub fn position(&self, var: usize) -> Option<usize> {
        self.as_slice().iter().position(|&v| v == var)
    }

    /// Returns the map as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.map[..self.len]
    }

    /// Swaps two positions of the map only.
    #[inline]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.map.swap(i, j);
    }

    /// Swaps two positions of the map together with the table they describe.
    #[inline]
    pub fn swap_with(&mut self, tt: &mut TruthTable, i: usize, j: usize) {
        self.map.swap(i, j);
        tt.swap_vars(i, j);
    }

    /// Composes with a relative permutation: position `i` receives `self.var(rel.var(i))`.
    pub fn compose(&self, rel: &Permutation) -> Permutation {
        debug_assert_eq!(self.len, rel.len);
        let mut res = *self;
        for i in 0..self.len {
            res.map[i] = self.map[rel.map[i]];
        }
        res
    }

    /// Checks the bijection invariant.
    pub fn is_bijection(&self) -> bool {
        let mut seen = 0u32;
        for &v in self.as_slice() {
            if v >= self.len || seen & (1 << v) != 0 {
                return false;
            }
            seen |= 1 << v;
        }
        true
    }

    /// Returns the set of original inputs at the first `count` positions.
    pub fn prefix_profile(&self, count: usize) -> Profile {
        Profile(self.map[..count].iter().fold(0, |acc, &v| acc | (1 << v)))
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// A set of original inputs, as a bitmask (bit `i` = input `i`).
///
/// Used both for the incoming delay profile (late-arriving inputs) and the reported
/// free set.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Profile(u32);

impl Profile {
    /// Creates a profile from a raw bitmask.
    pub fn new(bits: u32) -> Self {
        Profile(bits)
    }

    /// Returns the raw bitmask.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns the number of inputs in the set.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if input `var` is in the set.
    pub fn contains(self, var: usize) -> bool {
        (self.0 >> var) & 1 == 1
    }

    /// Returns true if every input of `other` is in the set.
    pub fn is_superset(self, other: Profile) -> bool {
        other.0 & !self.0 == 0
    }

    /// Restricts the set to the first `num_vars` inputs.
    pub fn truncate(self, num_vars: usize) -> Self {
        if num_vars >= 32 {
            self
        } else {
            Profile(self.0 & ((1 << num_vars) - 1))
        }
    }

    /// Iterates over the inputs in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..32).filter(move |&v| self.contains(v))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "x{}", v)?;
        }
        write!(f, "}}")
    }
}

impl From<Profile> for u32 {
    fn from(profile: Profile) -> Self {
        profile.0
    }
}

impl From<u32> for Profile {
    fn from(bits: u32) -> Self {
        Profile(bits)
    }
}
