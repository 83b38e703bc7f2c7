//! Fixed-capacity truth tables.
//!
//! A Boolean function `f: {0,1}ⁿ → {0,1}` is stored as its `2ⁿ` output bits packed
//! into 64-bit words. Row `r` holds `f(x)` where `xᵢ = (r >> i) & 1`, so variable 0
//! is the least significant one and row 0 is the all-zeros assignment.
//!
//! # Storage
//!
//! Tables have a fixed capacity of [`MAX_NUM_VARS`] variables and are stored inline,
//! which makes [`TruthTable`] `Copy`: the decomposition search permutes *copies* of the
//! canonical table and never aliases it.
//!
//! # Replication invariant
//!
//! For `n < 6` variables the single meaningful word holds the `2ⁿ`-bit pattern
//! replicated periodically over all 64 bits. For `n ≥ 6` only the first `2ⁿ⁻⁶` words
//! are meaningful. Every operation preserves this, which is what makes
//! [`TruthTable::extend_to`] free for small tables: a replicated 3-variable word
//! already *is* the 6-variable table that ignores variables 3..6.
//!
//! # Variable swaps
//!
//! [`TruthTable::swap_vars`] is implemented with delta swaps and handles three cases:
//!
//! - both variables inside a word (`i, j < 6`): one masked shift per word,
//! - one inside, one across words (`i < 6 ≤ j`): pairs of words exchange half their bits,
//! - both across words (`6 ≤ i, j`): whole words are exchanged.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// Maximum number of variables a [`TruthTable`] can hold.
pub const MAX_NUM_VARS: usize = 11;

const MAX_WORDS: usize = 1 << (MAX_NUM_VARS - 6);

/// Projection masks of the six in-word variables.
const VAR_MASKS: [u64; 6] = [
    0xaaaaaaaaaaaaaaaa,
    0xcccccccccccccccc,
    0xf0f0f0f0f0f0f0f0,
    0xff00ff00ff00ff00,
    0xffff0000ffff0000,
    0xffffffff00000000,
];

/// Replicates the low `2^num_vars` bits of `word` over the whole word.
fn replicate(word: u64, num_vars: usize) -> u64 {
    if num_vars >= 6 {
        return word;
    }
    let bits = 1 << num_vars;
    let mut w = word & ((1u64 << bits) - 1);
    let mut shift = bits;
    while shift < 64 {
        w |= w << shift;
        shift <<= 1;
    }
    w
}

/// A truth table over at most [`MAX_NUM_VARS`] variables.
#[derive(Copy, Clone)]
pub struct TruthTable {
    num_vars: usize,
    words: [u64; MAX_WORDS],
}

impl TruthTable {
    /// Number of words needed for `num_vars` variables.
    #[inline]
    pub fn words_for(num_vars: usize) -> usize {
        if num_vars <= 6 {
            1
        } else {
            1 << (num_vars - 6)
        }
    }

    /// Creates the constant-zero function over `num_vars` variables.
    ///
    /// # Panics
    ///
    /// Panics if `num_vars > MAX_NUM_VARS`.
    pub fn zero(num_vars: usize) -> Self {
        assert!(
            num_vars <= MAX_NUM_VARS,
            "At most {} variables are supported, got {}",
            MAX_NUM_VARS,
            num_vars
        );
        Self {
            num_vars,
            words: [0; MAX_WORDS],
        }
    }

    /// Creates the constant-one function over `num_vars` variables.
    pub fn one(num_vars: usize) -> Self {
        !Self::zero(num_vars)
    }

    /// Creates the projection function of variable `var`.
    pub fn nth_var(num_vars: usize, var: usize) -> Self {
        assert!(var < num_vars, "Variable {} out of range for {}-variable function", var, num_vars);
        let mut tt = Self::zero(num_vars);
        for k in 0..tt.num_words() {
            tt.words[k] = if var < 6 {
                VAR_MASKS[var]
            } else if (k >> (var - 6)) & 1 == 1 {
                u64::MAX
            } else {
                0
            };
        }
        tt
    }

    /// Creates a truth table from raw words.
    ///
    /// Exactly [`TruthTable::words_for`]`(num_vars)` words are expected. For fewer than
    /// six variables only the low `2^num_vars` bits of the word are read.
    ///
    /// # Panics
    ///
    /// Panics if the number of words does not match.
    pub fn from_words(num_vars: usize, words: &[u64]) -> Self {
        let mut tt = Self::zero(num_vars);
        let n = tt.num_words();
        assert_eq!(
            words.len(),
            n,
            "Expected {} words for {} variables, got {}",
            n,
            num_vars,
            words.len()
        );
        tt.words[..n].copy_from_slice(words);
        tt.words[0] = replicate(tt.words[0], num_vars);
        tt
    }

    /// Creates a truth table by evaluating `f` on every row index.
    pub fn from_fn(num_vars: usize, f: impl Fn(usize) -> bool) -> Self {
        let mut tt = Self::zero(num_vars);
        for row in 0..tt.num_bits() {
            if f(row) {
                tt.set_bit(row, true);
            }
        }
        tt
    }

    /// Returns the number of variables.
    #[inline]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the number of rows (`2ⁿ`).
    #[inline]
    pub fn num_bits(&self) -> usize {
        1 << self.num_vars
    }

    /// Returns the number of meaningful words.
    #[inline]
    pub fn num_words(&self) -> usize {
        Self::words_for(self.num_vars)
    }

    /// Returns the meaningful words.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words[..self.num_words()]
    }

    /// Returns the `k`-th word.
    #[inline]
    pub fn word(&self, k: usize) -> u64 {
        self.words[k]
    }

    /// Returns the value of row `index`.
    #[inline]
    pub fn get_bit(&self, index: usize) -> bool {
        debug_assert!(index < self.num_bits());
        (self.words[index >> 6] >> (index & 63)) & 1 == 1
    }

    /// Sets the value of row `index`.
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        debug_assert!(index < self.num_bits());
        if self.num_vars < 6 {
            let mask = replicate(1 << index, self.num_vars);
            if value {
                self.words[0] |= mask;
            } else {
                self.words[0] &= !mask;
            }
        } else if value {
            self.words[index >> 6] |= 1 << (index & 63);
        } else {
            self.words[index >> 6] &= !(1 << (index & 63));
        }
    }

    /// Returns the number of rows where the function is one.
    pub fn count_ones(&self) -> usize {
        if self.num_vars < 6 {
            let mask = (1u64 << self.num_bits()) - 1;
            (self.words[0] & mask).count_ones() as usize
        } else {
            self.words().iter().map(|w| w.count_ones() as usize).sum()
        }
    }

    /// Returns true if the function is constant zero.
    pub fn is_zero(&self) -> bool {
        self.words().iter().all(|&w| w == 0)
    }

    /// Swaps variables `i` and `j` in place.
    pub fn swap_vars(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.num_vars && j < self.num_vars);
        if i == j {
            return;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let n = self.num_words();

        if j < 6 {
            let shift = (1 << j) - (1 << i);
            let mask = VAR_MASKS[i] & !VAR_MASKS[j];
            for w in &mut self.words[..n] {
                let t = (*w ^ (*w >> shift)) & mask;
                *w ^= t ^ (t << shift);
            }
        } else if i < 6 {
            let shift = 1 << i;
            let mask = VAR_MASKS[i];
            let step = 1 << (j - 6);
            for k in (0..n).filter(|k| k & step == 0) {
                let lo = self.words[k];
                let hi = self.words[k + step];
                self.words[k] = (lo & !mask) | ((hi << shift) & mask);
                self.words[k + step] = (hi & mask) | ((lo & mask) >> shift);
            }
        } else {
            let step_i = 1 << (i - 6);
            let step_j = 1 << (j - 6);
            for k in (0..n).filter(|k| k & step_i != 0 && k & step_j == 0) {
                self.words.swap(k, k - step_i + step_j);
            }
        }
    }

    /// Extends the table to `num_vars` variables; the new variables are not in the support.
    pub fn extend_to(&mut self, num_vars: usize) {
        assert!(num_vars >= self.num_vars, "Cannot extend to fewer variables");
        assert!(num_vars <= MAX_NUM_VARS, "At most {} variables are supported", MAX_NUM_VARS);
        let old = self.num_words();
        let new = Self::words_for(num_vars);
        for k in old..new {
            self.words[k] = self.words[k % old];
        }
        self.num_vars = num_vars;
    }

    /// Returns a copy extended to `num_vars` variables.
    pub fn extended(mut self, num_vars: usize) -> Self {
        self.extend_to(num_vars);
        self
    }

    /// Shrinks the table to its first `num_vars` variables.
    ///
    /// The function must not depend on the dropped variables.
    pub fn shrink_to(&mut self, num_vars: usize) {
        assert!(num_vars <= self.num_vars, "Cannot shrink to more variables");
        debug_assert!((num_vars..self.num_vars).all(|v| !self.has_var(v)));
        let old = self.num_words();
        let new = Self::words_for(num_vars);
        for w in &mut self.words[new..old] {
            *w = 0;
        }
        self.words[0] = replicate(self.words[0], num_vars);
        self.num_vars = num_vars;
    }

    /// Returns true if the function depends on variable `var`.
    pub fn has_var(&self, var: usize) -> bool {
        debug_assert!(var < self.num_vars);
        let n = self.num_words();
        if var < 6 {
            let shift = 1 << var;
            self.words[..n]
                .iter()
                .any(|&w| ((w >> shift) ^ w) & !VAR_MASKS[var] != 0)
        } else {
            let step = 1 << (var - 6);
            (0..n)
                .filter(|k| k & step == 0)
                .any(|k| self.words[k] != self.words[k + step])
        }
    }

    /// Returns true if the function depends on variable `var` within the `care` set.
    ///
    /// Two rows that differ only in `var` witness the dependency only when both are cared for.
    pub fn has_var_with_care(&self, care: &TruthTable, var: usize) -> bool {
        debug_assert!(var < self.num_vars);
        debug_assert_eq!(self.num_vars, care.num_vars);
        let n = self.num_words();
        if var < 6 {
            let shift = 1 << var;
            (0..n).any(|k| {
                let w = self.words[k];
                let c = care.words[k];
                ((w >> shift) ^ w) & c & (c >> shift) & !VAR_MASKS[var] != 0
            })
        } else {
            let step = 1 << (var - 6);
            (0..n).filter(|k| k & step == 0).any(|k| {
                (self.words[k] ^ self.words[k + step]) & care.words[k] & care.words[k + step] != 0
            })
        }
    }

    /// Resolves the don't-cares along `var` so that the table no longer depends on it.
    ///
    /// For every pair of rows differing only in `var`, both rows receive the cared-for
    /// value (the low row wins when both are cared for), and both become cared for.
    /// Requires `!self.has_var_with_care(care, var)`, otherwise cared values would change.
    pub fn adjust_on_dont_care(&mut self, care: &mut TruthTable, var: usize) {
        debug_assert!(!self.has_var_with_care(care, var));
        let n = self.num_words();
        if var < 6 {
            let shift = 1 << var;
            let low = !VAR_MASKS[var];
            for k in 0..n {
                let w = self.words[k];
                let c = care.words[k];
                let lo = w & low;
                let hi = (w >> shift) & low;
                let c_lo = c & low;
                let c_hi = (c >> shift) & low;
                let v = (lo & c_lo) | (hi & !c_lo);
                let cu = c_lo | c_hi;
                self.words[k] = v | (v << shift);
                care.words[k] = cu | (cu << shift);
            }
        } else {
            let step = 1 << (var - 6);
            for k in (0..n).filter(|k| k & step == 0) {
                let c_lo = care.words[k];
                let v = (self.words[k] & c_lo) | (self.words[k + step] & !c_lo);
                let cu = c_lo | care.words[k + step];
                self.words[k] = v;
                self.words[k + step] = v;
                care.words[k] = cu;
                care.words[k + step] = cu;
            }
        }
    }
}

impl PartialEq for TruthTable {
    fn eq(&self, other: &Self) -> bool {
        self.num_vars == other.num_vars && self.words() == other.words()
    }
}

impl Eq for TruthTable {}

impl fmt::Debug for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TruthTable({}, {})", self.num_vars, self)
    }
}

/// Hexadecimal, most significant row first.
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_vars < 6 {
            let digits = std::cmp::max(1, self.num_bits() / 4);
            let mask = (1u64 << self.num_bits()) - 1;
            write!(f, "{:0width$x}", self.words[0] & mask, width = digits)
        } else {
            for w in self.words().iter().rev() {
                write!(f, "{:016x}", w)?;
            }
            Ok(())
        }
    }
}

impl BitAndAssign for TruthTable {
    fn bitand_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.num_vars, rhs.num_vars);
        for k in 0..self.num_words() {
            self.words[k] &= rhs.words[k];
        }
    }
}

impl BitOrAssign for TruthTable {
    fn bitor_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.num_vars, rhs.num_vars);
        for k in 0..self.num_words() {
            self.words[k] |= rhs.words[k];
        }
    }
}

impl BitAnd for TruthTable {
    type Output = TruthTable;

    fn bitand(mut self, rhs: Self) -> Self::Output {
        self &= rhs;
        self
    }
}

impl BitOr for TruthTable {
    type Output = TruthTable;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl Not for TruthTable {
    type Output = TruthTable;

    fn not(mut self) -> Self::Output {
        for k in 0..self.num_words() {
            self.words[k] = !self.words[k];
        }
        self
    }
}
