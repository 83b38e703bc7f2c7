//! Configuration of the decomposition engine.

use crate::error::AcdError;

/// Largest LUT the record format can describe (8 truth-table bytes).
pub const MAX_LUT_SIZE: u32 = 6;

/// Largest free set the column-multiplicity evaluator handles.
pub const MAX_FREE_SET_VARS: u32 = 5;

/// Largest multiplicity the covering solver accepts (`C(16, 2)` pairs fit in a [`PairSet`][crate::pairs::PairSet]).
pub const MAX_MULTIPLICITY: u32 = 16;

/// Parameters of the Ashenhurst-Curtis decomposition.
///
/// Use `AcdParams::default()` for the standard 6-LUT settings.
///
/// # Examples
///
/// ```
/// use acd_rs::params::AcdParams;
///
/// let params = AcdParams {
///     lut_size: 4,
///     try_no_late_arrival: true,
///     ..AcdParams::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AcdParams {
    /// Fan-in of the target LUTs (default: 6)
    pub lut_size: u32,
    /// Largest free set tried (default: 5)
    pub max_free_set_vars: u32,
    /// Free sets are admissible only below this multiplicity (default: 12)
    pub max_multiplicity: u32,
    /// Local-search rounds of the heuristic covering improvement (default: 100)
    pub max_iter: u32,
    /// Complete covers examined by the exact covering solver before it settles (default: 2000)
    pub exact_limit: u32,
    /// Only consider free sets that leave at most `lut_size` bound-set inputs (default: true)
    pub support_reducing_only: bool,
    /// Stop at the first admissible free-set size (default: false)
    pub use_first: bool,
    /// Retry without the delay profile when it makes the search fail (default: false)
    pub try_no_late_arrival: bool,
}

impl Default for AcdParams {
    fn default() -> Self {
        Self {
            lut_size: 6,
            max_free_set_vars: 5,
            max_multiplicity: 12,
            max_iter: 100,
            exact_limit: 2000,
            support_reducing_only: true,
            use_first: false,
            try_no_late_arrival: false,
        }
    }
}

impl AcdParams {
    /// Default parameters for the given LUT size.
    pub fn with_lut_size(lut_size: u32) -> Self {
        Self {
            lut_size,
            ..Self::default()
        }
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> Result<(), AcdError> {
        if !(2..=MAX_LUT_SIZE).contains(&self.lut_size) {
            return Err(AcdError::InvalidParams(format!(
                "lut_size must be in 2..={}, got {}",
                MAX_LUT_SIZE, self.lut_size
            )));
        }
        if !(1..=MAX_FREE_SET_VARS).contains(&self.max_free_set_vars) {
            return Err(AcdError::InvalidParams(format!(
                "max_free_set_vars must be in 1..={}, got {}",
                MAX_FREE_SET_VARS, self.max_free_set_vars
            )));
        }
        if !(3..=MAX_MULTIPLICITY + 1).contains(&self.max_multiplicity) {
            return Err(AcdError::InvalidParams(format!(
                "max_multiplicity must be in 3..={}, got {}",
                MAX_MULTIPLICITY + 1,
                self.max_multiplicity
            )));
        }
        Ok(())
    }

    /// Largest free-set size worth trying for a function of `num_vars` inputs.
    pub(crate) fn free_set_ceiling(&self, num_vars: usize) -> usize {
        let ceiling = (self.lut_size - 1).min(self.max_free_set_vars) as usize;
        ceiling.min(num_vars.saturating_sub(1))
    }
}
