//! Failure taxonomy of the decomposition engine.

use std::fmt;

/// Error type for decomposition.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AcdError {
    /// The function has more inputs than the engine supports.
    TooManyVariables { num_vars: usize, max: usize },
    /// Too many late-arriving inputs to fit into the free set.
    InfeasibleDelayProfile { late_arriving: usize, limit: usize },
    /// No free set satisfies the multiplicity and cost bounds.
    NoFeasibleFreeSet,
    /// The covering problem for the chosen free set has no solution within the limits.
    CoveringFailed { multiplicity: u32 },
    /// Configuration values out of range.
    InvalidParams(String),
    /// Wrong number of truth-table words for the number of inputs.
    TruthTableSize { expected: usize, actual: usize },
    /// Output buffer too small for the LUT record.
    BufferTooSmall { needed: usize, actual: usize },
    /// LUT record that does not follow the format.
    MalformedRecord(String),
}

impl fmt::Display for AcdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcdError::TooManyVariables { num_vars, max } => {
                write!(f, "function has {} inputs, at most {} are supported", num_vars, max)
            }
            AcdError::InfeasibleDelayProfile { late_arriving, limit } => {
                write!(f, "{} late-arriving inputs, at most {} fit into the free set", late_arriving, limit)
            }
            AcdError::NoFeasibleFreeSet => write!(f, "no feasible free set found"),
            AcdError::CoveringFailed { multiplicity } => {
                write!(f, "no bound-set encoding covers multiplicity {}", multiplicity)
            }
            AcdError::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
            AcdError::TruthTableSize { expected, actual } => {
                write!(f, "expected {} truth-table words, got {}", expected, actual)
            }
            AcdError::BufferTooSmall { needed, actual } => {
                write!(f, "record needs {} bytes, buffer has {}", needed, actual)
            }
            AcdError::MalformedRecord(msg) => write!(f, "malformed LUT record: {}", msg),
        }
    }
}

impl std::error::Error for AcdError {}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_display() {
        let e = AcdError::TooManyVariables { num_vars: 12, max: 11 };
        assert_eq!(e.to_string(), "function has 12 inputs, at most 11 are supported");
        let e = AcdError::CoveringFailed { multiplicity: 7 };
        assert_eq!(e.to_string(), "no bound-set encoding covers multiplicity 7");
    }
}
