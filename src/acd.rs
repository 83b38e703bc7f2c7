//! Decomposition driver.
//!
//! A decomposition runs in two steps:
//!
//! 1. [`AcDecomposition::run`] checks the input, moves late-arriving inputs into the
//!    free set and searches the best free set, yielding a [`FreeSetChoice`].
//! 2. [`FreeSetChoice::compute_decomposition`] extracts the i-sets, solves the
//!    covering problem and assembles the LUTs into a [`Decomposition`].
//!
//! The one-shot [`evaluate`] and [`decompose`] calls wrap both steps for callers that
//! only need the cost estimate or the binary record.
//!
//! # Examples
//!
//! ```
//! use acd_rs::acd::{decompose, evaluate};
//! use acd_rs::record::LutNetwork;
//! use acd_rs::types::Profile;
//!
//! // 7-input function: x6 ? (x0 ^ x1 ^ x2) : (x3 & x4 & x5)
//! let mut words = [0u64; 2];
//! for r in 0..128 {
//!     let x = |i: usize| (r >> i) & 1 == 1;
//!     let f = if x(6) { x(0) ^ x(1) ^ x(2) } else { x(3) && x(4) && x(5) };
//!     if f {
//!         words[r / 64] |= 1u64 << (r % 64);
//!     }
//! }
//!
//! let eval = evaluate(&words, 7, 6, Profile::default()).unwrap();
//! assert_eq!(eval.levels, 2);
//!
//! let mut buf = [0u8; 256];
//! decompose(&words, 7, 6, Profile::default(), &mut buf).unwrap();
//! let network = LutNetwork::from_abc_bytes(&buf, 7).unwrap();
//! assert_eq!(network.simulate().words(), &words);
//! ```

use log::debug;

use crate::assemble::{assemble, assemble_single, simulate, AcdStats, Lut};
use crate::covering::{min_depth, solve_exact, solve_heuristic, Cover};
use crate::encoding::{generate_encodings, CoveringMatrix, RowOrder};
use crate::error::AcdError;
use crate::isets::{compute_isets, ISets};
use crate::params::AcdParams;
use crate::record;
use crate::search::{find_free_set, FreeSetSearch};
use crate::truth_table::{TruthTable, MAX_NUM_VARS};
use crate::types::Profile;

/// Covers needing more bound-set LUTs than this go to the heuristic solver first.
const MAX_EXACT_DEPTH: usize = 3;

/// Ashenhurst-Curtis decomposition engine.
#[derive(Debug, Clone)]
pub struct AcDecomposition {
    params: AcdParams,
}

impl AcDecomposition {
    /// Creates an engine, rejecting out-of-range parameters.
    pub fn new(params: AcdParams) -> Result<Self, AcdError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AcdParams {
        &self.params
    }

    /// Searches the free set of the function given by `words` over `num_vars` inputs.
    ///
    /// Inputs in `delay_profile` are forced into the free set. Functions that already
    /// fit into one LUT are reported as [`FreeSetChoice::Trivial`].
    pub fn run(&self, words: &[u64], num_vars: usize, delay_profile: Profile) -> Result<FreeSetChoice, AcdError> {
        if num_vars > MAX_NUM_VARS {
            return Err(AcdError::TooManyVariables {
                num_vars,
                max: MAX_NUM_VARS,
            });
        }
        let expected = TruthTable::words_for(num_vars);
        if words.len() != expected {
            return Err(AcdError::TruthTableSize {
                expected,
                actual: words.len(),
            });
        }

        let tt = TruthTable::from_words(num_vars, words);
        let delay_profile = delay_profile.truncate(num_vars);
        if num_vars <= self.params.lut_size as usize {
            debug!("{}-input function fits into one LUT", num_vars);
            return Ok(FreeSetChoice::Trivial { tt, late: delay_profile });
        }

        let search = find_free_set(&tt, &self.params, delay_profile)?;
        Ok(FreeSetChoice::Decompose(search))
    }

    /// Runs both steps.
    pub fn decompose(&self, words: &[u64], num_vars: usize, delay_profile: Profile) -> Result<Decomposition, AcdError> {
        self.run(words, num_vars, delay_profile)?
            .compute_decomposition(&self.params)
    }
}

/// Outcome of [`AcDecomposition::run`].
#[derive(Debug, Clone)]
pub enum FreeSetChoice {
    /// The function fits into a single LUT; `late` holds the late-arriving inputs.
    Trivial { tt: TruthTable, late: Profile },
    /// The function is split along the free set found by the search.
    Decompose(FreeSetSearch),
}

impl FreeSetChoice {
    /// Returns the original inputs feeding the top LUT directly.
    ///
    /// For a trivial function these are all the inputs it depends on, plus the
    /// late-arriving ones, which reach the output through the single LUT as well.
    pub fn profile(&self) -> Profile {
        match self {
            FreeSetChoice::Trivial { tt, late } => {
                let support = (0..tt.num_vars()).filter(|&v| tt.has_var(v)).fold(0, |acc, v| acc | (1 << v));
                Profile::new(support | late.bits())
            }
            FreeSetChoice::Decompose(search) => search.profile(),
        }
    }

    /// Column multiplicity of the chosen partition (1 for a trivial function).
    pub fn multiplicity(&self) -> u32 {
        match self {
            FreeSetChoice::Trivial { .. } => 1,
            FreeSetChoice::Decompose(search) => search.multiplicity,
        }
    }

    /// Builds the LUTs of the decomposition.
    pub fn compute_decomposition(&self, params: &AcdParams) -> Result<Decomposition, AcdError> {
        let (luts, stats, num_inputs) = match self {
            FreeSetChoice::Trivial { tt, .. } => {
                let (luts, stats) = assemble_single(tt);
                (luts, stats, tt.num_vars())
            }
            FreeSetChoice::Decompose(search) => {
                let isets = compute_isets(search);
                let cover = solve_covering(search, &isets, params)?;
                let (luts, stats) = assemble(search, &isets, &cover);
                (luts, stats, search.tt.num_vars())
            }
        };
        debug!(
            "decomposition: {} LUTs, {} levels, {} edges",
            stats.num_luts, stats.num_levels, stats.num_edges
        );
        Ok(Decomposition {
            luts,
            profile: self.profile(),
            stats,
            num_inputs,
        })
    }
}

/// Selects the bound-set LUTs.
///
/// Small covers are solved exactly. Large ones go to the heuristic solver, with the
/// exact solver as fallback. A failed exact solve is retried with one more bound-set
/// LUT when the top LUT has room for it, then handed to the heuristic solver.
fn solve_covering(search: &FreeSetSearch, isets: &ISets, params: &AcdParams) -> Result<Cover, AcdError> {
    let multiplicity = isets.multiplicity();
    if multiplicity <= 1 {
        return Ok(Cover::default());
    }

    let encodings = generate_encodings(multiplicity);
    let depth = min_depth(multiplicity);
    let max_rows = params.lut_size as usize - search.free_set_size;

    if depth > MAX_EXACT_DEPTH {
        let matrix = CoveringMatrix::new(isets, &encodings, params.lut_size, RowOrder::Heuristic);
        if let Some(cover) = solve_heuristic(&matrix, max_rows, params.max_iter) {
            return Ok(cover);
        }
        debug!("heuristic covering failed, retrying exactly");
        let matrix = CoveringMatrix::new(isets, &encodings, params.lut_size, RowOrder::Exact);
        return solve_exact(&matrix, depth, params.exact_limit).ok_or(AcdError::CoveringFailed { multiplicity });
    }

    let matrix = CoveringMatrix::new(isets, &encodings, params.lut_size, RowOrder::Exact);
    if let Some(cover) = solve_exact(&matrix, depth, params.exact_limit) {
        return Ok(cover);
    }
    if depth < max_rows {
        debug!("no cover with {} rows, retrying with {}", depth, depth + 1);
        if let Some(cover) = solve_exact(&matrix, depth + 1, params.exact_limit) {
            return Ok(cover);
        }
    }
    debug!("exact covering failed, trying the heuristic solver");
    solve_heuristic(&matrix, max_rows, params.max_iter).ok_or(AcdError::CoveringFailed { multiplicity })
}

/// A computed decomposition.
#[derive(Debug, Clone)]
pub struct Decomposition {
    luts: Vec<Lut>,
    profile: Profile,
    stats: AcdStats,
    num_inputs: usize,
}

impl Decomposition {
    /// The LUTs in topological order; the last one is the output.
    pub fn luts(&self) -> &[Lut] {
        &self.luts
    }

    /// Original inputs feeding the top LUT directly.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn stats(&self) -> AcdStats {
        self.stats
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Serializes the LUTs into the binary record format.
    pub fn to_abc_bytes(&self) -> Vec<u8> {
        record::encode(&self.luts)
    }

    /// Writes the binary record into `buf`, returning the number of bytes written.
    pub fn write_abc(&self, buf: &mut [u8]) -> Result<usize, AcdError> {
        record::write(&self.luts, buf)
    }

    /// Evaluates the LUTs on all input rows.
    pub fn simulate(&self) -> TruthTable {
        simulate(&self.luts, self.num_inputs)
    }
}

/// Result of the one-shot calls.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Evaluation {
    /// LUT levels of the decomposition.
    pub levels: u32,
    /// Original inputs in the free set.
    pub profile: Profile,
    /// Number of LUTs.
    pub cost: u32,
}

impl From<&Decomposition> for Evaluation {
    fn from(decomposition: &Decomposition) -> Self {
        Evaluation {
            levels: decomposition.stats.num_levels,
            profile: decomposition.profile,
            cost: decomposition.stats.num_luts,
        }
    }
}

/// Estimates the decomposition of a function into `lut_size`-input LUTs.
pub fn evaluate(
    words: &[u64],
    num_vars: usize,
    lut_size: u32,
    delay_profile: Profile,
) -> Result<Evaluation, AcdError> {
    evaluate_with_params(words, num_vars, &AcdParams::with_lut_size(lut_size), delay_profile)
}

pub fn evaluate_with_params(
    words: &[u64],
    num_vars: usize,
    params: &AcdParams,
    delay_profile: Profile,
) -> Result<Evaluation, AcdError> {
    let engine = AcDecomposition::new(params.clone())?;
    let decomposition = engine.decompose(words, num_vars, delay_profile)?;
    Ok(Evaluation::from(&decomposition))
}

/// Decomposes a function into `lut_size`-input LUTs and writes the record into `buf`.
pub fn decompose(
    words: &[u64],
    num_vars: usize,
    lut_size: u32,
    delay_profile: Profile,
    buf: &mut [u8],
) -> Result<Evaluation, AcdError> {
    decompose_with_params(words, num_vars, &AcdParams::with_lut_size(lut_size), delay_profile, buf)
}

pub fn decompose_with_params(
    words: &[u64],
    num_vars: usize,
    params: &AcdParams,
    delay_profile: Profile,
    buf: &mut [u8],
) -> Result<Evaluation, AcdError> {
    let engine = AcDecomposition::new(params.clone())?;
    let decomposition = engine.decompose(words, num_vars, delay_profile)?;
    decomposition.write_abc(buf)?;
    Ok(Evaluation::from(&decomposition))
}
