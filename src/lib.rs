//! # acd-rs: Ashenhurst-Curtis decomposition into LUTs
//!
//! **`acd-rs`** splits a Boolean function of up to 11 inputs into a two-level network of
//! `k`-input lookup tables (LUTs), as used by FPGA technology mappers.
//!
//! ## What is an Ashenhurst-Curtis decomposition?
//!
//! The inputs of `f` are split into a *free set* `F` and a *bound set* `B`, and `f` is
//! rewritten as
//!
//! ```text
//! f(F, B) = h(F, g₁(B), ..., gᵣ(B))
//! ```
//!
//! The bound-set LUTs `gᵢ` encode which *column* (residual function over `F`) a
//! bound-set assignment selects, and the top LUT `h` picks that column. The number of
//! distinct columns, the *column multiplicity* `μ`, dictates how many bound-set LUTs
//! are needed: at least `⌈log₂ μ⌉`.
//!
//! ## Key Features
//!
//! - **Delay-aware**: late-arriving inputs can be forced into the free set, so they pass
//!   through a single LUT level.
//! - **Support minimization**: bound-set LUTs exploit don't-cares between i-sets to use
//!   as few inputs as possible; single-input LUTs are folded into the top LUT.
//! - **Exact and heuristic covering** of the distinguishing constraints.
//! - **Binary LUT record** compatible with external mappers, with a decoder and a
//!   simulator to check results.
//!
//! ## Basic Usage
//!
//! ```rust
//! use acd_rs::acd::AcDecomposition;
//! use acd_rs::params::AcdParams;
//! use acd_rs::truth_table::TruthTable;
//! use acd_rs::types::Profile;
//!
//! // Majority of five inputs, mapped into 4-input LUTs.
//! let f = TruthTable::from_fn(5, |row| row.count_ones() >= 3);
//!
//! let engine = AcDecomposition::new(AcdParams::with_lut_size(4)).unwrap();
//! let choice = engine.run(f.words(), 5, Profile::default()).unwrap();
//! println!("free set = {}", choice.profile());
//!
//! let decomposition = choice.compute_decomposition(engine.params()).unwrap();
//! assert_eq!(decomposition.stats().num_luts, 3);
//! assert_eq!(decomposition.simulate(), f);
//! ```
//!
//! ## Core Components
//!
//! - **[`acd`]**: The driver and the one-shot [`evaluate`][crate::acd::evaluate] / [`decompose`][crate::acd::decompose] calls.
//! - **[`search`]**: Free-set search over all variable combinations.
//! - **[`encoding`]** and **[`covering`]**: Choice of the bound-set LUTs.
//! - **[`record`]**: The binary LUT record.

pub mod acd;
pub mod assemble;
pub mod covering;
pub mod encoding;
pub mod error;
pub mod isets;
pub mod multiplicity;
pub mod pairs;
pub mod params;
pub mod record;
pub mod search;
pub mod truth_table;
pub mod types;
pub mod utils;
