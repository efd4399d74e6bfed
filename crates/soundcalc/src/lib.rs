//! Round-by-round soundness and proof size calculator for hash-based zkVMs.
//!
//! The calculator never touches a transcript or a field element. It evaluates closed-form error
//! bounds from the literature, parameterized by protocol configuration:
//! 1. Proximity gaps regimes (unique decoding, Johnson bound, capacity bound) bound list sizes and
//!    correlated agreement errors of Reed-Solomon codes.
//! 2. Polynomial commitment schemes (FRI, Jagged, WHIR) turn a regime into per-round errors and
//!    estimate their proof size.
//! 3. Circuits add the arithmetization (DEEP-ALI or zerocheck) and lookup errors on top of their
//!    PCS, and a zkVM aggregates its circuits.
//!
//! Every error is reported as bits of security, the largest `k` with `error <= 2^{-k}`. The
//! security of a circuit is the minimum over all its rounds.

// Re-export the Plonky3 crates the field presets come from
pub use p3_field;
pub use p3_util;

pub mod circuit;
pub mod error;
pub mod field;
/// Soundness of lookup arguments (LogUp and its GKR sub-protocol).
pub mod lookups;
/// Polynomial commitment schemes and their error models.
pub mod pcs;
pub mod proxgaps;
/// Security tables and regime identifiers.
pub mod security;
pub mod utils;
pub mod zkvm;

pub use circuit::{
    Arithmetization, Circuit, CircuitConfig, CircuitSecurityLevels, DeepAliParams, ZerocheckParams,
};
pub use error::{Result, SoundnessError};
pub use field::{parse_field, FieldParams};
pub use security::{RegimeId, SecurityTable};
pub use zkvm::ZkVm;
