//! Proximity gaps / (mutual) correlated agreement regimes for Reed-Solomon codes.
//!
//! A regime fixes how far from the code a function may be while the protocol still reasons about
//! it (the proximity parameter `theta`), how many codewords such a function can be close to (the
//! list size), and the correlated agreement error of random linear combinations. All formulas are
//! for RS codes of dimension `k` and rate `rho`, i.e. over a domain of size `n = k / rho`.

mod capacity_bound;
mod johnson_bound;
mod unique_decoding;

pub use capacity_bound::*;
pub use johnson_bound::*;
pub use unique_decoding::*;

use crate::{error::Result, security::RegimeId};

/// The capability set every regime provides. All methods are pure.
pub trait ProximityGap {
    fn identifier(&self) -> RegimeId;

    /// The proximity parameter `theta` in `(0, 1)`.
    fn proximity_parameter(&self, rate: f64, dimension: f64) -> f64;

    /// Upper bound on the number of codewords a function can be `theta`-close to.
    fn max_list_size(&self, rate: f64, dimension: f64) -> Result<usize>;

    /// Correlated agreement error when batching `num_functions` functions with coefficients
    /// `r^0, r^1, ..., r^{num_functions - 1}` (batching over parameterized curves in BCIKS20).
    fn error_powers(&self, rate: f64, dimension: f64, num_functions: usize) -> f64;

    /// Correlated agreement error when batching with independent coefficients
    /// `1, r_1, ..., r_{num_functions - 1}` (batching over affine spaces in BCIKS20). Independent
    /// of the number of functions.
    fn error_linear(&self, rate: f64, dimension: f64) -> f64;
}

/// The closed set of regimes the calculator knows about.
#[derive(Clone, Debug, PartialEq)]
pub enum ProximityGapsRegime {
    UniqueDecoding(UniqueDecodingRegime),
    JohnsonBound(JohnsonBoundRegime),
    CapacityBound(CapacityBoundRegime),
}

impl ProximityGap for ProximityGapsRegime {
    fn identifier(&self) -> RegimeId {
        match self {
            Self::UniqueDecoding(regime) => regime.identifier(),
            Self::JohnsonBound(regime) => regime.identifier(),
            Self::CapacityBound(regime) => regime.identifier(),
        }
    }

    fn proximity_parameter(&self, rate: f64, dimension: f64) -> f64 {
        match self {
            Self::UniqueDecoding(regime) => regime.proximity_parameter(rate, dimension),
            Self::JohnsonBound(regime) => regime.proximity_parameter(rate, dimension),
            Self::CapacityBound(regime) => regime.proximity_parameter(rate, dimension),
        }
    }

    fn max_list_size(&self, rate: f64, dimension: f64) -> Result<usize> {
        match self {
            Self::UniqueDecoding(regime) => regime.max_list_size(rate, dimension),
            Self::JohnsonBound(regime) => regime.max_list_size(rate, dimension),
            Self::CapacityBound(regime) => regime.max_list_size(rate, dimension),
        }
    }

    fn error_powers(&self, rate: f64, dimension: f64, num_functions: usize) -> f64 {
        match self {
            Self::UniqueDecoding(regime) => regime.error_powers(rate, dimension, num_functions),
            Self::JohnsonBound(regime) => regime.error_powers(rate, dimension, num_functions),
            Self::CapacityBound(regime) => regime.error_powers(rate, dimension, num_functions),
        }
    }

    fn error_linear(&self, rate: f64, dimension: f64) -> f64 {
        match self {
            Self::UniqueDecoding(regime) => regime.error_linear(rate, dimension),
            Self::JohnsonBound(regime) => regime.error_linear(rate, dimension),
            Self::CapacityBound(regime) => regime.error_linear(rate, dimension),
        }
    }
}

impl From<UniqueDecodingRegime> for ProximityGapsRegime {
    fn from(regime: UniqueDecodingRegime) -> Self {
        Self::UniqueDecoding(regime)
    }
}

impl From<JohnsonBoundRegime> for ProximityGapsRegime {
    fn from(regime: JohnsonBoundRegime) -> Self {
        Self::JohnsonBound(regime)
    }
}

impl From<CapacityBoundRegime> for ProximityGapsRegime {
    fn from(regime: CapacityBoundRegime) -> Self {
        Self::CapacityBound(regime)
    }
}

/// Length of the evaluation domain, `n = k / rho`.
#[inline]
pub(crate) fn block_length(rate: f64, dimension: f64) -> f64 {
    dimension / rate
}
