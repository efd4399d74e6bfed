use derive_new::new;

use super::{block_length, ProximityGap};
use crate::{error::Result, field::FieldParams, security::RegimeId};

/// Unique decoding regime (UDR): `theta = (1 - rho) / 2`, every function is close to at most one
/// codeword.
///
/// See the UDR analysis of Gafni and Kindi, <https://hackmd.io/@pgaf/HkKs_1ytT>.
#[derive(Clone, Copy, Debug, PartialEq, new)]
pub struct UniqueDecodingRegime {
    field: FieldParams,
}

impl ProximityGap for UniqueDecodingRegime {
    fn identifier(&self) -> RegimeId {
        RegimeId::UniqueDecoding
    }

    fn proximity_parameter(&self, rate: f64, _dimension: f64) -> f64 {
        (1.0 - rate) / 2.0
    }

    fn max_list_size(&self, _rate: f64, _dimension: f64) -> Result<usize> {
        Ok(1)
    }

    /// BCIKS20 Theorems 1.5 and 6.1: `num_functions * n / |F|`.
    fn error_powers(&self, rate: f64, dimension: f64, num_functions: usize) -> f64 {
        num_functions as f64 * block_length(rate, dimension) / self.field.size()
    }

    /// BCIKS20 Theorem 1.6: `n / |F|`.
    fn error_linear(&self, rate: f64, dimension: f64) -> f64 {
        block_length(rate, dimension) / self.field.size()
    }
}
