use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{block_length, ProximityGap};
use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    security::RegimeId,
    utils::rho_plus,
};

/// Constants of the proximity gaps conjecture (Conjecture 8.4 of
/// [BCIKS20](https://eprint.iacr.org/2020/654)) and of the list size conjecture.
///
/// None of these values are proven. Security levels computed under the capacity bound regime
/// are only as good as the conjecture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityBoundParams {
    pub c1: f64,
    pub c2: f64,
    /// Exponent of the list size conjecture.
    pub c3: f64,
    /// Distance of the proximity parameter from capacity, `theta = 1 - rho - eta`.
    pub eta: f64,
}

impl Default for CapacityBoundParams {
    fn default() -> Self {
        Self {
            c1: 1.0,
            c2: 1.0,
            c3: 1.0,
            eta: 0.05,
        }
    }
}

/// List decoding up to the capacity bound (CBR): `theta = 1 - rho - eta`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapacityBoundRegime {
    field: FieldParams,
    params: CapacityBoundParams,
    max_combo: usize,
}

impl CapacityBoundRegime {
    pub fn new(field: FieldParams, params: CapacityBoundParams) -> Self {
        Self {
            field,
            params,
            max_combo: 1,
        }
    }

    pub fn with_max_combo(mut self, max_combo: usize) -> Self {
        self.max_combo = max_combo;
        self
    }

    pub fn params(&self) -> &CapacityBoundParams {
        &self.params
    }

    /// Conjecture 8.4, first item: `(1 / (eta rho)^{C1}) * n^{C2} / |F|`.
    fn correlated_agreement_error(&self, rate: f64, dimension: f64) -> f64 {
        let CapacityBoundParams { c1, c2, eta, .. } = self.params;
        let n = block_length(rate, dimension);
        (eta * rate).powf(c1).recip() * n.powf(c2) / self.field.size()
    }
}

impl ProximityGap for CapacityBoundRegime {
    fn identifier(&self) -> RegimeId {
        RegimeId::CapacityBound
    }

    fn proximity_parameter(&self, rate: f64, _dimension: f64) -> f64 {
        1.0 - rate - self.params.eta
    }

    /// `L = (n / eta+)^{C3}` with `eta+ = 1 - rho+ - theta`.
    fn max_list_size(&self, rate: f64, dimension: f64) -> Result<usize> {
        let theta = self.proximity_parameter(rate, dimension);
        let n = block_length(rate, dimension);
        let rho_plus = rho_plus(dimension, n, self.max_combo);

        let bound = 1.0 - rho_plus;
        if !(theta < bound) {
            return Err(SoundnessError::CapacityBoundInfeasible {
                theta,
                bound,
                rho_plus,
            });
        }
        let eta_plus = bound - theta;

        let list_size = (n / eta_plus).powf(self.params.c3).ceil() as usize;
        trace!(rate, dimension, rho_plus, eta_plus, list_size, "CBR list size");
        Ok(list_size)
    }

    /// Conjecture 8.4, second item: the linear error times `num_functions^{C2}`.
    fn error_powers(&self, rate: f64, dimension: f64, num_functions: usize) -> f64 {
        let scale = (num_functions as f64).powf(self.params.c2);
        scale * self.correlated_agreement_error(rate, dimension)
    }

    fn error_linear(&self, rate: f64, dimension: f64) -> f64 {
        self.correlated_agreement_error(rate, dimension)
    }
}
