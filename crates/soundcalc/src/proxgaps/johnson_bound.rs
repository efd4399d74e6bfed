use tracing::trace;

use super::{block_length, ProximityGap};
use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    security::RegimeId,
    utils::rho_plus,
};

/// Default Johnson parameter `m`; the proximity parameter is `sqrt(rho) / (2m)` below the Johnson
/// bound.
pub const JOHNSON_PARAMETER_M: f64 = 16.0;

/// List decoding up to the Johnson bound (JBR): `(1 - rho) / 2 < theta < 1 - sqrt(rho)`.
///
/// With distance `eta` from the Johnson bound, `alpha = sqrt(rho) + eta` and `theta = 1 - alpha`,
/// as required by Theorem 2 of [Ha22](https://eprint.iacr.org/2022/1216.pdf). By default
/// `eta = sqrt(rho) / (2m)` for [JOHNSON_PARAMETER_M]; a configured gap to the radius is used as
/// `eta` directly and determines `m`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JohnsonBoundRegime {
    field: FieldParams,
    gap_to_radius: Option<f64>,
    /// Number of extra opening points beyond the trace length, enters `rho+`.
    max_combo: usize,
}

impl JohnsonBoundRegime {
    pub fn new(field: FieldParams) -> Self {
        Self {
            field,
            gap_to_radius: None,
            max_combo: 1,
        }
    }

    pub fn with_gap_to_radius(mut self, gap_to_radius: Option<f64>) -> Self {
        self.gap_to_radius = gap_to_radius;
        self
    }

    pub fn with_max_combo(mut self, max_combo: usize) -> Self {
        self.max_combo = max_combo;
        self
    }

    /// The multiplicity parameter `m` of the Guruswami-Sudan decoder.
    pub fn multiplicity(&self, rate: f64) -> f64 {
        match self.gap_to_radius {
            Some(eta) => rate.sqrt() / (2.0 * eta),
            None => JOHNSON_PARAMETER_M,
        }
    }

    /// Distance `eta` of the proximity parameter from the Johnson bound `1 - sqrt(rho)`.
    pub fn gap(&self, rate: f64) -> f64 {
        match self.gap_to_radius {
            Some(eta) => eta,
            None => rate.sqrt() / (2.0 * JOHNSON_PARAMETER_M),
        }
    }

    fn alpha(&self, rate: f64) -> f64 {
        rate.sqrt() + self.gap(rate)
    }

    /// `ceil(1 / (2 (alpha / sqrt(rho+) - 1)))`, the smallest multiplicity for the shifted rate.
    fn minimal_m_plus(alpha: f64, rho_plus: f64) -> usize {
        (1.0 / (2.0 * (alpha / rho_plus.sqrt() - 1.0))).ceil() as usize
    }

    /// Error of Theorem 6.2 (resp. 1.6) of [BCIKS20](https://eprint.iacr.org/2020/654) without the
    /// factor for the number of functions: `(m + 1/2)^5 / (3 rho^{3/2}) * n / |F|`.
    fn correlated_agreement_error(&self, rate: f64, dimension: f64) -> f64 {
        let m = self.multiplicity(rate);
        (m + 0.5).powi(5) / (3.0 * rate.powf(1.5)) * block_length(rate, dimension)
            / self.field.size()
    }
}

impl ProximityGap for JohnsonBoundRegime {
    fn identifier(&self) -> RegimeId {
        RegimeId::JohnsonBound
    }

    fn proximity_parameter(&self, rate: f64, _dimension: f64) -> f64 {
        1.0 - self.alpha(rate)
    }

    /// The Guruswami-Sudan list size, pages 16-18 and Theorem 8 of
    /// [Ha22](https://eprint.iacr.org/2022/1216.pdf): `L = (m+ + 1/2) / sqrt(rho+)`.
    fn max_list_size(&self, rate: f64, dimension: f64) -> Result<usize> {
        let theta = self.proximity_parameter(rate, dimension);
        let rho_plus = rho_plus(dimension, block_length(rate, dimension), self.max_combo);

        let bound = 1.0 - rho_plus.sqrt();
        if !(theta < bound) {
            return Err(SoundnessError::JohnsonBoundInfeasible {
                theta,
                bound,
                rho_plus,
            });
        }

        let m_plus = Self::minimal_m_plus(self.alpha(rate), rho_plus);
        let bound = 1.0 - rho_plus.sqrt() * (1.0 + 1.0 / (2.0 * m_plus as f64));
        if !(theta <= bound) {
            return Err(SoundnessError::JohnsonMultiplicityInfeasible {
                theta,
                bound,
                m_plus,
                rho_plus,
            });
        }

        let list_size = ((m_plus as f64 + 0.5) / rho_plus.sqrt()).ceil() as usize;
        trace!(rate, dimension, rho_plus, m_plus, list_size, "JBR list size");
        Ok(list_size)
    }

    fn error_powers(&self, rate: f64, dimension: f64, num_functions: usize) -> f64 {
        num_functions as f64 * self.correlated_agreement_error(rate, dimension)
    }

    fn error_linear(&self, rate: f64, dimension: f64) -> f64 {
        self.correlated_agreement_error(rate, dimension)
    }
}
