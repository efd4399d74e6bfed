use p3_util::log2_ceil_usize;
use serde::{Deserialize, Serialize};

use super::{format_parameters, Fri, FriConfig, PolynomialCommitmentScheme};
use crate::{
    error::{Result, SoundnessError},
    proxgaps::ProximityGapsRegime,
    security::SecurityTable,
    utils::{bits_of_security, sumcheck_size_bits},
};

/// Degree of the round polynomials in both jagged sumchecks.
const JAGGED_SUMCHECK_DEGREE: usize = 2;

/// Jagged PCS on top of a dense FRI (Basefold) commitment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JaggedConfig {
    pub dense_pcs: FriConfig,
    /// Maximum height of the jagged trace.
    pub trace_height: usize,
    /// Maximum width of the jagged trace.
    pub trace_width: usize,
}

/// Commits to a jagged trace (columns of varying height) by packing it into one dense
/// polynomial. Evaluation claims on the jagged trace are reduced to the dense polynomial with two
/// sumchecks and a random linear combination over the columns.
#[derive(Clone, Debug, PartialEq)]
pub struct JaggedPcs {
    dense_pcs: Fri,
    trace_height: usize,
    trace_width: usize,
}

impl JaggedPcs {
    pub fn new(config: JaggedConfig) -> Result<Self> {
        if config.trace_height == 0 {
            return Err(SoundnessError::invalid("Jagged", "trace_height", 0, "must be positive"));
        }
        if config.trace_width == 0 {
            return Err(SoundnessError::invalid("Jagged", "trace_width", 0, "must be positive"));
        }
        Ok(Self {
            dense_pcs: Fri::new(config.dense_pcs)?,
            trace_height: config.trace_height,
            trace_width: config.trace_width,
        })
    }

    pub fn dense_pcs(&self) -> &Fri {
        &self.dense_pcs
    }

    /// Number of variables of the dense polynomial, `ceil(log2(dense_length)) +
    /// ceil(log2(batch_size))`.
    pub fn log_trace(&self) -> usize {
        log2_ceil_usize(self.dense_pcs.dimension()) + log2_ceil_usize(self.dense_pcs.batch_size())
    }

    /// Random linear combination over the columns, the jagged sumcheck, and the jagged evaluation
    /// sumcheck over `2 * log_trace + 2` variables.
    fn reduction_error(&self) -> f64 {
        let field_size = self.dense_pcs.field().size();
        let log_trace = self.log_trace() as f64;
        let rlc = log2_ceil_usize(self.trace_width) as f64 / field_size;
        let jagged_sumcheck = 2.0 * log_trace / field_size;
        let jagged_evaluation_sumcheck = 2.0 * (2.0 * log_trace + 2.0) / field_size;
        rlc + jagged_sumcheck + jagged_evaluation_sumcheck
    }

    fn reduction_proof_size_bits(&self) -> usize {
        let log_trace = self.log_trace();
        let field_bits = self.dense_pcs.field().extension_field_element_size_bits();
        sumcheck_size_bits(JAGGED_SUMCHECK_DEGREE, log_trace, field_bits)
            + sumcheck_size_bits(JAGGED_SUMCHECK_DEGREE, 2 * log_trace + 2, field_bits)
    }
}

impl PolynomialCommitmentScheme for JaggedPcs {
    fn security_levels(&self, regime: &ProximityGapsRegime) -> Result<SecurityTable> {
        let mut table = self.dense_pcs.security_levels(regime)?;
        table.insert("reduce to dense PCS", bits_of_security(self.reduction_error())?)?;
        Ok(table)
    }

    fn proof_size_bits(&self) -> usize {
        self.dense_pcs.proof_size_bits() + self.reduction_proof_size_bits()
    }

    fn expected_proof_size_bits(&self) -> usize {
        self.dense_pcs.expected_proof_size_bits() + self.reduction_proof_size_bits()
    }

    fn rate(&self) -> f64 {
        self.dense_pcs.rate()
    }

    fn dimension(&self) -> usize {
        self.dense_pcs.dimension()
    }

    fn trace_height(&self) -> usize {
        self.trace_height
    }

    fn gap_to_radius(&self) -> Option<f64> {
        self.dense_pcs.gap_to_radius()
    }

    fn parameter_summary(&self) -> String {
        let fri = &self.dense_pcs;
        let c = fri.config();
        format_parameters(&[
            ("hash_size_bits", c.hash_size_bits.to_string()),
            ("rho", c.rho.to_string()),
            ("dense_length", c.trace_length.to_string()),
            ("trace_height", self.trace_height.to_string()),
            ("trace_width", self.trace_width.to_string()),
            ("log_trace", self.log_trace().to_string()),
            ("domain_size D = dense_length / rho", fri.domain_size().to_string()),
            ("dense_batch_size", c.batch_size.to_string()),
            ("power_batching", c.power_batching.to_string()),
            ("num_queries", c.num_queries.to_string()),
            ("gap_to_radius", format!("{:?}", c.gap_to_radius)),
            ("FRI_folding_factors", format!("{:?}", c.folding_factors)),
            ("FRI_early_stop_degree", c.early_stop_degree.to_string()),
            ("FRI_rounds_n", fri.num_rounds().to_string()),
            ("grinding_query_phase", c.grinding_query_phase.to_string()),
            ("grinding_commit_phase", c.grinding_commit_phase.to_string()),
            ("field", c.field.to_string()),
        ])
    }
}
