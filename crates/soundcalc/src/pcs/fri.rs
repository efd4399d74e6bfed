use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{format_parameters, PolynomialCommitmentScheme};
use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    proxgaps::{ProximityGap, ProximityGapsRegime},
    security::SecurityTable,
    utils::{
        bits_of_security, bits_of_security_from_log2, expected_merkle_multi_proof_bits,
        merkle_multi_proof_bits, with_grinding,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FriConfig {
    /// Output length in bits of the hash used for the Merkle trees.
    pub hash_size_bits: usize,
    /// Rate `rho` of the Reed-Solomon code.
    pub rho: f64,
    /// Domain size before the low-degree extension.
    pub trace_length: usize,
    pub field: FieldParams,
    /// Number of functions batched into the first FRI oracle. May exceed the number of trace
    /// columns, e.g. with composition polynomial segments.
    pub batch_size: usize,
    /// Batch with `r^0, r^1, ..., r^{batch_size - 1}` instead of independent coefficients.
    pub power_batching: bool,
    pub num_queries: usize,
    /// One folding factor per FRI round.
    pub folding_factors: Vec<usize>,
    /// Degree at which folding stops and the final polynomial is sent in the clear.
    pub early_stop_degree: usize,
    /// Proof-of-work bits before sampling the query indices.
    pub grinding_query_phase: usize,
    /// Proof-of-work bits in every round of the commit phase.
    #[serde(default)]
    pub grinding_commit_phase: usize,
    /// Pins the distance from the decoding radius used by list decoding regimes.
    #[serde(default)]
    pub gap_to_radius: Option<f64>,
}

/// Batched FRI over a Reed-Solomon code of rate `rho` on a domain of size `D = trace_length / rho`.
#[derive(Clone, Debug, PartialEq)]
pub struct Fri {
    config: FriConfig,
    /// `k = -log2(rho)`.
    log_blowup: usize,
    /// `h = log2(trace_length)`.
    log_trace_length: usize,
    domain_size: usize,
}

impl Fri {
    pub fn new(config: FriConfig) -> Result<Self> {
        if !(config.rho > 0.0 && config.rho < 1.0) {
            return Err(SoundnessError::invalid("FRI", "rho", config.rho, "must be in (0, 1)"));
        }
        for (name, value) in [
            ("hash_size_bits", config.hash_size_bits),
            ("trace_length", config.trace_length),
            ("batch_size", config.batch_size),
            ("num_queries", config.num_queries),
            ("early_stop_degree", config.early_stop_degree),
        ] {
            if value == 0 {
                return Err(SoundnessError::invalid("FRI", name, value, "must be positive"));
            }
        }
        if let Some((round, &factor)) =
            config.folding_factors.iter().find_position(|&&factor| factor < 2)
        {
            return Err(SoundnessError::InvalidFoldingFactor { round, factor });
        }

        let domain_size = (config.trace_length as f64 / config.rho) as usize;
        let mut final_size = domain_size;
        for (round, &factor) in config.folding_factors.iter().enumerate() {
            if final_size % factor != 0 {
                return Err(SoundnessError::InvalidFoldingFactor { round, factor });
            }
            final_size /= factor;
        }
        if final_size != config.early_stop_degree {
            return Err(SoundnessError::FriEarlyStopMismatch {
                rounds: config.folding_factors.len(),
                domain_size: final_size,
                early_stop_degree: config.early_stop_degree,
            });
        }

        Ok(Self {
            log_blowup: (-config.rho.log2()).round() as usize,
            log_trace_length: (config.trace_length as f64).log2().round() as usize,
            domain_size,
            config,
        })
    }

    pub fn config(&self) -> &FriConfig {
        &self.config
    }

    pub fn field(&self) -> FieldParams {
        self.config.field
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    pub fn num_rounds(&self) -> usize {
        self.config.folding_factors.len()
    }

    fn batching_error(&self, regime: &ProximityGapsRegime) -> f64 {
        let (rate, dimension) = (self.config.rho, self.config.trace_length as f64);
        if self.config.power_batching {
            regime.error_powers(rate, dimension, self.config.batch_size)
        } else {
            regime.error_linear(rate, dimension)
        }
    }

    /// Round `round` folds a code of dimension `trace_length / (f_0 * ... * f_round)` with
    /// `f_round` powers of the folding challenge.
    fn commit_phase_error(&self, round: usize, regime: &ProximityGapsRegime) -> f64 {
        let factors = &self.config.folding_factors;
        let folded: usize = factors[..=round].iter().product();
        let dimension = self.config.trace_length as f64 / folded as f64;
        let error = regime.error_powers(self.config.rho, dimension, factors[round]);
        with_grinding(error, self.config.grinding_commit_phase)
    }

    /// `log2((1 - theta)^num_queries * 2^{-grinding})`, last term of Equation 7 in Theorem 2 of
    /// [Ha22](https://eprint.iacr.org/2022/1216.pdf). Kept in the log domain since it underflows
    /// `f64` for large query counts.
    fn log2_query_phase_error(&self, regime: &ProximityGapsRegime) -> f64 {
        let theta = regime.proximity_parameter(self.config.rho, self.config.trace_length as f64);
        self.config.num_queries as f64 * (1.0 - theta).log2()
            - self.config.grinding_query_phase as f64
    }

    fn proof_size(&self, expected: bool) -> usize {
        fri_proof_size_bits(
            self.config.hash_size_bits,
            self.config.field.extension_field_element_size_bits(),
            self.config.batch_size,
            self.config.num_queries,
            self.domain_size,
            &self.config.folding_factors,
            self.config.rho,
            expected,
        )
    }
}

impl PolynomialCommitmentScheme for Fri {
    fn security_levels(&self, regime: &ProximityGapsRegime) -> Result<SecurityTable> {
        let mut table = SecurityTable::new();
        table.insert("batching", bits_of_security(self.batching_error(regime))?)?;
        for round in 0..self.num_rounds() {
            let bits = bits_of_security(self.commit_phase_error(round, regime))?;
            table.insert(format!("commit round {}", round + 1), bits)?;
        }
        table.insert(
            "query phase",
            bits_of_security_from_log2(self.log2_query_phase_error(regime))?,
        )?;
        debug!(regime = %regime.identifier(), "FRI security levels:\n{table}");
        Ok(table)
    }

    fn proof_size_bits(&self) -> usize {
        self.proof_size(false)
    }

    fn expected_proof_size_bits(&self) -> usize {
        self.proof_size(true)
    }

    fn rate(&self) -> f64 {
        self.config.rho
    }

    fn dimension(&self) -> usize {
        self.config.trace_length
    }

    fn gap_to_radius(&self) -> Option<f64> {
        self.config.gap_to_radius
    }

    fn parameter_summary(&self) -> String {
        let c = &self.config;
        format_parameters(&[
            ("hash_size_bits", c.hash_size_bits.to_string()),
            ("rho", c.rho.to_string()),
            ("k = -log2(rho)", self.log_blowup.to_string()),
            ("trace_length", c.trace_length.to_string()),
            ("h = log2(trace_length)", self.log_trace_length.to_string()),
            ("domain_size D = trace_length / rho", self.domain_size.to_string()),
            ("batch_size", c.batch_size.to_string()),
            ("power_batching", c.power_batching.to_string()),
            ("num_queries", c.num_queries.to_string()),
            ("gap_to_radius", format!("{:?}", c.gap_to_radius)),
            ("FRI_folding_factors", format!("{:?}", c.folding_factors)),
            ("FRI_early_stop_degree", c.early_stop_degree.to_string()),
            ("FRI_rounds_n", self.num_rounds().to_string()),
            ("grinding_query_phase", c.grinding_query_phase.to_string()),
            ("grinding_commit_phase", c.grinding_commit_phase.to_string()),
            ("field", c.field.to_string()),
            ("field_extension_degree", c.field.extension_degree().to_string()),
        ])
    }
}

/// Size of a BCS-compiled batched FRI proof.
///
/// The initial oracle is one Merkle tree over `domain_size` leaves, leaf `i` holding symbol `i` of
/// every batched function. Each folding round commits to a tree whose leaves group the
/// `folding_factor` siblings that are always opened together. Every tree contributes its root and
/// `num_queries` openings. The final polynomial (`rate * final_domain_size` coefficients) is sent
/// in the clear.
#[allow(clippy::too_many_arguments)]
pub fn fri_proof_size_bits(
    hash_size_bits: usize,
    field_size_bits: usize,
    batch_size: usize,
    num_queries: usize,
    domain_size: usize,
    folding_factors: &[usize],
    rate: f64,
    expected: bool,
) -> usize {
    let multi_proof = |num_leaves: usize, tuple_size: usize| {
        if expected {
            expected_merkle_multi_proof_bits(
                num_leaves,
                num_queries,
                tuple_size,
                field_size_bits,
                hash_size_bits,
            )
        } else {
            merkle_multi_proof_bits(
                num_leaves,
                num_queries,
                tuple_size,
                field_size_bits,
                hash_size_bits,
            )
        }
    };

    let mut n = domain_size;
    let mut size_bits = hash_size_bits + multi_proof(n, batch_size);
    for &factor in folding_factors {
        size_bits += hash_size_bits + multi_proof(n / factor, factor);
        n /= factor;
    }
    size_bits + (rate * n as f64 * field_size_bits as f64).ceil() as usize
}
