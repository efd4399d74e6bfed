use serde::{Deserialize, Serialize};

use super::{format_parameters, PolynomialCommitmentScheme};
use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    proxgaps::ProximityGapsRegime,
    security::SecurityTable,
    utils::{expected_merkle_multi_proof_bits, merkle_multi_proof_bits},
};

/// Parameters of a WHIR instance, in the notation of the WHIR paper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhirConfig {
    pub hash_size_bits: usize,
    /// `log2(1 / rho)` of the initial code.
    pub log_inv_rate: usize,
    /// Number of WHIR iterations `M`. Each iteration consists of several rounds.
    pub num_iterations: usize,
    /// Constant folding factor `k`: every iteration goes from `2^{m_i}` to `2^{m_i - k}`
    /// coefficients.
    pub folding_factor: usize,
    pub field: FieldParams,
    /// `m`, the log of the degree being tested.
    pub log_degree: usize,
    /// Degree `d` of the constraints on the committed words (Construction 5.1).
    pub constraint_degree: usize,
    /// In-domain queries per iteration, one entry for each of the first `M - 1` iterations.
    pub num_queries: Vec<usize>,
    /// Out-of-domain samples per iteration, one entry for each of the first `M - 1` iterations.
    pub num_ood_samples: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Whir {
    config: WhirConfig,
    /// `m_i = m - i k`.
    log_degrees: Vec<usize>,
    /// The domain shrinks by a factor of two per iteration while the degree shrinks by `2^k`.
    log_inv_rates: Vec<usize>,
}

impl Whir {
    pub fn new(config: WhirConfig) -> Result<Self> {
        if config.log_inv_rate == 0 {
            return Err(SoundnessError::invalid("WHIR", "log_inv_rate", 0, "must be positive"));
        }
        if config.folding_factor == 0 {
            return Err(SoundnessError::invalid("WHIR", "folding_factor", 0, "must be positive"));
        }
        if config.num_iterations == 0 {
            return Err(SoundnessError::invalid("WHIR", "num_iterations", 0, "must be positive"));
        }
        // The initial codeword of length 2^{m + log_inv_rate} is the largest domain.
        let log_codeword_len = config.log_degree.checked_add(config.log_inv_rate);
        if log_codeword_len.is_none_or(|len| len >= usize::BITS as usize) {
            return Err(SoundnessError::invalid(
                "WHIR",
                "log_degree",
                config.log_degree,
                "log_degree + log_inv_rate must be below the pointer width",
            ));
        }
        let folded = config.num_iterations.checked_mul(config.folding_factor);
        if folded.is_none_or(|folded| folded > config.log_degree) {
            return Err(SoundnessError::invalid(
                "WHIR",
                "num_iterations",
                config.num_iterations,
                "folds more variables than log_degree",
            ));
        }
        let num_rounds = config.num_iterations - 1;
        if config.num_queries.len() != num_rounds {
            return Err(SoundnessError::invalid(
                "WHIR",
                "num_queries",
                config.num_queries.len(),
                "needs one entry per iteration but the last",
            ));
        }
        if config.num_ood_samples.len() != num_rounds {
            return Err(SoundnessError::invalid(
                "WHIR",
                "num_ood_samples",
                config.num_ood_samples.len(),
                "needs one entry per iteration but the last",
            ));
        }

        let k = config.folding_factor;
        let log_degrees = (0..config.num_iterations)
            .map(|i| config.log_degree - i * k)
            .collect();
        let log_inv_rates = (0..config.num_iterations)
            .map(|i| config.log_inv_rate + i * (k - 1))
            .collect();
        Ok(Self {
            config,
            log_degrees,
            log_inv_rates,
        })
    }

    pub fn config(&self) -> &WhirConfig {
        &self.config
    }

    pub fn log_degrees(&self) -> &[usize] {
        &self.log_degrees
    }

    pub fn log_inv_rates(&self) -> &[usize] {
        &self.log_inv_rates
    }

    fn proof_size(&self, expected: bool) -> usize {
        let c = &self.config;
        let k = c.folding_factor;
        let field_bits = c.field.extension_field_element_size_bits();
        let block_size = 1 << k;

        let mut size_bits = c.hash_size_bits;
        // k sumcheck rounds per iteration, each sending a polynomial of degree d + 1.
        size_bits += c.num_iterations * k * (c.constraint_degree + 2) * field_bits;

        let rounds = c.num_queries.iter().zip(&c.num_ood_samples).enumerate();
        for (i, (&num_queries, &num_ood)) in rounds {
            let num_leaves = 1 << (self.log_degrees[i] + self.log_inv_rates[i] - k);
            let openings = if expected {
                expected_merkle_multi_proof_bits(
                    num_leaves,
                    num_queries,
                    block_size,
                    field_bits,
                    c.hash_size_bits,
                )
            } else {
                merkle_multi_proof_bits(
                    num_leaves,
                    num_queries,
                    block_size,
                    field_bits,
                    c.hash_size_bits,
                )
            };
            size_bits += c.hash_size_bits + num_ood * field_bits + openings;
        }

        let log_final_len = c.log_degree - c.num_iterations * k;
        size_bits + (1 << log_final_len) * field_bits
    }
}

impl PolynomialCommitmentScheme for Whir {
    // TODO: per-round fold, out-of-domain, shift and final errors of the WHIR paper.
    fn security_levels(&self, _regime: &ProximityGapsRegime) -> Result<SecurityTable> {
        Err(SoundnessError::UnfinishedModel("WHIR"))
    }

    fn proof_size_bits(&self) -> usize {
        self.proof_size(false)
    }

    fn expected_proof_size_bits(&self) -> usize {
        self.proof_size(true)
    }

    fn rate(&self) -> f64 {
        2.0_f64.powi(-(self.config.log_inv_rate as i32))
    }

    fn dimension(&self) -> usize {
        1 << self.config.log_degree
    }

    fn parameter_summary(&self) -> String {
        let c = &self.config;
        let summary = format_parameters(&[
            ("hash_size_bits", c.hash_size_bits.to_string()),
            ("log_inv_rate", c.log_inv_rate.to_string()),
            ("log_degree", c.log_degree.to_string()),
            ("folding_factor", c.folding_factor.to_string()),
            ("num_iterations", c.num_iterations.to_string()),
            ("constraint_degree", c.constraint_degree.to_string()),
            ("field", c.field.to_string()),
        ]);
        let per_round = [
            format!("    log_degrees     : {:?}", self.log_degrees),
            format!("    log_inv_rates   : {:?}", self.log_inv_rates),
            format!("    num_queries     : {:?}", c.num_queries),
            format!("    num_ood_samples : {:?}", c.num_ood_samples),
        ];
        // Insert the per-round listing before the closing fence.
        let body = summary.trim_end_matches("```");
        format!(
            "{body}\n  Per-round parameters:\n{}\n```",
            per_round.join("\n")
        )
    }
}
