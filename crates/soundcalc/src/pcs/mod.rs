//! Polynomial commitment schemes and their error models.
//!
//! A PCS reports round-by-round security levels for a given proximity gaps regime together with
//! an estimate of its proof size. The PCS is the only component that knows the code (rate and
//! dimension) used by a circuit; the arithmetization layer reads them from here.

mod fri;
mod jagged;
mod whir;

pub use fri::*;
pub use jagged::*;
pub use whir::*;

use serde::{Deserialize, Serialize};

use crate::{error::Result, proxgaps::ProximityGapsRegime, security::SecurityTable};

pub trait PolynomialCommitmentScheme {
    /// Security levels of the PCS phases under `regime`. The returned table is not sealed; the
    /// caller merges it with arithmetization-level entries first.
    fn security_levels(&self, regime: &ProximityGapsRegime) -> Result<SecurityTable>;

    /// Worst-case proof size: every Merkle opening pays for its full path.
    fn proof_size_bits(&self) -> usize;

    /// Expected proof size for uniformly random queries, sharing Merkle siblings between openings.
    fn expected_proof_size_bits(&self) -> usize;

    /// Rate `rho` of the (initial) Reed-Solomon code.
    fn rate(&self) -> f64;

    /// Dimension of the (initial) code, i.e. the committed trace length.
    fn dimension(&self) -> usize;

    /// Height of the trace the arithmetization constrains. Equal to [Self::dimension] unless the
    /// scheme commits to a reshaped trace.
    fn trace_height(&self) -> usize {
        self.dimension()
    }

    /// Optional override of the distance to the decoding radius configured on the scheme itself.
    fn gap_to_radius(&self) -> Option<f64> {
        None
    }

    /// Human readable parameter listing, as a fenced block.
    fn parameter_summary(&self) -> String;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pcs {
    Fri(Fri),
    Jagged(JaggedPcs),
    Whir(Whir),
}

impl Pcs {
    pub fn from_config(config: PcsConfig) -> Result<Self> {
        Ok(match config {
            PcsConfig::Fri(config) => Pcs::Fri(Fri::new(config)?),
            PcsConfig::Jagged(config) => Pcs::Jagged(JaggedPcs::new(config)?),
            PcsConfig::Whir(config) => Pcs::Whir(Whir::new(config)?),
        })
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            Pcs::Fri(_) => "FRI",
            Pcs::Jagged(_) => "Jagged",
            Pcs::Whir(_) => "WHIR",
        }
    }
}

impl PolynomialCommitmentScheme for Pcs {
    fn security_levels(&self, regime: &ProximityGapsRegime) -> Result<SecurityTable> {
        match self {
            Pcs::Fri(pcs) => pcs.security_levels(regime),
            Pcs::Jagged(pcs) => pcs.security_levels(regime),
            Pcs::Whir(pcs) => pcs.security_levels(regime),
        }
    }

    fn proof_size_bits(&self) -> usize {
        match self {
            Pcs::Fri(pcs) => pcs.proof_size_bits(),
            Pcs::Jagged(pcs) => pcs.proof_size_bits(),
            Pcs::Whir(pcs) => pcs.proof_size_bits(),
        }
    }

    fn expected_proof_size_bits(&self) -> usize {
        match self {
            Pcs::Fri(pcs) => pcs.expected_proof_size_bits(),
            Pcs::Jagged(pcs) => pcs.expected_proof_size_bits(),
            Pcs::Whir(pcs) => pcs.expected_proof_size_bits(),
        }
    }

    fn rate(&self) -> f64 {
        match self {
            Pcs::Fri(pcs) => pcs.rate(),
            Pcs::Jagged(pcs) => pcs.rate(),
            Pcs::Whir(pcs) => pcs.rate(),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Pcs::Fri(pcs) => pcs.dimension(),
            Pcs::Jagged(pcs) => pcs.dimension(),
            Pcs::Whir(pcs) => pcs.dimension(),
        }
    }

    fn trace_height(&self) -> usize {
        match self {
            Pcs::Fri(pcs) => pcs.trace_height(),
            Pcs::Jagged(pcs) => pcs.trace_height(),
            Pcs::Whir(pcs) => pcs.trace_height(),
        }
    }

    fn gap_to_radius(&self) -> Option<f64> {
        match self {
            Pcs::Fri(pcs) => pcs.gap_to_radius(),
            Pcs::Jagged(pcs) => pcs.gap_to_radius(),
            Pcs::Whir(pcs) => pcs.gap_to_radius(),
        }
    }

    fn parameter_summary(&self) -> String {
        match self {
            Pcs::Fri(pcs) => pcs.parameter_summary(),
            Pcs::Jagged(pcs) => pcs.parameter_summary(),
            Pcs::Whir(pcs) => pcs.parameter_summary(),
        }
    }
}

impl From<Fri> for Pcs {
    fn from(pcs: Fri) -> Self {
        Pcs::Fri(pcs)
    }
}

impl From<JaggedPcs> for Pcs {
    fn from(pcs: JaggedPcs) -> Self {
        Pcs::Jagged(pcs)
    }
}

impl From<Whir> for Pcs {
    fn from(pcs: Whir) -> Self {
        Pcs::Whir(pcs)
    }
}

/// Configuration of any supported PCS, tagged by `protocol`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum PcsConfig {
    Fri(FriConfig),
    Jagged(JaggedConfig),
    Whir(WhirConfig),
}

/// Renders `key : value` lines with aligned keys inside a fenced block.
pub(crate) fn format_parameters(params: &[(&str, String)]) -> String {
    let width = params.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut lines = vec![String::new(), "```".to_string()];
    lines.extend(
        params
            .iter()
            .map(|(key, value)| format!("  {key:<width$} : {value}")),
    );
    lines.push("```".to_string());
    lines.join("\n")
}
