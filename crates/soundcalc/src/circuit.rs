//! A circuit combines a PCS with the arithmetization checked on top of it.
//!
//! For every proximity gaps regime the circuit collects the PCS security levels, the errors of
//! its arithmetization (DEEP-ALI or a multilinear zerocheck), and one entry per lookup argument
//! into one sealed [SecurityTable].

use std::collections::BTreeMap;

use getset::{CopyGetters, Getters};
use p3_util::log2_ceil_usize;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    lookups::LogUp,
    pcs::{Pcs, PolynomialCommitmentScheme},
    proxgaps::{
        CapacityBoundParams, CapacityBoundRegime, JohnsonBoundRegime, ProximityGap,
        ProximityGapsRegime, UniqueDecodingRegime,
    },
    security::{RegimeId, SecurityTable},
    utils::{bits_of_security, with_grinding},
};

/// Security levels of one circuit per regime. A regime whose analysis fails keeps its error
/// without affecting the other regimes.
pub type CircuitSecurityLevels = BTreeMap<RegimeId, Result<SecurityTable>>;

/// Parameters of the DEEP-ALI argument, see Section 3.4 of the RISC Zero technical report and
/// `winterfell`'s `air/src/proof/security.rs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepAliParams {
    /// Number of constraints combined by the ALI challenge.
    pub num_constraints: usize,
    pub air_max_degree: usize,
    /// Maximum number of entries of a single column referenced by a single constraint, i.e. the
    /// number of DEEP opening points per column.
    pub max_combo: usize,
    /// Proof-of-work bits before sampling the DEEP point.
    #[serde(default)]
    pub grinding_deep: usize,
}

/// Parameters of a multilinear zerocheck over the trace hypercube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZerocheckParams {
    pub num_constraints: usize,
    pub air_max_degree: usize,
}

/// How the AIR constraints are reduced to PCS openings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Arithmetization {
    /// Only the PCS is analysed.
    #[default]
    None,
    DeepAli(DeepAliParams),
    /// Only defined under unique decoding; a circuit using it is analysed in UDR alone.
    Zerocheck(ZerocheckParams),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircuitConfig {
    pub name: String,
    pub pcs: Pcs,
    pub field: FieldParams,
    /// Distance from the decoding radius for list decoding regimes. Takes precedence over the
    /// PCS's own setting.
    pub gap_to_radius: Option<f64>,
    pub arithmetization: Arithmetization,
    pub lookups: Vec<LogUp>,
    /// Only analyse the circuit in the unique decoding regime.
    pub udr_only: bool,
    /// Also analyse the circuit in the (conjectured) capacity bound regime.
    pub capacity_bound: Option<CapacityBoundParams>,
}

#[derive(Clone, Debug, PartialEq, Getters, CopyGetters)]
pub struct Circuit {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    pcs: Pcs,
    #[getset(get_copy = "pub")]
    field: FieldParams,
    #[getset(get_copy = "pub")]
    arithmetization: Arithmetization,
    #[getset(get = "pub")]
    lookups: Vec<LogUp>,
    gap_to_radius: Option<f64>,
    udr_only: bool,
    capacity_bound: Option<CapacityBoundParams>,
}

impl Circuit {
    pub fn new(config: CircuitConfig) -> Result<Self> {
        match config.arithmetization {
            Arithmetization::DeepAli(DeepAliParams { air_max_degree, .. })
            | Arithmetization::Zerocheck(ZerocheckParams { air_max_degree, .. })
                if air_max_degree == 0 =>
            {
                return Err(SoundnessError::invalid(
                    "Circuit",
                    "air_max_degree",
                    0,
                    "must be positive",
                ));
            }
            Arithmetization::DeepAli(DeepAliParams { max_combo: 0, .. }) => {
                return Err(SoundnessError::invalid("Circuit", "max_combo", 0, "must be positive"));
            }
            _ => {}
        }
        if let Some(gap) = config.gap_to_radius {
            if !(gap > 0.0 && gap < 1.0) {
                return Err(SoundnessError::invalid(
                    "Circuit",
                    "gap_to_radius",
                    gap,
                    "must be in (0, 1)",
                ));
            }
        }
        Ok(Self {
            name: config.name,
            pcs: config.pcs,
            field: config.field,
            arithmetization: config.arithmetization,
            lookups: config.lookups,
            gap_to_radius: config.gap_to_radius,
            udr_only: config.udr_only,
            capacity_bound: config.capacity_bound,
        })
    }

    /// Whether only the unique decoding regime applies, either by configuration or because the
    /// arithmetization is only analysed there.
    pub fn udr_only(&self) -> bool {
        self.udr_only || matches!(self.arithmetization, Arithmetization::Zerocheck(_))
    }

    /// The gap to the decoding radius in effect: the circuit's override, else the PCS's own.
    pub fn gap_to_radius(&self) -> Option<f64> {
        self.gap_to_radius.or_else(|| self.pcs.gap_to_radius())
    }

    fn max_combo(&self) -> usize {
        match self.arithmetization {
            Arithmetization::DeepAli(params) => params.max_combo,
            _ => 1,
        }
    }

    /// Regimes this circuit is analysed in: always UDR, JBR unless restricted to unique decoding,
    /// and CBR when capacity bound parameters are configured.
    pub fn regimes(&self) -> Vec<ProximityGapsRegime> {
        let mut regimes = vec![UniqueDecodingRegime::new(self.field).into()];
        if self.udr_only() {
            return regimes;
        }
        regimes.push(
            JohnsonBoundRegime::new(self.field)
                .with_gap_to_radius(self.gap_to_radius())
                .with_max_combo(self.max_combo())
                .into(),
        );
        if let Some(params) = self.capacity_bound {
            regimes.push(
                CapacityBoundRegime::new(self.field, params)
                    .with_max_combo(self.max_combo())
                    .into(),
            );
        }
        regimes
    }

    /// Round-by-round security levels for every applicable regime.
    #[instrument(name = "circuit_security_levels", skip_all, fields(circuit = %self.name))]
    pub fn security_levels(&self) -> CircuitSecurityLevels {
        self.regimes()
            .iter()
            .map(|regime| {
                let table = self.security_table(regime);
                if let Err(err) = &table {
                    warn!(regime = %regime.identifier(), %err, "security levels unavailable");
                }
                (regime.identifier(), table)
            })
            .collect()
    }

    fn security_table(&self, regime: &ProximityGapsRegime) -> Result<SecurityTable> {
        let mut table = self.pcs.security_levels(regime)?;
        match self.arithmetization {
            Arithmetization::None => {}
            Arithmetization::DeepAli(params) => {
                table.extend(self.deep_ali_levels(regime, params)?)?
            }
            Arithmetization::Zerocheck(params) => {
                table.insert("zerocheck", bits_of_security(self.zerocheck_error(params))?)?
            }
        }
        for lookup in &self.lookups {
            table.insert(lookup.name(), lookup.soundness_bits()?)?;
        }
        let table = table.seal()?;
        debug!(regime = %regime.identifier(), total = table.total(), "security levels:\n{table}");
        Ok(table)
    }

    /// ALI and DEEP errors for list size `L` of the regime:
    /// `e_ALI = L * num_constraints / |F|` and
    /// `e_DEEP = L * (d (H + max_combo - 1) + (H - 1)) / (|F| - H - D)`.
    fn deep_ali_levels(
        &self,
        regime: &ProximityGapsRegime,
        params: DeepAliParams,
    ) -> Result<SecurityTable> {
        let rate = self.pcs.rate();
        let trace_length = self.pcs.dimension() as f64;
        let domain_size = trace_length / rate;
        let max_combo = params.max_combo as f64;

        // The multi-point quotient needs the opening points to fit within the agreement set.
        let theta = regime.proximity_parameter(rate, trace_length);
        let lhs = trace_length + max_combo;
        let rhs = (1.0 - theta) * domain_size;
        if !(lhs < rhs) {
            return Err(SoundnessError::DeepAliSlackViolated {
                regime: regime.identifier().to_string(),
                lhs,
                rhs,
            });
        }

        let list_size = regime.max_list_size(rate, trace_length)? as f64;
        let field_size = self.field.size();
        let e_ali = list_size * params.num_constraints as f64 / field_size;
        let e_deep = list_size
            * (params.air_max_degree as f64 * (trace_length + max_combo - 1.0)
                + (trace_length - 1.0))
            / (field_size - trace_length - domain_size);

        let mut levels = SecurityTable::new();
        levels.insert("ALI", bits_of_security(e_ali)?)?;
        levels.insert(
            "DEEP",
            bits_of_security(with_grinding(e_deep, params.grinding_deep))?,
        )?;
        Ok(levels)
    }

    /// Batching the constraints plus a sumcheck over `ceil(log2(trace_height))` variables with
    /// round polynomials of degree `d + 2`.
    fn zerocheck_error(&self, params: ZerocheckParams) -> f64 {
        let num_variables = log2_ceil_usize(self.pcs.trace_height());
        (params.num_constraints + (params.air_max_degree + 2) * num_variables) as f64
            / self.field.size()
    }

    pub fn proof_size_bits(&self) -> usize {
        self.pcs.proof_size_bits()
    }

    pub fn expected_proof_size_bits(&self) -> usize {
        self.pcs.expected_proof_size_bits()
    }

    /// The PCS summary extended with the arithmetization and lookup parameters.
    pub fn parameter_summary(&self) -> String {
        let mut extra = match self.arithmetization {
            Arithmetization::None => vec![],
            Arithmetization::DeepAli(p) => vec![
                ("num_constraints", p.num_constraints.to_string()),
                ("AIR_max_degree", p.air_max_degree.to_string()),
                ("max_combo", p.max_combo.to_string()),
                ("grinding_deep", p.grinding_deep.to_string()),
            ],
            Arithmetization::Zerocheck(p) => vec![
                ("multilinear_zerocheck", true.to_string()),
                ("num_constraints", p.num_constraints.to_string()),
                ("AIR_max_degree", p.air_max_degree.to_string()),
            ],
        };
        if !self.lookups.is_empty() {
            let names: Vec<_> = self.lookups.iter().map(LogUp::name).collect();
            extra.push(("lookups", names.join(", ")));
        }

        let summary = self.pcs.parameter_summary();
        if extra.is_empty() {
            return summary;
        }
        let body = summary.trim_end_matches("```");
        let extra = extra
            .iter()
            .map(|(key, value)| format!("  {key:<22} : {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{body}{extra}\n```")
    }
}
