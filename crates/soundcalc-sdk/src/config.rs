//! TOML description of a zkVM.
//!
//! ```toml
//! [zkvm]
//! name = "RISC0"
//!
//! [[circuits]]
//! name = "main"
//! num_constraints = 279
//! air_max_degree = 4
//! max_combo = 9
//!
//! [circuits.pcs]
//! protocol = "fri"
//! field = "BabyBear^4"
//! # ...
//!
//! [[circuits.lookups]]
//! name = "range check"
//! kind = "multivariate"
//! # ...
//! ```
//!
//! A circuit's `field` defaults to the field of its PCS, and a lookup's `field` defaults to the
//! field of its circuit.

use std::{fs, path::Path};

use eyre::{bail, Result, WrapErr};
use serde::Deserialize;
use soundcalc::{
    lookups::{LogUp, LogUpConfig},
    pcs::{Pcs, PcsConfig},
    proxgaps::CapacityBoundParams,
    Arithmetization, Circuit, CircuitConfig, DeepAliParams, FieldParams, SoundnessError,
    ZerocheckParams, ZkVm,
};
use tracing::debug;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZkVmToml {
    pub zkvm: ZkVmHeader,
    pub circuits: Vec<CircuitToml>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZkVmHeader {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitToml {
    pub name: String,
    #[serde(default)]
    pub field: Option<FieldParams>,
    pub pcs: PcsConfig,
    #[serde(default)]
    pub gap_to_radius: Option<f64>,
    // DEEP-ALI: either all of `num_constraints`, `air_max_degree`, `max_combo` or none of them.
    // The zerocheck only reads the first two.
    #[serde(default)]
    pub num_constraints: Option<usize>,
    #[serde(default)]
    pub air_max_degree: Option<usize>,
    #[serde(default)]
    pub max_combo: Option<usize>,
    #[serde(default)]
    pub grinding_deep: Option<usize>,
    #[serde(default)]
    pub multilinear_zerocheck: bool,
    #[serde(default)]
    pub udr_only: bool,
    #[serde(default)]
    pub capacity_bound: Option<CapacityBoundParams>,
    /// Raw tables so that a missing `field` can be filled in from the circuit.
    #[serde(default)]
    pub lookups: Vec<toml::Table>,
}

impl ZkVmToml {
    pub fn build(self) -> Result<ZkVm> {
        let name = self.zkvm.name;
        let circuits = self
            .circuits
            .into_iter()
            .map(CircuitToml::build)
            .collect::<Result<Vec<_>>>()
            .wrap_err_with(|| format!("zkVM `{name}`"))?;
        debug!(zkvm = %name, num_circuits = circuits.len(), "loaded zkVM");
        ZkVm::new(name.clone(), circuits).wrap_err_with(|| format!("zkVM `{name}`"))
    }
}

impl CircuitToml {
    pub fn build(self) -> Result<Circuit> {
        let name = self.name.clone();
        self.build_circuit()
            .wrap_err_with(|| format!("circuit `{name}`"))
    }

    fn build_circuit(self) -> Result<Circuit> {
        let arithmetization = self.arithmetization()?;
        let field = self.field.unwrap_or_else(|| pcs_field(&self.pcs));
        let lookups = self
            .lookups
            .into_iter()
            .enumerate()
            .map(|(i, table)| build_lookup(table, field).wrap_err_with(|| format!("lookup #{i}")))
            .collect::<Result<Vec<_>>>()?;
        let circuit = Circuit::new(CircuitConfig {
            name: self.name,
            pcs: Pcs::from_config(self.pcs)?,
            field,
            gap_to_radius: self.gap_to_radius,
            arithmetization,
            lookups,
            udr_only: self.udr_only,
            capacity_bound: self.capacity_bound,
        })?;
        Ok(circuit)
    }

    fn arithmetization(&self) -> Result<Arithmetization> {
        if self.multilinear_zerocheck {
            if !self.udr_only {
                return Err(SoundnessError::ZerocheckRequiresUniqueDecoding {
                    circuit: self.name.clone(),
                }
                .into());
            }
            let (Some(num_constraints), Some(air_max_degree)) =
                (self.num_constraints, self.air_max_degree)
            else {
                bail!("multilinear zerocheck needs `num_constraints` and `air_max_degree`");
            };
            if self.max_combo.is_some() || self.grinding_deep.is_some() {
                bail!("`max_combo` and `grinding_deep` only apply to DEEP-ALI");
            }
            return Ok(Arithmetization::Zerocheck(ZerocheckParams {
                num_constraints,
                air_max_degree,
            }));
        }

        match (self.num_constraints, self.air_max_degree, self.max_combo) {
            (Some(num_constraints), Some(air_max_degree), Some(max_combo)) => {
                Ok(Arithmetization::DeepAli(DeepAliParams {
                    num_constraints,
                    air_max_degree,
                    max_combo,
                    grinding_deep: self.grinding_deep.unwrap_or(0),
                }))
            }
            (None, None, None) if self.grinding_deep.is_none() => Ok(Arithmetization::None),
            _ => bail!(
                "DEEP-ALI parameters are incomplete: `num_constraints`, `air_max_degree` and \
                 `max_combo` must be given together"
            ),
        }
    }
}

fn pcs_field(pcs: &PcsConfig) -> FieldParams {
    match pcs {
        PcsConfig::Fri(config) => config.field,
        PcsConfig::Jagged(config) => config.dense_pcs.field,
        PcsConfig::Whir(config) => config.field,
    }
}

fn build_lookup(mut table: toml::Table, field: FieldParams) -> Result<LogUp> {
    table
        .entry("field")
        .or_insert_with(|| toml::Value::String(field.to_string()));
    let config: LogUpConfig = toml::Value::Table(table).try_into()?;
    Ok(LogUp::new(config)?)
}

pub fn zkvm_from_toml_str(toml_str: &str) -> Result<ZkVm> {
    let parsed: ZkVmToml = toml::from_str(toml_str)?;
    parsed.build()
}

pub fn zkvm_from_file(path: impl AsRef<Path>) -> Result<ZkVm> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    zkvm_from_toml_str(&contents).wrap_err_with(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use soundcalc::{field::KOALABEAR_4, RegimeId};

    use super::*;

    const FRI_PCS: &str = r#"
[circuits.pcs]
protocol = "fri"
hash_size_bits = 256
rho = 0.5
trace_length = 1024
field = "Goldilocks^3"
batch_size = 8
power_batching = true
num_queries = 64
folding_factors = [4, 4, 4]
early_stop_degree = 32
grinding_query_phase = 0
"#;

    fn with_circuit(circuit: &str) -> String {
        format!("[zkvm]\nname = \"test\"\n\n[[circuits]]\nname = \"main\"\n{circuit}\n{FRI_PCS}")
    }

    #[test]
    fn field_defaults_to_pcs_field() {
        let zkvm = zkvm_from_toml_str(&with_circuit("")).unwrap();
        let circuit = &zkvm.circuits()[0];
        assert_eq!(circuit.field().to_string(), "Goldilocks^3");
        assert_eq!(circuit.arithmetization(), Arithmetization::None);
    }

    #[test]
    fn deep_ali_fields() {
        let zkvm = zkvm_from_toml_str(&with_circuit(
            "num_constraints = 100\nair_max_degree = 3\nmax_combo = 3\ngrinding_deep = 4",
        ))
        .unwrap();
        assert_eq!(
            zkvm.circuits()[0].arithmetization(),
            Arithmetization::DeepAli(DeepAliParams {
                num_constraints: 100,
                air_max_degree: 3,
                max_combo: 3,
                grinding_deep: 4,
            })
        );
    }

    #[test]
    fn partial_deep_ali_is_rejected() {
        let err = zkvm_from_toml_str(&with_circuit("num_constraints = 100\nmax_combo = 3"))
            .unwrap_err();
        assert!(format!("{err:?}").contains("circuit `main`"));
        assert!(zkvm_from_toml_str(&with_circuit("grinding_deep = 3")).is_err());
    }

    #[test]
    fn zerocheck_requires_udr_only() {
        let err = zkvm_from_toml_str(&with_circuit(
            "num_constraints = 100\nair_max_degree = 3\nmultilinear_zerocheck = true",
        ))
        .unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<SoundnessError>(),
            Some(SoundnessError::ZerocheckRequiresUniqueDecoding { .. })
        ));

        let zkvm = zkvm_from_toml_str(&with_circuit(
            "num_constraints = 100\nair_max_degree = 3\nmultilinear_zerocheck = true\nudr_only = true",
        ))
        .unwrap();
        let levels = zkvm.circuits()[0].security_levels();
        assert_eq!(levels.keys().copied().collect::<Vec<_>>(), [RegimeId::UniqueDecoding]);
        assert!(levels[&RegimeId::UniqueDecoding].is_ok());
    }

    #[test]
    fn capacity_bound_table() {
        let zkvm = zkvm_from_toml_str(&with_circuit("[circuits.capacity_bound]\neta = 0.1")).unwrap();
        let levels = zkvm.circuits()[0].security_levels();
        assert!(levels.values().all(|table| table.is_ok()));
        assert!(levels.contains_key(&RegimeId::CapacityBound));
    }

    #[test]
    fn lookup_field_defaults_to_circuit_field() {
        let toml_str = format!(
            "{}\n[[circuits.lookups]]\nname = \"bytes\"\nkind = \"univariate\"\nrows_t = 256\nrows_l = 1024\n\n[[circuits.lookups]]\nname = \"memory\"\nfield = \"KoalaBear^4\"\nkind = \"multivariate\"\nrows_t = 1024\nrows_l = 1024\n",
            with_circuit("")
        );
        let zkvm = zkvm_from_toml_str(&toml_str).unwrap();
        let lookups = zkvm.circuits()[0].lookups();
        assert_eq!(lookups[0].config().field.to_string(), "Goldilocks^3");
        assert_eq!(lookups[1].config().field, KOALABEAR_4);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(zkvm_from_toml_str(&with_circuit("num_constraint = 100")).is_err());
    }
}
