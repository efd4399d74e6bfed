use std::collections::BTreeMap;

use getset::Getters;
use itertools::Itertools;
use tracing::info;

use crate::{
    circuit::{Circuit, CircuitSecurityLevels},
    error::{Result, SoundnessError},
    security::RegimeId,
};

/// The weakest circuit in one regime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeakestCircuit {
    pub circuit: String,
    pub bits: u32,
}

/// A zkVM is an ordered collection of circuits, each proven separately.
#[derive(Clone, Debug, PartialEq, Getters)]
pub struct ZkVm {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    circuits: Vec<Circuit>,
}

impl ZkVm {
    pub fn new(name: impl Into<String>, circuits: Vec<Circuit>) -> Result<Self> {
        let name = name.into();
        if circuits.is_empty() {
            return Err(SoundnessError::invalid(
                "zkVM",
                "circuits",
                0,
                "needs at least one circuit",
            ));
        }
        if let Some(duplicate) = circuits.iter().map(Circuit::name).duplicates().next() {
            return Err(SoundnessError::DuplicateLabel(duplicate.clone()));
        }
        Ok(Self { name, circuits })
    }

    /// Sum of the worst-case proof sizes of all circuits.
    pub fn proof_size_bits(&self) -> usize {
        self.circuits.iter().map(Circuit::proof_size_bits).sum()
    }

    pub fn expected_proof_size_bits(&self) -> usize {
        self.circuits.iter().map(Circuit::expected_proof_size_bits).sum()
    }

    /// Security levels of every circuit, in circuit order.
    pub fn security_levels(&self) -> Vec<(&str, CircuitSecurityLevels)> {
        self.circuits
            .iter()
            .map(|circuit| (circuit.name().as_str(), circuit.security_levels()))
            .collect()
    }

    /// For every regime any circuit is analysed in, the circuit with the lowest total. Ties go to
    /// the earlier circuit. Circuits whose analysis failed in a regime are skipped there.
    pub fn weakest_circuits(&self) -> BTreeMap<RegimeId, WeakestCircuit> {
        let mut weakest: BTreeMap<RegimeId, WeakestCircuit> = BTreeMap::new();
        for (circuit, levels) in self.security_levels() {
            for (regime, table) in levels {
                let Some(bits) = table.ok().and_then(|table| table.total()) else {
                    continue;
                };
                let replace = weakest.get(&regime).is_none_or(|w| bits < w.bits);
                if replace {
                    weakest.insert(
                        regime,
                        WeakestCircuit {
                            circuit: circuit.to_string(),
                            bits,
                        },
                    );
                }
            }
        }
        for (regime, w) in &weakest {
            info!(
                zkvm = %self.name,
                %regime,
                circuit = %w.circuit,
                bits = w.bits,
                "weakest circuit"
            );
        }
        weakest
    }

    /// Parameter summaries of all circuits, one section per circuit.
    pub fn parameter_summary(&self) -> String {
        self.circuits
            .iter()
            .map(|circuit| {
                format!(
                    "{} ({}):{}",
                    circuit.name(),
                    circuit.pcs().protocol(),
                    circuit.parameter_summary()
                )
            })
            .join("\n\n")
    }
}
