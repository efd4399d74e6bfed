use clap::ValueEnum;
use eyre::{Result, WrapErr};
use soundcalc::ZkVm;

use crate::config::zkvm_from_toml_str;

/// zkVM descriptions bundled with the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Risc0,
    Zisk,
    /// Jagged PCS with a multilinear zerocheck.
    Jagged,
    /// Single WHIR circuit. WHIR security levels are not modelled yet.
    DummyWhir,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        Self::value_variants()
    }

    pub fn toml(&self) -> &'static str {
        match self {
            Preset::Risc0 => include_str!("../presets/risc0.toml"),
            Preset::Zisk => include_str!("../presets/zisk.toml"),
            Preset::Jagged => include_str!("../presets/jagged_example.toml"),
            Preset::DummyWhir => include_str!("../presets/dummy_whir.toml"),
        }
    }

    pub fn load(&self) -> Result<ZkVm> {
        zkvm_from_toml_str(self.toml()).wrap_err_with(|| format!("preset {self:?}"))
    }
}

pub fn load_all_presets() -> Result<Vec<ZkVm>> {
    Preset::all().iter().map(Preset::load).collect()
}
