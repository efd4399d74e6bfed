//! Everything around the soundness calculator that is not a formula: loading zkVM descriptions
//! from TOML, the bundled presets, console and markdown reports, and tracing setup.

pub use soundcalc;

pub mod config;
pub mod presets;
pub mod report;
pub mod utils;
