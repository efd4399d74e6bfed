//! Soundness of lookup arguments.

mod gkr;
mod logup;

pub use gkr::epsilon_gkr;
pub use logup::*;
