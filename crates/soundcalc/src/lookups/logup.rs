use p3_util::log2_ceil_usize;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::debug;

use super::epsilon_gkr;
use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
    utils::{bits_of_security, with_grinding},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogUpKind {
    /// Rational sums checked with univariate polynomials over the trace domain.
    Univariate,
    /// Rational sums checked with a GKR fractional sumcheck over the hypercube.
    Multivariate,
}

/// A LogUp lookup of a small table `L` into a big table `T`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogUpConfig {
    pub name: String,
    pub field: FieldParams,
    pub kind: LogUpKind,
    /// Rows of the big table `T`.
    pub rows_t: usize,
    /// Rows of the looked-up table `L`.
    pub rows_l: usize,
    /// Number of columns `S` of both tables.
    #[serde(default = "one")]
    pub num_columns: usize,
    /// Number of lookups `M` performed on `T`.
    #[serde(default = "one")]
    pub num_lookups: usize,
    /// Overrides the alphabet size of the multivariate argument, e.g. with a padded height.
    #[serde(default)]
    pub alphabet_size: Option<usize>,
    /// Columns are compressed with a multilinear fingerprint using `log2(S)` challenges.
    #[serde(default)]
    pub multilinear_fingerprint: bool,
    #[serde(default)]
    pub grinding_bits: usize,
    /// Error of reducing the lookup claims to the committed polynomials, multivariate only.
    #[serde(default)]
    pub reduction_error: f64,
}

fn one() -> usize {
    1
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogUp {
    config: LogUpConfig,
    alphabet_size: usize,
}

impl LogUp {
    pub fn new(config: LogUpConfig) -> Result<Self> {
        if config.num_lookups == 0 {
            return Err(SoundnessError::NonPositiveLookupCount(0));
        }
        if config.num_columns == 0 {
            return Err(SoundnessError::invalid("LogUp", "num_columns", 0, "must be positive"));
        }
        if !(0.0..1.0).contains(&config.reduction_error) {
            return Err(SoundnessError::invalid(
                "LogUp",
                "reduction_error",
                config.reduction_error,
                "must be in [0, 1)",
            ));
        }
        let alphabet_size = match config.alphabet_size {
            Some(alphabet_size) => alphabet_size,
            None => {
                let symbols = if config.multilinear_fingerprint {
                    log2_ceil_usize(config.num_columns).max(1)
                } else {
                    config.num_columns
                };
                config
                    .rows_l
                    .checked_add(config.rows_t)
                    .and_then(|rows| rows.checked_mul(symbols))
                    .ok_or_else(|| {
                        SoundnessError::invalid(
                            "LogUp",
                            "rows_t",
                            config.rows_t,
                            "alphabet size (L + T) * S overflows usize",
                        )
                    })?
            }
        };
        if config.kind == LogUpKind::Multivariate && alphabet_size == 0 {
            return Err(SoundnessError::NonPositiveAlphabetSize(0));
        }
        Ok(Self {
            config,
            alphabet_size,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &LogUpConfig {
        &self.config
    }

    /// `(L + T)` times the number of symbols a row is compressed to, unless overridden.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Aggregated over `M` lookups: `M (L + T) S / |F|`.
    fn univariate_error(&self) -> f64 {
        let c = &self.config;
        let rows = c.rows_l as f64 + c.rows_t as f64;
        c.num_lookups as f64 * rows * c.num_columns as f64 / c.field.size()
    }

    fn multivariate_error(&self) -> Result<f64> {
        let c = &self.config;
        let error =
            c.num_lookups as f64 * self.alphabet_size as f64 / c.field.size() + c.reduction_error;
        Ok(error + epsilon_gkr(&c.field, self.alphabet_size, c.num_lookups)?)
    }

    pub fn soundness_error(&self) -> Result<f64> {
        let error = match self.config.kind {
            LogUpKind::Univariate => self.univariate_error(),
            LogUpKind::Multivariate => self.multivariate_error()?,
        };
        Ok(with_grinding(error, self.config.grinding_bits))
    }

    pub fn soundness_bits(&self) -> Result<u32> {
        let bits = bits_of_security(self.soundness_error()?)?;
        debug!(lookup = %self.config.name, kind = %self.config.kind, bits);
        Ok(bits)
    }
}
