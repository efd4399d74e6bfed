//! Field parameters consumed by the error formulas.
//!
//! Only the size of the (extension) field matters to the calculator. The prime orders are taken
//! from the Plonky3 field crates so presets cannot drift from the fields that provers actually
//! use.

use std::{fmt, str::FromStr};

use p3_baby_bear::BabyBear;
use p3_field::PrimeField64;
use p3_goldilocks::Goldilocks;
use p3_koala_bear::KoalaBear;
use p3_mersenne_31::Mersenne31;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Result, SoundnessError};

/// Largest extension degree accepted by [parse_field].
pub const MAX_EXTENSION_DEGREE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum BaseField {
    BabyBear,
    KoalaBear,
    Goldilocks,
    Mersenne31,
}

impl BaseField {
    pub fn order(&self) -> u64 {
        match self {
            BaseField::BabyBear => BabyBear::ORDER_U64,
            BaseField::KoalaBear => KoalaBear::ORDER_U64,
            BaseField::Goldilocks => Goldilocks::ORDER_U64,
            BaseField::Mersenne31 => Mersenne31::ORDER_U64,
        }
    }

    /// Number of bits needed to encode one element, i.e. `ceil(log2(p))`.
    pub fn element_size_bits(&self) -> usize {
        (u64::BITS - (self.order() - 1).leading_zeros()) as usize
    }
}

/// An extension field `F = F_p^k`, described only by its base prime and degree.
///
/// `|F|` can be far beyond `u64`; it is exposed as `f64` (exact up to rounding, never
/// overflowing for the supported degrees) and as `log2(|F|)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldParams {
    base: BaseField,
    extension_degree: usize,
}

pub const BABYBEAR_4: FieldParams = FieldParams::new(BaseField::BabyBear, 4);
pub const BABYBEAR_5: FieldParams = FieldParams::new(BaseField::BabyBear, 5);
pub const KOALABEAR_4: FieldParams = FieldParams::new(BaseField::KoalaBear, 4);
pub const GOLDILOCKS_2: FieldParams = FieldParams::new(BaseField::Goldilocks, 2);
pub const GOLDILOCKS_3: FieldParams = FieldParams::new(BaseField::Goldilocks, 3);
pub const MERSENNE31_4: FieldParams = FieldParams::new(BaseField::Mersenne31, 4);

impl FieldParams {
    pub const fn new(base: BaseField, extension_degree: usize) -> Self {
        Self {
            base,
            extension_degree,
        }
    }

    pub fn base(&self) -> BaseField {
        self.base
    }

    pub fn extension_degree(&self) -> usize {
        self.extension_degree
    }

    /// `|F| = p^k` as a float.
    pub fn size(&self) -> f64 {
        (self.base.order() as f64).powi(self.extension_degree as i32)
    }

    pub fn log2_size(&self) -> f64 {
        self.extension_degree as f64 * (self.base.order() as f64).log2()
    }

    pub fn base_field_element_size_bits(&self) -> usize {
        self.base.element_size_bits()
    }

    pub fn extension_field_element_size_bits(&self) -> usize {
        self.extension_degree * self.base.element_size_bits()
    }
}

impl fmt::Display for FieldParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}^{}", self.base, self.extension_degree)
    }
}

impl From<FieldParams> for String {
    fn from(field: FieldParams) -> Self {
        field.to_string()
    }
}

impl TryFrom<String> for FieldParams {
    type Error = SoundnessError;

    fn try_from(value: String) -> Result<Self> {
        parse_field(&value)
    }
}

impl FromStr for FieldParams {
    type Err = SoundnessError;

    fn from_str(s: &str) -> Result<Self> {
        parse_field(s)
    }
}

/// Parses `Name^k` (or just `Name` for the base field), e.g. `BabyBear^4` or `goldilocks^3`.
/// A `_` separator (`GOLDILOCKS_3`) is accepted as well, matching the preset constant names.
pub fn parse_field(s: &str) -> Result<FieldParams> {
    let unknown = || SoundnessError::UnknownField(s.to_string());
    let trimmed = s.trim();
    let (name, degree) = match trimmed.split_once(['^', '_']) {
        Some((name, degree)) => (name, degree.trim().parse::<usize>().map_err(|_| unknown())?),
        None => (trimmed, 1),
    };
    let base = BaseField::from_str(name.trim()).map_err(|_| unknown())?;
    if degree == 0 || degree > MAX_EXTENSION_DEGREE {
        return Err(unknown());
    }
    Ok(FieldParams::new(base, degree))
}
