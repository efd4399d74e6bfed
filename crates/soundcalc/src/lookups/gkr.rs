use crate::{
    error::{Result, SoundnessError},
    field::FieldParams,
};

/// Error of the GKR fractional sumcheck underlying multivariate LogUp:
/// `(n + m)(3(n + m) + 1) / (2 |F|)` for an alphabet of size `2^n` and `M = 2^m` lookups.
///
/// The circuit has `n + m` layers. Layer `j` costs `3(j - 1) + 2` over `|F|`: a sumcheck over
/// `j - 1` variables with cubic round polynomials and two linear batching challenges.
pub fn epsilon_gkr(field: &FieldParams, alphabet_size: usize, num_lookups: usize) -> Result<f64> {
    if alphabet_size == 0 {
        return Err(SoundnessError::NonPositiveAlphabetSize(alphabet_size));
    }
    if num_lookups == 0 {
        return Err(SoundnessError::NonPositiveLookupCount(num_lookups));
    }
    let layers = (alphabet_size as f64).log2() + (num_lookups as f64).log2();
    Ok(0.5 * layers * (3.0 * layers + 1.0) / field.size())
}
