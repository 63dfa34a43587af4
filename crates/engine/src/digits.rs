// First-digit extraction and distribution tallying

use crate::error::EngineError;
use crate::model::DigitDistribution;
use crate::table::Value;

/// Expected Benford frequencies for leading digits 1-9: log10(1 + 1/d).
pub const EXPECTED: [f64; 9] = [
    0.30103, 0.17609, 0.12494, 0.09691, 0.07918, 0.06695, 0.05799, 0.05115, 0.04576,
];

/// Leading decimal digit (1-9) of a value's magnitude.
///
/// Sign is irrelevant. Zero has no leading digit under the law; NaN and
/// infinities carry no digit information either.
pub fn leading_digit(value: f64) -> Option<u8> {
    let mut magnitude = value.abs();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return None;
    }
    while magnitude < 1.0 {
        magnitude *= 10.0;
    }
    while magnitude >= 10.0 {
        magnitude /= 10.0;
    }
    Some(magnitude as u8)
}

/// Compute the observed first-digit distribution of one column.
///
/// Nulls, text, and zero values are discarded; the remaining magnitudes
/// are tallied by leading digit and divided by the valid count. The
/// expected side of each bin is the fixed Benford constant, never
/// renormalized against the observed data.
pub fn analyze(values: &[Value]) -> Result<DigitDistribution, EngineError> {
    let mut tallies = [0u64; 9];
    let mut valid = 0u64;

    for value in values {
        let Some(n) = value.as_number() else { continue };
        let Some(digit) = leading_digit(n) else { continue };
        tallies[(digit - 1) as usize] += 1;
        valid += 1;
    }

    if valid == 0 {
        return Err(EngineError::InsufficientData);
    }

    Ok(DigitDistribution::from_tallies(&tallies, valid))
}
