// MAD scoring and conformity banding

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::DigitDistribution;

/// Decimal places used when reporting a MAD score for display.
/// Banding always uses the unrounded value.
pub const MAD_DISPLAY_DECIMALS: i32 = 1;

/// Qualitative conformity band derived from a MAD score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conformity {
    Close,
    Acceptable,
    Marginal,
    NonConformity,
}

impl Conformity {
    /// Band for an unrounded MAD score.
    ///
    /// The published boundary table shares its endpoints between adjacent
    /// bands; a score sitting exactly on a shared boundary belongs to the
    /// lower band (0.006 is "close", not "acceptable").
    pub fn from_mad(mad: f64) -> Conformity {
        if mad <= 0.006 {
            Conformity::Close
        } else if mad <= 0.012 {
            Conformity::Acceptable
        } else if mad <= 0.015 {
            Conformity::Marginal
        } else {
            Conformity::NonConformity
        }
    }
}

impl fmt::Display for Conformity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Conformity::Close => "close conformity",
            Conformity::Acceptable => "acceptable conformity",
            Conformity::Marginal => "marginal conformity",
            Conformity::NonConformity => "non-conformity",
        };
        f.write_str(label)
    }
}

/// A scored distribution: the MAD value plus its band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub mad: f64,
    pub conformity: Conformity,
}

impl Score {
    /// MAD rounded for display. The unrounded value decides the band.
    pub fn display_mad(&self) -> f64 {
        round_for_display(self.mad)
    }
}

pub fn round_for_display(mad: f64) -> f64 {
    let factor = 10f64.powi(MAD_DISPLAY_DECIMALS);
    (mad * factor).round() / factor
}

/// Score a distribution: mean absolute deviation between observed and
/// expected frequencies over digits 1-9, plus the conformity band.
pub fn score(distribution: &DigitDistribution) -> Result<Score, EngineError> {
    validate(distribution)?;

    let total: f64 = distribution
        .bins
        .iter()
        .map(|bin| (bin.observed - bin.expected).abs())
        .sum();
    let mad = total / 9.0;

    Ok(Score {
        mad,
        conformity: Conformity::from_mad(mad),
    })
}

/// The analyzer never produces a malformed distribution, but the scorer
/// is also reachable with distributions rebuilt from storage.
fn validate(distribution: &DigitDistribution) -> Result<(), EngineError> {
    if distribution.bins.len() != 9 {
        return Err(EngineError::InvalidDistribution(format!(
            "expected 9 digit bins, found {}",
            distribution.bins.len()
        )));
    }
    for (i, bin) in distribution.bins.iter().enumerate() {
        if bin.digit as usize != i + 1 {
            return Err(EngineError::InvalidDistribution(format!(
                "bin {} carries digit {}, expected {}",
                i,
                bin.digit,
                i + 1
            )));
        }
        if !(0.0..=1.0).contains(&bin.observed) || !(0.0..=1.0).contains(&bin.expected) {
            return Err(EngineError::InvalidDistribution(format!(
                "digit {}: frequency outside [0, 1]",
                bin.digit
            )));
        }
    }
    Ok(())
}
