use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conformity::{round_for_display, score, Conformity};
use crate::digits::{analyze, EXPECTED};
use crate::error::EngineError;
use crate::table::Value;

/// Observed vs expected frequency for a single leading digit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitBin {
    pub digit: u8,
    pub observed: f64,
    pub expected: f64,
}

/// First-digit distribution of one analyzed column, digits 1-9 in order.
///
/// Immutable once computed; the observed side sums to 1 over the column's
/// valid values, the expected side is always the fixed Benford constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitDistribution {
    pub bins: Vec<DigitBin>,
}

impl DigitDistribution {
    pub fn from_tallies(tallies: &[u64; 9], total: u64) -> DigitDistribution {
        let bins = tallies
            .iter()
            .enumerate()
            .map(|(i, &tally)| DigitBin {
                digit: (i + 1) as u8,
                observed: tally as f64 / total as f64,
                expected: EXPECTED[i],
            })
            .collect();
        DigitDistribution { bins }
    }

    /// Rebuild a distribution from stored observed frequencies, pairing
    /// each with the fixed expected constant for its digit.
    pub fn from_observed(observed: &[f64]) -> Result<DigitDistribution, EngineError> {
        if observed.len() != 9 {
            return Err(EngineError::InvalidDistribution(format!(
                "expected 9 observed frequencies, found {}",
                observed.len()
            )));
        }
        let bins = observed
            .iter()
            .enumerate()
            .map(|(i, &freq)| DigitBin {
                digit: (i + 1) as u8,
                observed: freq,
                expected: EXPECTED[i],
            })
            .collect();
        Ok(DigitDistribution { bins })
    }

    /// The 9 observed frequencies in digit order.
    pub fn observed(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.observed).collect()
    }
}

/// A scored validation of one column. Persisted verbatim by the store;
/// a fresh analysis always produces a new record, never an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConformityResult {
    pub source_label: String,
    pub column_label: String,
    pub mad_score: f64,
    pub conformity: Conformity,
    pub distribution: DigitDistribution,
    pub created_at: DateTime<Utc>,
}

impl ConformityResult {
    pub fn new(
        source_label: &str,
        column_label: &str,
        distribution: DigitDistribution,
    ) -> Result<ConformityResult, EngineError> {
        let scored = score(&distribution)?;
        Ok(ConformityResult {
            source_label: source_label.to_string(),
            column_label: column_label.to_string(),
            mad_score: scored.mad,
            conformity: scored.conformity,
            distribution,
            created_at: Utc::now(),
        })
    }

    /// MAD rounded for display; the band is derived from the unrounded value.
    pub fn display_mad(&self) -> f64 {
        round_for_display(self.mad_score)
    }

    /// The one-line verdict shown to the user.
    pub fn verdict(&self) -> String {
        format!(
            "Data from {} exhibits {} with a mean absolute deviation of {}.",
            self.column_label,
            self.conformity,
            self.display_mad()
        )
    }
}

/// Analyze one column and score it: the full validation step between
/// parsing and persistence.
pub fn validate_column(
    source_label: &str,
    column_label: &str,
    values: &[Value],
) -> Result<ConformityResult, EngineError> {
    let distribution = analyze(values)?;
    ConformityResult::new(source_label, column_label, distribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_observed_pairs_fixed_expected() {
        let observed = [0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let dist = DigitDistribution::from_observed(&observed).unwrap();
        assert_eq!(dist.bins.len(), 9);
        assert_eq!(dist.bins[0].digit, 1);
        assert_eq!(dist.bins[0].observed, 0.5);
        assert_eq!(dist.bins[0].expected, EXPECTED[0]);
        assert_eq!(dist.observed(), observed.to_vec());
    }

    #[test]
    fn test_from_observed_wrong_length() {
        assert!(matches!(
            DigitDistribution::from_observed(&[0.1, 0.2]),
            Err(EngineError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_validate_column_builds_scored_result() {
        let values: Vec<Value> = (0..30)
            .map(|i| Value::Number(100.0 + i as f64))
            .collect();
        let result = validate_column("ledger.csv", "amount", &values).unwrap();
        assert_eq!(result.source_label, "ledger.csv");
        assert_eq!(result.column_label, "amount");
        // All 30 values lead with 1: maximally skewed
        assert_eq!(result.distribution.bins[0].observed, 1.0);
        assert_eq!(result.conformity, Conformity::NonConformity);
    }

    #[test]
    fn test_verdict_mentions_column_and_band() {
        let values = vec![Value::Number(123.0), Value::Number(987.0)];
        let result = validate_column("t.csv", "total", &values).unwrap();
        let verdict = result.verdict();
        assert!(verdict.contains("total"), "verdict: {verdict}");
        assert!(verdict.contains("non-conformity"), "verdict: {verdict}");
    }
}
