use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No usable numeric values in the selected column.
    InsufficientData,
    /// Malformed distribution passed to the scorer.
    InvalidDistribution(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => {
                write!(f, "no usable numeric values in the selected column")
            }
            Self::InvalidDistribution(msg) => write!(f, "invalid distribution: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
