use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// No stored result carries the given id.
    NotFound(i64),
    /// Underlying SQLite or serialization failure.
    Storage(String),
    /// A stored record no longer deserializes.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no stored result with id {id}"),
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::Corrupt(msg) => write!(f, "corrupt record: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
