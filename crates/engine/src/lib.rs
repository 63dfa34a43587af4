//! `digitlaw-engine` — Benford first-digit validation engine.
//!
//! Pure engine crate: receives parsed column values, returns scored
//! distributions. No CLI, filesystem, or database dependencies.

pub mod conformity;
pub mod digits;
pub mod error;
pub mod model;
pub mod table;

pub use conformity::{score, Conformity, Score};
pub use digits::{analyze, leading_digit, EXPECTED};
pub use error::EngineError;
pub use model::{validate_column, ConformityResult, DigitBin, DigitDistribution};
pub use table::{Column, Table, Value};
