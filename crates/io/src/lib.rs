//! `digitlaw-io` — tabular input parsing.
//!
//! Turns raw uploaded bytes into an engine [`Table`]: spreadsheet formats
//! go through calamine, everything else is treated as delimited text with
//! a sniffed delimiter.

pub mod delimited;
pub mod error;
pub mod sheet;

pub use error::ParseError;

use digitlaw_engine::Table;

/// Extensions routed to the spreadsheet path.
const SHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Parse raw file bytes into a table, using the filename hint to pick the
/// format. Either a complete table comes back or a [`ParseError`]; there
/// are no partial results.
pub fn parse(bytes: &[u8], filename: &str) -> Result<Table, ParseError> {
    if is_spreadsheet(filename) {
        sheet::parse(bytes)
    } else {
        delimited::parse(bytes)
    }
}

fn is_spreadsheet(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => SHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
