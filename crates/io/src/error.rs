use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input bytes are not valid UTF-8.
    Encoding,
    /// Input has no header row.
    Empty,
    /// No delimiter candidate produced a consistent multi-field split.
    Delimiter,
    /// A data row's field count disagrees with the header.
    Ragged { row: usize, expected: usize, found: usize },
    /// CSV reader failure (bad quoting and the like).
    Csv(String),
    /// Spreadsheet decode failure.
    Spreadsheet(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "input is not valid UTF-8 text"),
            Self::Empty => write!(f, "input contains no header row"),
            Self::Delimiter => write!(f, "could not determine a field delimiter"),
            Self::Ragged { row, expected, found } => {
                write!(f, "row {row}: {found} field(s) where the header has {expected}")
            }
            Self::Csv(msg) => write!(f, "csv parse error: {msg}"),
            Self::Spreadsheet(msg) => write!(f, "spreadsheet parse error: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}
