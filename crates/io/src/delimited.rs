// Delimited text import with delimiter sniffing

use digitlaw_engine::{Column, Table, Value};

use crate::error::ParseError;

const CANDIDATES: &[u8] = &[b'\t', b';', b',', b'|'];
const SNIFF_LINES: usize = 10;

/// Parse delimited text: sniff the delimiter, first row as header, every
/// data row typed cell by cell. Ragged rows abort the whole parse.
pub fn parse(bytes: &[u8]) -> Result<Table, ParseError> {
    let content = std::str::from_utf8(bytes).map_err(|_| ParseError::Encoding)?;
    let delimiter = sniff_delimiter(content).ok_or(ParseError::Delimiter)?;
    parse_with_delimiter(content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// A candidate must split the header line into more than one field; the one
/// producing the most consistent field count wins, with higher field count
/// breaking ties. None viable means the input has no recognizable
/// structure.
pub fn sniff_delimiter(content: &str) -> Option<u8> {
    let sample_lines: Vec<&str> = content.lines().take(SNIFF_LINES).collect();
    if sample_lines.is_empty() {
        return None;
    }

    let mut best = None;
    let mut best_score = 0u64;

    for &delim in CANDIDATES {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| field_count(line, delim))
            .collect();

        // Must produce >1 field on the header line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = Some(delim);
        }
    }

    best
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map(|r| r.len())
        .unwrap_or(1)
}

fn parse_with_delimiter(content: &str, delimiter: u8) -> Result<Table, ParseError> {
    // Non-flexible reader: the csv crate rejects any record whose field
    // count differs from the first (header) record.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(false)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(map_csv_error)?,
        None => return Err(ParseError::Empty),
    };

    let mut columns: Vec<Column> = header.iter().map(Column::new).collect();

    for result in records {
        let record = result.map_err(map_csv_error)?;
        for (col_idx, field) in record.iter().enumerate() {
            columns[col_idx].values.push(Value::parse(field));
        }
    }

    Ok(Table::new(columns))
}

fn map_csv_error(e: csv::Error) -> ParseError {
    match e.kind() {
        csv::ErrorKind::UnequalLengths { pos, expected_len, len } => ParseError::Ragged {
            row: pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => ParseError::Csv(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_comma_delimiter() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3\n"), Some(b','));
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3\n"), Some(b'\t'));
    }

    #[test]
    fn test_sniff_semicolon_delimiter() {
        assert_eq!(sniff_delimiter("Name;Age;City\nAlice;30;Paris\n"), Some(b';'));
    }

    #[test]
    fn test_sniff_pipe_delimiter() {
        assert_eq!(sniff_delimiter("Name|Age|City\nAlice|30|Paris\n"), Some(b'|'));
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        // Semicolon delimiter but commas appear inside quoted fields
        let content = "Name;Address\n\"Doe, Jane\";\"123 Main St, Apt 4\"\n";
        assert_eq!(sniff_delimiter(content), Some(b';'));
    }

    #[test]
    fn test_sniff_no_candidate() {
        assert_eq!(sniff_delimiter("justoneword\nanother\n"), None);
        assert_eq!(sniff_delimiter(""), None);
    }

    #[test]
    fn test_parse_types_cells() {
        let table = parse(b"name,amount,note\nAlice,120,ok\nBob,45.5,\n").unwrap();
        assert_eq!(table.column_names(), vec!["name", "amount", "note"]);

        let amount = table.column("amount").unwrap();
        assert_eq!(amount.values, vec![Value::Number(120.0), Value::Number(45.5)]);

        let note = table.column("note").unwrap();
        assert_eq!(note.values, vec![Value::Text("ok".to_string()), Value::Null]);
    }

    #[test]
    fn test_parse_extra_field_fails() {
        let err = parse(b"x,y\n1,2,3\n").unwrap_err();
        assert!(matches!(err, ParseError::Ragged { expected: 2, found: 3, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let err = parse(b"x,y,z\n1,2\n").unwrap_err();
        assert!(matches!(err, ParseError::Ragged { expected: 3, found: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_invalid_utf8_fails() {
        let err = parse(&[0x61, 0x2c, 0x62, 0xff, 0xfe]).unwrap_err();
        assert_eq!(err, ParseError::Encoding);
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert_eq!(parse(b"").unwrap_err(), ParseError::Delimiter);
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse(b"a,b\n").unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count(), 0);
    }
}
