// Spreadsheet import (xlsx, xls, xlsb, ods) via calamine

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use digitlaw_engine::{Column, Table, Value};

use crate::error::ParseError;

/// Parse the first sheet of a spreadsheet, first row as header.
pub fn parse(bytes: &[u8]) -> Result<Table, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::Spreadsheet(format!("failed to open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Spreadsheet("workbook contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| ParseError::Spreadsheet(format!("failed to read sheet '{first}': {e}")))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(ParseError::Empty)?;

    let mut columns: Vec<Column> = header
        .iter()
        .map(|cell| Column::new(header_label(cell)))
        .collect();

    for row in rows {
        for (col_idx, column) in columns.iter_mut().enumerate() {
            // Calamine ranges are dense; a short row just means trailing
            // blanks, which are nulls rather than a structural error.
            let value = row.get(col_idx).map(cell_value).unwrap_or(Value::Null);
            column.values.push(value);
        }
    }

    Ok(Table::new(columns))
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a calamine cell onto the engine's value model. Dates keep their
/// serial number; booleans and cell errors are carried as text.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::parse(s),
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Value::Text(format!("#{e:?}")),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "name").unwrap();
        sheet.write_string(0, 1, "amount").unwrap();
        sheet.write_string(1, 0, "Alice").unwrap();
        sheet.write_number(1, 1, 120.0).unwrap();
        sheet.write_string(2, 0, "Bob").unwrap();
        sheet.write_number(2, 1, 45.5).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_first_sheet_first_row_header() {
        let table = parse(&sample_workbook()).unwrap();
        assert_eq!(table.column_names(), vec!["name", "amount"]);

        let amount = table.column("amount").unwrap();
        assert_eq!(amount.values, vec![Value::Number(120.0), Value::Number(45.5)]);
    }

    #[test]
    fn test_parse_short_rows_pad_with_null() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "a").unwrap();
        sheet.write_string(0, 1, "b").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        // row 1 leaves column b blank
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse(&bytes).unwrap();
        let b = table.column("b").unwrap();
        assert_eq!(b.values, vec![Value::Null]);
    }

    #[test]
    fn test_parse_garbage_bytes_fails() {
        let err = parse(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, ParseError::Spreadsheet(_)), "{err:?}");
    }
}
