//! CSV payload loader.
//!
//! Each row becomes one JSON object keyed by the header names, so CSV files
//! go through the same [`FieldMapping`](payroll_core::FieldMapping) as JSON
//! payloads. Column order does not matter, whitespace around cells is
//! trimmed and empty cells are left out (they then count as missing).
//!
//! ```csv
//! nome,cpf,salario,desconto,dependentes
//! Edson Thiago Drumond,748.517.476-24,1045,78.38,1
//! ```

use serde_json::{Map, Value};

use crate::error::LoadError;

/// Parse CSV text into one object per data row, in file order.
///
/// # Errors
///
/// [`LoadError::Csv`] if the CSV is structurally invalid (for instance a row
/// with a different number of cells than the header).
pub fn parse_rows(input: &str) -> Result<Vec<Value>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();

    reader
        .records()
        .map(|row| {
            let row = row?;
            let object: Map<String, Value> = headers
                .iter()
                .zip(row.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
                .collect();
            Ok(Value::Object(object))
        })
        .collect()
}
