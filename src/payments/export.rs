//! CSV export of payment listings

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Export rows as CSV; the header is taken from the first row's keys
pub fn export_csv(rows: &[Map<String, Value>]) -> Result<String, ExportError> {
    let first = rows.first().ok_or(ExportError::Empty)?;
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for row in rows {
        writer.write_record(headers.iter().map(|h| cell(row.get(*h))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Default download name, e.g. `payments-2025-03-01.csv`
pub fn default_filename(today: chrono::NaiveDate) -> String {
    format!("payments-{}.csv", today.format("%Y-%m-%d"))
}
