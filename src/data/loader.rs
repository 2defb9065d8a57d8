use std::{fs::File, io::Read, path::Path};

use super::model::{Dataset, WageRecord};
use crate::error::{Error, Result};

/// Accepted spellings of the predictor column header, in order of preference.
const EXPERIENCE_HEADERS: [&str; 2] = ["experience", "exper"];

/// Response column header.
const WAGE_HEADER: &str = "wage";

/// Load a wage dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with an `experience` (or `exper`) column and a `wage` column;
///   other columns are ignored
/// * `.json` – `[{ "experience": 5.0, "wage": 600.0 }, ...]`
///
/// # Errors
/// - [`Error::Io`] if the file cannot be opened.
/// - [`Error::DatasetFormat`] for an unsupported extension or malformed contents.
/// - [`Error::NoData`] if the file has no data rows.
pub fn load_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => from_csv_reader(File::open(path)?)?,
        "json" => from_json_reader(File::open(path)?)?,
        other => {
            return Err(Error::DatasetFormat {
                row: None,
                reason: format!("unsupported file extension `.{other}`"),
            })
        }
    };

    log::info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Reads a comma-delimited table with a header row.
///
/// Rows are numbered from 1, not counting the header.
///
/// # Errors
/// - [`Error::DatasetFormat`] if a required column is missing, or a value is not a finite number.
/// - [`Error::NoData`] if there are no data rows.
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| Error::DatasetFormat {
        row: None,
        reason: format!("reading header: {e}"),
    })?;

    let experience_idx = EXPERIENCE_HEADERS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .ok_or_else(|| missing_column("experience"))?;
    let wage_idx = headers
        .iter()
        .position(|h| h == WAGE_HEADER)
        .ok_or_else(|| missing_column(WAGE_HEADER))?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| Error::DatasetFormat {
            row: Some(row),
            reason: e.to_string(),
        })?;

        let experience = parse_field(record.get(experience_idx), row, "experience")?;
        let wage = parse_field(record.get(wage_idx), row, WAGE_HEADER)?;
        records.push(WageRecord::new(experience, wage));
    }

    finish(records)
}

/// Reads a JSON array of `{ "experience": .., "wage": .. }` objects.
///
/// `exper` is accepted in place of `experience`; if a row has both, `experience` wins, as
/// it does for CSV headers. Other keys are ignored.
///
/// # Errors
/// - [`Error::Json`] if the document does not match that shape.
/// - [`Error::DatasetFormat`] if a row has no experience value, or a value is not finite.
/// - [`Error::NoData`] if the array is empty.
pub fn from_json_reader<R: Read>(reader: R) -> Result<Dataset> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let row_number = i + 1;
        let experience = row
            .experience
            .or(row.exper)
            .ok_or_else(|| Error::DatasetFormat {
                row: Some(row_number),
                reason: "missing `experience` value".to_string(),
            })?;

        check_finite(experience, row_number, "experience")?;
        check_finite(row.wage, row_number, WAGE_HEADER)?;
        records.push(WageRecord::new(experience, row.wage));
    }

    finish(records)
}

/// One JSON object; both spellings of the predictor are read so the preferred one can be picked.
#[derive(serde::Deserialize)]
struct JsonRow {
    experience: Option<f64>,
    exper: Option<f64>,
    wage: f64,
}

fn finish(records: Vec<WageRecord>) -> Result<Dataset> {
    if records.is_empty() {
        return Err(Error::NoData);
    }

    log::debug!("Parsed {} records", records.len());
    Ok(Dataset::from_records(records))
}

fn missing_column(name: &str) -> Error {
    Error::DatasetFormat {
        row: None,
        reason: format!("missing `{name}` column"),
    }
}

fn parse_field(field: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let text = field.unwrap_or("");
    let value = text.parse::<f64>().map_err(|_| Error::DatasetFormat {
        row: Some(row),
        reason: format!("`{col}` value '{text}' is not a number"),
    })?;

    check_finite(value, row, col)?;
    Ok(value)
}

fn check_finite(value: f64, row: usize, col: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::DatasetFormat {
            row: Some(row),
            reason: format!("`{col}` value {value} is not finite"),
        })
    }
}
