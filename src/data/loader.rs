use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::{Channel, TelemetryDataset};
use crate::error::{Result, SpectroError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a telemetry table from a CSV file.
///
/// The file has no header row; every line is one sample with the columns
/// `roll, pitch, ax, ay, az` in that order. The file is closed before this
/// function returns, whatever the outcome.
pub fn load_file(path: &Path) -> Result<TelemetryDataset> {
    let file = File::open(path).map_err(|source| SpectroError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_table(file)?;
    log::info!(
        "Loaded {} samples per channel from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse a header-less 5-column CSV table from any reader.
pub fn read_table<R: Read>(reader: R) -> Result<TelemetryDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<[f64; 5]> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            SpectroError::MalformedInput(format!("row {}: {e}", idx + 1))
        })?;
        let row_no = record
            .position()
            .map_or(idx + 1, |p| p.line() as usize);

        if record.len() != Channel::ALL.len() {
            return Err(SpectroError::MalformedInput(format!(
                "row {row_no}: expected {} columns (roll, pitch, ax, ay, az), found {}",
                Channel::ALL.len(),
                record.len()
            )));
        }

        let mut row = [0.0; 5];
        for ch in Channel::ALL {
            row[ch.column()] = parse_cell(record.get(ch.column()).unwrap_or(""), row_no, ch)?;
        }
        rows.push(row);
    }

    TelemetryDataset::from_rows(&rows)
}

fn parse_cell(cell: &str, row: usize, channel: Channel) -> Result<f64> {
    let value = cell.parse::<f64>().map_err(|_| {
        SpectroError::MalformedInput(format!("row {row}, column {channel}: '{cell}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(SpectroError::MalformedInput(format!(
            "row {row}, column {channel}: '{cell}' is not a finite number"
        )));
    }
    Ok(value)
}
