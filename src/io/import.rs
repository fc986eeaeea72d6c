//! CSV import of caller-supplied hourly profiles.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::EngineError;
use crate::profiles::HourlySeries;

/// Failure to load an hourly profile from CSV.
#[derive(Debug, Error)]
pub enum ProfileImportError {
    #[error("cannot open \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

/// Reads an hourly profile from a CSV file.
///
/// See [`read_profile`] for the accepted layout.
///
/// # Errors
///
/// Returns [`ProfileImportError`] if the file cannot be opened, is not valid
/// CSV or does not yield exactly 8760 values.
pub fn read_profile_csv(path: &Path, field: &str) -> Result<HourlySeries, ProfileImportError> {
    let file = File::open(path).map_err(|source| ProfileImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_profile(io::BufReader::new(file), field)
}

/// Reads an hourly profile from any CSV source.
///
/// Each row contributes its last numeric field, so both a bare value column
/// and `timestamp,value` layouts work. Rows without any numeric field, such
/// as headers, are skipped.
///
/// # Errors
///
/// Returns [`ProfileImportError::Csv`] on malformed input and
/// [`ProfileImportError::Invalid`] unless exactly 8760 values were read.
pub fn read_profile(reader: impl Read, field: &str) -> Result<HourlySeries, ProfileImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(value) = record
            .iter()
            .filter_map(|cell| cell.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .last()
        {
            values.push(value);
        }
    }

    Ok(HourlySeries::try_new(field, values)?)
}
