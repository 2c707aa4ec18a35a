//! CSV import of production forecasts.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{ProductionSample, ProductionSeries, ScheduleError};

/// Failure to load a production series from CSV.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Series(#[from] ScheduleError),
}

#[derive(Debug, Deserialize)]
struct Row {
    timestamp: DateTime<Utc>,
    power_w: f64,
}

/// Reads a series from a `timestamp,power_w` CSV file.
///
/// # Errors
///
/// Returns [`ImportError`] if the file cannot be opened, a row does not
/// parse, or the rows do not form a valid one-day series.
pub fn import_series_csv(path: &Path) -> Result<ProductionSeries, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_series_csv(io::BufReader::new(file))
}

/// Reads a series from CSV with a `timestamp,power_w` header.
///
/// Timestamps are RFC 3339 and converted to UTC.
///
/// # Errors
///
/// Same conditions as [`import_series_csv`], minus file access.
pub fn read_series_csv(reader: impl Read) -> Result<ProductionSeries, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let samples = rdr
        .deserialize::<Row>()
        .map(|row| {
            row.map(|r| ProductionSample {
                timestamp: r.timestamp,
                power_w: r.power_w,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ProductionSeries::new(samples)?)
}
