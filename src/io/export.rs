//! CSV export for schedules and production series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::{Outcome, ProductionSeries, Schedule, TIME_FORMAT};

/// Column header for schedule export.
const SCHEDULE_HEADER: [&str; 3] = ["appliance_id", "rank", "start_time"];

/// Column header for series export.
const SERIES_HEADER: [&str; 2] = ["timestamp", "power_w"];

/// Exports a schedule to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(schedule: &Schedule, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_schedule_csv(schedule, io::BufWriter::new(file))
}

/// Writes a schedule as CSV to any writer.
///
/// One row per start time. Single outcomes get rank 1, ranked outcomes one
/// row per entry, best first. An appliance without a feasible window gets a
/// single row with empty rank and start columns.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(schedule: &Schedule, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SCHEDULE_HEADER)?;

    for entry in schedule.entries() {
        let id = entry.appliance_id.as_str();
        match &entry.outcome {
            Outcome::Start(t) => {
                wtr.write_record([id, "1", &t.format(TIME_FORMAT).to_string()])?;
            }
            Outcome::Ranked(ts) => {
                for (rank, t) in ts.iter().enumerate() {
                    wtr.write_record([
                        id,
                        &(rank + 1).to_string(),
                        &t.format(TIME_FORMAT).to_string(),
                    ])?;
                }
            }
            Outcome::NoFeasibleWindow => wtr.write_record([id, "", ""])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a production (or residual) series to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(series: &ProductionSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_series_csv(series, io::BufWriter::new(file))
}

/// Writes a series as `timestamp,power_w` rows with RFC 3339 timestamps,
/// readable back by [`super::import::read_series_csv`].
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(series: &ProductionSeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SERIES_HEADER)?;
    for s in series.samples() {
        wtr.write_record([s.timestamp.to_rfc3339(), format!("{:.4}", s.power_w)])?;
    }
    wtr.flush()?;
    Ok(())
}
