//! CSV import and export.

pub mod export;
pub mod import;

pub use export::{export_schedule_csv, export_series_csv, write_schedule_csv, write_series_csv};
pub use import::{ImportError, import_series_csv, read_series_csv};
