//! Solar-aware appliance scheduler.
//!
//! Picks start times for household appliances so their consumption lines up
//! with a day-ahead PV production forecast.

/// Appliance profiles, preferences, and the built-in catalog.
pub mod appliances;
pub mod config;
/// Scoring, search, and sequential coordination.
pub mod engine;
pub mod forecast;
pub mod io;

#[cfg(feature = "api")]
pub mod api;
