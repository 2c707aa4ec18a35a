//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use solar_sched::appliances::{Appliance, LoadProfile, PreferredTime, catalog};
use solar_sched::engine::ProductionSeries;

/// Midnight UTC of the fixture day (2024-06-21).
pub fn day_start() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 6, 21)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .expect("valid date")
}

/// Fixture day at `hour:00`.
pub fn at(hour: i64) -> DateTime<Utc> {
    day_start() + TimeDelta::hours(hour)
}

/// Hourly series that is zero except for the given `(hour, watts)` pairs.
pub fn hourly_series(peaks: &[(usize, f64)]) -> ProductionSeries {
    let mut powers = vec![0.0; 24];
    for &(h, p) in peaks {
        powers[h] = p;
    }
    ProductionSeries::from_powers(day_start(), TimeDelta::hours(1), powers).expect("valid series")
}

/// 10-minute series from a function of the slot's start hour.
pub fn ten_minute_series(f: impl Fn(f64) -> f64) -> ProductionSeries {
    let powers = (0..144).map(|i| f(f64::from(i) / 6.0)).collect();
    ProductionSeries::from_powers(day_start(), TimeDelta::minutes(10), powers)
        .expect("valid series")
}

/// Built-in washing machine (morning preference).
pub fn washing_machine() -> Appliance {
    catalog::appliance(catalog::WASHING_MACHINE).expect("built-in")
}

/// Built-in tumble dryer (afternoon preference).
pub fn tumble_dryer() -> Appliance {
    catalog::appliance(catalog::TUMBLE_DRYER).expect("built-in")
}

/// Appliance drawing `total_wh` evenly over `hours`.
pub fn flat_appliance(id: &str, total_wh: f64, hours: i64, pref: Option<PreferredTime>) -> Appliance {
    Appliance::new(id, LoadProfile::scalar(total_wh, TimeDelta::hours(hours)), pref)
        .expect("valid appliance")
}
