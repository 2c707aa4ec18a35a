//! Built-in appliance profiles measured at 10-minute resolution.

use chrono::TimeDelta;

use super::{Appliance, LoadProfile, PreferredTime};

pub const WASHING_MACHINE: &str = "washing_machine";
pub const TUMBLE_DRYER: &str = "tumble_dryer";

/// Length of one measured profile step in minutes.
pub const STEP_MINUTES: i64 = 10;

const WASHING_MACHINE_WH: [f64; 13] = [
    0.37, 375.23, 375.68, 140.23, 62.92, 58.33, 11.57, 10.9, 11.0, 18.38, 18.77, 0.32, 0.05,
];

const TUMBLE_DRYER_WH: [f64; 13] = [
    0.03, 298.37, 312.7, 279.18, 278.23, 275.85, 251.97, 34.95, 187.23, 281.2, 185.17, 16.82,
    0.02,
];

/// Names of all built-in profiles.
pub const NAMES: &[&str] = &[WASHING_MACHINE, TUMBLE_DRYER];

/// Measured cycle of a built-in appliance.
pub fn profile(name: &str) -> Option<LoadProfile> {
    let readings: &[f64] = match name {
        WASHING_MACHINE => &WASHING_MACHINE_WH,
        TUMBLE_DRYER => &TUMBLE_DRYER_WH,
        _ => return None,
    };
    Some(LoadProfile::from_readings(
        TimeDelta::minutes(STEP_MINUTES),
        readings,
    ))
}

/// Default time of day, chosen so the washer and dryer do not collide.
pub fn default_preference(name: &str) -> Option<PreferredTime> {
    match name {
        WASHING_MACHINE => Some(PreferredTime::Morning),
        TUMBLE_DRYER => Some(PreferredTime::Afternoon),
        _ => None,
    }
}

/// A built-in appliance with its default preference.
pub fn appliance(name: &str) -> Option<Appliance> {
    profile(name).map(|profile| Appliance {
        id: name.to_string(),
        profile,
        preferred_time: default_preference(name),
    })
}
