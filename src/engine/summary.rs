//! Whole-day production figures reported next to a schedule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::schedule::{TIME_FORMAT, serialize_time};
use super::series::ProductionSeries;

/// Aggregate production figures for the forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Total forecast energy (Wh).
    pub daily_output_wh: f64,
    /// Start of the first sample with the highest power.
    #[serde(serialize_with = "serialize_time")]
    pub peak_time: DateTime<Utc>,
    /// Highest sample power (W).
    pub peak_power_w: f64,
}

impl DailySummary {
    /// Computes the summary from a production series.
    pub fn from_series(series: &ProductionSeries) -> Self {
        let slot_h = series.slot_hours();
        let mut peak = series.samples()[0];
        let mut total = 0.0;
        for s in series.samples() {
            total += s.power_w * slot_h;
            if s.power_w > peak.power_w {
                peak = *s;
            }
        }
        Self {
            daily_output_wh: total,
            peak_time: peak.timestamp,
            peak_power_w: peak.power_w,
        }
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Production Summary ---")?;
        writeln!(f, "Daily output:  {:.0} Wh", self.daily_output_wh)?;
        writeln!(
            f,
            "Peak:          {:.0} W at {}",
            self.peak_power_w,
            self.peak_time.format(TIME_FORMAT)
        )
    }
}
