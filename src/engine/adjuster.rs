//! Residual production after an appliance has been placed.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::error::ScheduleError;
use super::scorer::CycleWindow;
use super::series::ProductionSeries;
use crate::appliances::LoadProfile;

/// Subtracts a scheduled appliance's draw from a production series.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeriesAdjuster;

impl SeriesAdjuster {
    /// Returns a new series with the cycle's average power removed from every
    /// slot in `[start, start + duration)`.
    ///
    /// Residual values are not clamped: a negative sample marks a slot where
    /// the appliance draws more than is produced. `series` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSeries`] if `start` is not a sample
    /// timestamp or the cycle would run past the end of the series.
    pub fn subtract(
        series: &ProductionSeries,
        profile: &LoadProfile,
        start: DateTime<Utc>,
    ) -> Result<ProductionSeries, ScheduleError> {
        let window = CycleWindow::new(profile, series.interval());
        let Some(first) = series.index_of(start) else {
            return Err(ScheduleError::series(format!(
                "start {start} is not on the series grid"
            )));
        };
        if start + window.duration() > series.end() {
            return Err(ScheduleError::series(format!(
                "cycle starting at {start} runs past the end of the series"
            )));
        }

        let slot_h = series.slot_hours();
        let draw = window.consumption_wh();
        let residual = series.powers().enumerate().map(|(i, p)| {
            match i.checked_sub(first).and_then(|k| draw.get(k)) {
                Some(wh) => p - wh / slot_h,
                None => p,
            }
        });
        debug!(%start, slots = draw.len(), "subtracted appliance draw");
        Ok(series.with_powers(residual))
    }
}
