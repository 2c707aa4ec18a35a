//! Day-long production forecast on a fixed sampling grid.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// One forecast sample: average AC power over `[timestamp, timestamp + interval)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionSample {
    /// Start of the sample period (UTC).
    pub timestamp: DateTime<Utc>,
    /// Average AC power (W). Only residual series may go negative.
    #[serde(alias = "power")]
    pub power_w: f64,
}

/// Production forecast covering exactly one UTC calendar day.
///
/// Samples are contiguous at a fixed interval starting at midnight, so a
/// timestamp maps to its sample index in O(1). Instances are never mutated;
/// residual series are derived copies.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeDelta};
/// use solar_sched::engine::series::ProductionSeries;
///
/// let day = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
/// let series = ProductionSeries::from_powers(day, TimeDelta::hours(1), vec![0.0; 24]).unwrap();
/// assert_eq!(series.len(), 24);
/// assert_eq!(series.end(), day + TimeDelta::days(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionSeries {
    samples: Vec<ProductionSample>,
    interval: TimeDelta,
}

impl ProductionSeries {
    /// Builds a series from explicit samples, deriving the sampling interval
    /// from the first two timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSeries`] if the samples are empty, not
    /// strictly increasing at a uniform interval, contain negative or
    /// non-finite power, or do not cover exactly one UTC day from midnight.
    pub fn new(samples: Vec<ProductionSample>) -> Result<Self, ScheduleError> {
        let interval = match samples.as_slice() {
            [] => return Err(ScheduleError::series("series is empty")),
            [_] => {
                return Err(ScheduleError::series(
                    "at least two samples are needed to derive the sampling interval",
                ));
            }
            [first, second, ..] => second.timestamp - first.timestamp,
        };
        Self::validated(samples, interval)
    }

    /// Builds a series from consecutive power values starting at `day_start`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ProductionSeries::new`].
    pub fn from_powers(
        day_start: DateTime<Utc>,
        interval: TimeDelta,
        powers: Vec<f64>,
    ) -> Result<Self, ScheduleError> {
        let mut samples = Vec::with_capacity(powers.len());
        let mut timestamp = day_start;
        for power_w in powers {
            samples.push(ProductionSample {
                timestamp,
                power_w,
            });
            timestamp += interval;
        }
        Self::validated(samples, interval)
    }

    fn validated(
        samples: Vec<ProductionSample>,
        interval: TimeDelta,
    ) -> Result<Self, ScheduleError> {
        let Some(first) = samples.first() else {
            return Err(ScheduleError::series("series is empty"));
        };
        if interval <= TimeDelta::zero() || interval.subsec_nanos() != 0 {
            return Err(ScheduleError::series(format!(
                "sampling interval must be a positive whole number of seconds, got {interval}"
            )));
        }
        if first.timestamp.time() != NaiveTime::MIN {
            return Err(ScheduleError::series(format!(
                "series must start at midnight UTC, starts at {}",
                first.timestamp
            )));
        }

        for (i, pair) in samples.windows(2).enumerate() {
            if pair[1].timestamp - pair[0].timestamp != interval {
                return Err(ScheduleError::series(format!(
                    "non-uniform interval between samples {i} and {}",
                    i + 1
                )));
            }
        }
        if let Some(i) = samples
            .iter()
            .position(|s| !s.power_w.is_finite() || s.power_w < 0.0)
        {
            return Err(ScheduleError::series(format!(
                "sample {i} has invalid power {}",
                samples[i].power_w
            )));
        }

        let span = i32::try_from(samples.len())
            .ok()
            .and_then(|n| interval.checked_mul(n));
        if span != Some(TimeDelta::days(1)) {
            return Err(ScheduleError::series(format!(
                "{} samples at {} minutes do not cover exactly one day",
                samples.len(),
                interval.num_minutes()
            )));
        }

        Ok(Self { samples, interval })
    }

    /// Copy of this series with every power replaced. Values may be negative.
    pub(crate) fn with_powers(&self, powers: impl IntoIterator<Item = f64>) -> Self {
        let samples = self
            .samples
            .iter()
            .zip(powers)
            .map(|(s, power_w)| ProductionSample {
                timestamp: s.timestamp,
                power_w,
            })
            .collect();
        Self {
            samples,
            interval: self.interval,
        }
    }

    pub fn samples(&self) -> &[ProductionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false` for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Sampling interval in hours.
    pub fn slot_hours(&self) -> f64 {
        self.interval.num_seconds() as f64 / 3600.0
    }

    /// Midnight UTC of the forecast day.
    pub fn start(&self) -> DateTime<Utc> {
        self.samples[0].timestamp
    }

    /// End of the covered range: last timestamp plus one interval.
    pub fn end(&self) -> DateTime<Utc> {
        self.start() + self.span()
    }

    pub fn span(&self) -> TimeDelta {
        self.interval * self.samples.len() as i32
    }

    pub fn timestamp(&self, index: usize) -> DateTime<Utc> {
        self.samples[index].timestamp
    }

    pub fn powers(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.power_w)
    }

    /// Index of the sample starting exactly at `timestamp`, if any.
    pub fn index_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        let offset = (timestamp - self.start()).num_seconds();
        let step = self.interval.num_seconds();
        if offset < 0 || offset % step != 0 {
            return None;
        }
        usize::try_from(offset / step)
            .ok()
            .filter(|&i| i < self.samples.len())
    }
}
