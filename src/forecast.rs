//! Synthetic PV forecaster used when no measured forecast is supplied.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::engine::{ProductionSeries, ScheduleError};

/// Half-cosine daylight curve with seeded multiplicative noise.
///
/// Power is zero outside `[sunrise_hour, sunset_hour)` and peaks at
/// `peak_w` halfway between them. Each slot is evaluated at its midpoint, so
/// the curve is symmetric around solar noon at any resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPv {
    /// Output under clear sky at solar noon (W).
    pub peak_w: f64,
    /// Hour of day when generation starts.
    pub sunrise_hour: f64,
    /// Hour of day when generation stops.
    pub sunset_hour: f64,
    /// Standard deviation of the noise as a fraction of output.
    pub noise_std: f64,
    /// Seed for reproducible noise.
    pub seed: u64,
}

impl Default for SyntheticPv {
    fn default() -> Self {
        Self {
            peak_w: 4000.0,
            sunrise_hour: 6.0,
            sunset_hour: 20.0,
            noise_std: 0.05,
            seed: 42,
        }
    }
}

impl SyntheticPv {
    /// Clear-sky fraction of peak output at `hour` (0.0 at night).
    pub fn daylight_frac(&self, hour: f64) -> f64 {
        if hour < self.sunrise_hour || hour >= self.sunset_hour {
            return 0.0;
        }
        let day_len = self.sunset_hour - self.sunrise_hour;
        let x = (hour - self.sunrise_hour) / day_len;
        (std::f64::consts::PI * x).sin()
    }

    /// Forecast for the UTC calendar day `date` at `steps_per_day` samples.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSeries`] if `steps_per_day` does not
    /// divide a day into whole seconds.
    pub fn series(
        &self,
        date: NaiveDate,
        steps_per_day: usize,
    ) -> Result<ProductionSeries, ScheduleError> {
        let step_s = u32::try_from(steps_per_day)
            .ok()
            .filter(|&n| n > 0 && 86_400 % n == 0)
            .map(|n| 86_400 / n)
            .ok_or_else(|| {
                ScheduleError::series(format!(
                    "{steps_per_day} steps do not divide a day into whole seconds"
                ))
            })?;
        let interval = TimeDelta::seconds(i64::from(step_s));
        let slot_h = f64::from(step_s) / 3600.0;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let peak = self.peak_w.max(0.0);
        let powers = (0..steps_per_day)
            .map(|t| {
                let frac = self.daylight_frac((t as f64 + 0.5) * slot_h);
                if frac <= 0.0 {
                    return 0.0;
                }
                let noise_mult = 1.0 + gaussian_noise(&mut rng, self.noise_std);
                (peak * frac * noise_mult).max(0.0)
            })
            .collect();

        ProductionSeries::from_powers(date.and_time(NaiveTime::MIN).and_utc(), interval, powers)
    }
}

/// Gaussian noise with mean 0 via the Box-Muller transform.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
