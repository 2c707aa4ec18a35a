use std::collections::HashSet;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// One step of a measured appliance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSample {
    /// 1-based position within the cycle.
    #[serde(alias = "sequence_index")]
    pub sequence: u32,
    /// Energy drawn during this step (Wh).
    #[serde(alias = "consumption")]
    pub consumption_wh: f64,
}

/// Consumption pattern of one appliance cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadProfile {
    /// Measured draw at a fixed sub-interval, ordered by sequence.
    PerSample {
        interval: TimeDelta,
        samples: Vec<ProfileSample>,
    },
    /// Total energy spread uniformly over the cycle duration.
    Scalar { total_wh: f64, duration: TimeDelta },
}

impl LoadProfile {
    /// Builds a per-sample profile; samples are ordered by `sequence`.
    pub fn per_sample(interval: TimeDelta, mut samples: Vec<ProfileSample>) -> Self {
        samples.sort_by_key(|s| s.sequence);
        Self::PerSample { interval, samples }
    }

    /// Builds a per-sample profile from consecutive readings.
    pub fn from_readings(interval: TimeDelta, readings: &[f64]) -> Self {
        let samples = readings
            .iter()
            .zip(1..)
            .map(|(&consumption_wh, sequence)| ProfileSample {
                sequence,
                consumption_wh,
            })
            .collect();
        Self::PerSample { interval, samples }
    }

    pub fn scalar(total_wh: f64, duration: TimeDelta) -> Self {
        Self::Scalar { total_wh, duration }
    }

    /// Cycle duration: sample count times sub-interval for measured profiles.
    pub fn duration(&self) -> TimeDelta {
        match self {
            Self::PerSample { interval, samples } => *interval * samples.len() as i32,
            Self::Scalar { duration, .. } => *duration,
        }
    }

    /// Total energy of one cycle (Wh).
    pub fn total_wh(&self) -> f64 {
        match self {
            Self::PerSample { samples, .. } => samples.iter().map(|s| s.consumption_wh).sum(),
            Self::Scalar { total_wh, .. } => *total_wh,
        }
    }

    /// Checks the profile can be scheduled.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::PerSample { interval, samples } => {
                if samples.is_empty() {
                    return Err("profile has no samples".to_string());
                }
                check_duration(*interval)?;
                let mut seen = HashSet::with_capacity(samples.len());
                for s in samples {
                    if s.sequence == 0 {
                        return Err("sequence numbers start at 1".to_string());
                    }
                    if !seen.insert(s.sequence) {
                        return Err(format!("duplicate sequence {}", s.sequence));
                    }
                    check_energy(s.consumption_wh)
                        .map_err(|e| format!("sequence {}: {e}", s.sequence))?;
                }
                Ok(())
            }
            Self::Scalar { total_wh, duration } => {
                check_duration(*duration)?;
                check_energy(*total_wh)
            }
        }
    }

    /// Energy drawn in each `slot`-long period from the cycle start (Wh).
    ///
    /// The last slot may be partially covered. A measured step straddling a
    /// slot boundary is split in proportion to its overlap.
    pub fn resample(&self, slot: TimeDelta) -> Vec<f64> {
        let slot_s = slot.num_seconds();
        let duration_s = self.duration().num_seconds();
        if slot_s <= 0 || duration_s <= 0 {
            return Vec::new();
        }
        let slots = usize::try_from((duration_s + slot_s - 1) / slot_s).unwrap_or(0);
        let mut out = vec![0.0; slots];

        match self {
            Self::PerSample { interval, samples } => {
                let step_s = interval.num_seconds();
                for (j, s) in samples.iter().enumerate() {
                    let a = j as i64 * step_s;
                    spread(&mut out, slot_s, a, a + step_s, s.consumption_wh);
                }
            }
            Self::Scalar { total_wh, .. } => {
                spread(&mut out, slot_s, 0, duration_s, *total_wh);
            }
        }
        out
    }
}

/// Adds `energy`, uniform over `[a, b)` seconds, into the overlapping slots.
fn spread(out: &mut [f64], slot_s: i64, a: i64, b: i64, energy: f64) {
    let len = (b - a) as f64;
    let mut k = a / slot_s;
    while k * slot_s < b {
        let Some(cell) = usize::try_from(k).ok().and_then(|i| out.get_mut(i)) else {
            break;
        };
        let overlap = b.min((k + 1) * slot_s) - a.max(k * slot_s);
        if overlap > 0 {
            *cell += energy * overlap as f64 / len;
        }
        k += 1;
    }
}

fn check_duration(d: TimeDelta) -> Result<(), String> {
    if d <= TimeDelta::zero() || d.subsec_nanos() != 0 {
        return Err(format!("duration must be a positive whole number of seconds, got {d}"));
    }
    Ok(())
}

fn check_energy(wh: f64) -> Result<(), String> {
    if !wh.is_finite() || wh < 0.0 {
        return Err(format!("consumption must be finite and non-negative, got {wh}"));
    }
    Ok(())
}
