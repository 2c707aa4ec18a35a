//! Production/consumption alignment scoring for one candidate window.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::appliances::LoadProfile;

/// How a window's alignment with production is measured.
///
/// Scores are only comparable within one mode and one candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Produced energy over the window minus the cycle's total consumption.
    Net,
    /// Negated sum of per-slot `|production - consumption|`.
    #[default]
    Closeness,
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "net" => Ok(Self::Net),
            "closeness" => Ok(Self::Closeness),
            other => Err(format!(
                "unknown scoring mode \"{other}\", expected net or closeness"
            )),
        }
    }
}

/// An appliance cycle laid onto a production series' sampling grid.
///
/// Slot `k` starts `k` intervals after the cycle start. Every slot is fully
/// covered except possibly the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleWindow {
    consumption_wh: Vec<f64>,
    coverage_h: Vec<f64>,
    duration: TimeDelta,
    total_wh: f64,
}

impl CycleWindow {
    /// Resamples `profile` onto slots of length `interval`.
    pub fn new(profile: &LoadProfile, interval: TimeDelta) -> Self {
        let consumption_wh = profile.resample(interval);
        let duration = profile.duration();
        let step_s = interval.num_seconds();
        let duration_s = duration.num_seconds();
        let coverage_h = (0..consumption_wh.len() as i64)
            .map(|k| {
                let covered = duration_s.min((k + 1) * step_s) - k * step_s;
                covered as f64 / 3600.0
            })
            .collect();
        Self {
            consumption_wh,
            coverage_h,
            duration,
            total_wh: profile.total_wh(),
        }
    }

    /// Number of series slots the cycle touches.
    pub fn len(&self) -> usize {
        self.consumption_wh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumption_wh.is_empty()
    }

    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    pub fn total_wh(&self) -> f64 {
        self.total_wh
    }

    /// Energy drawn in each slot (Wh).
    pub fn consumption_wh(&self) -> &[f64] {
        &self.consumption_wh
    }

    /// Hours of each slot covered by the cycle.
    pub fn coverage_h(&self) -> &[f64] {
        &self.coverage_h
    }

    /// Leading slots covered for their full length.
    pub(crate) fn full_slots(&self, interval: TimeDelta) -> usize {
        usize::try_from(self.duration.num_seconds() / interval.num_seconds()).unwrap_or(0)
    }

    /// Covered hours of the trailing partial slot, zero when none.
    pub(crate) fn tail_hours(&self, interval: TimeDelta) -> f64 {
        (self.duration.num_seconds() % interval.num_seconds()) as f64 / 3600.0
    }
}

/// Scores a production window against an appliance cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowScorer {
    mode: ScoringMode,
}

impl WindowScorer {
    pub fn new(mode: ScoringMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    /// Alignment score of running `window` against `production_w`.
    ///
    /// `production_w` holds the average power (W) of each slot the cycle
    /// touches, so it has `window.len()` entries. Higher is better.
    pub fn score(&self, production_w: &[f64], window: &CycleWindow) -> f64 {
        let produced = production_w.iter().zip(&window.coverage_h).map(|(p, h)| p * h);
        match self.mode {
            ScoringMode::Net => produced.sum::<f64>() - window.total_wh,
            ScoringMode::Closeness => -produced
                .zip(&window.consumption_wh)
                .map(|(p, c)| (p - c).abs())
                .sum::<f64>(),
        }
    }
}
