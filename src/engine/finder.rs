//! Exhaustive search for the best start time of one appliance cycle.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::error::ScheduleError;
use super::scorer::{CycleWindow, ScoringMode, WindowScorer};
use super::series::ProductionSeries;

/// Smallest score gap (Wh) that separates two candidates.
///
/// The net running sum accumulates rounding error, so exact float equality
/// cannot detect ties.
const TIE_EPSILON_WH: f64 = 1e-6;

fn tie_tolerance(score: f64) -> f64 {
    TIE_EPSILON_WH.max(score.abs() * 1e-9)
}

/// A feasible start time and its alignment score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub start: DateTime<Utc>,
    pub score: f64,
}

/// Bounds on a cycle's placement: it may start no earlier than `from` and
/// must finish no later than `until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRange {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl SearchRange {
    /// The whole covered range of `series`.
    pub fn full(series: &ProductionSeries) -> Self {
        Self {
            from: series.start(),
            until: series.end(),
        }
    }

    /// Narrows the range so nothing starts before `at`.
    pub fn not_before(self, at: Option<DateTime<Utc>>) -> Self {
        match at {
            Some(at) => Self {
                from: self.from.max(at),
                ..self
            },
            None => self,
        }
    }
}

/// Scans every feasible start time on a series' grid and ranks them.
///
/// Ties are broken by the earlier start, so results are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalStartFinder {
    scorer: WindowScorer,
    require_production: bool,
}

impl OptimalStartFinder {
    /// Creates a finder.
    ///
    /// # Arguments
    ///
    /// * `scorer` - Window scorer to rank candidates with
    /// * `require_production` - Discard windows with no positive production
    pub fn new(scorer: WindowScorer, require_production: bool) -> Self {
        Self {
            scorer,
            require_production,
        }
    }

    pub fn scorer(&self) -> WindowScorer {
        self.scorer
    }

    /// Sample indices at which `window` may start inside `range`.
    ///
    /// Empty when the cycle does not fit between the range bounds.
    pub fn feasible_starts(
        series: &ProductionSeries,
        window: &CycleWindow,
        range: &SearchRange,
    ) -> Range<usize> {
        let step = series.interval().num_seconds();
        let from_s = (range.from - series.start()).num_seconds().max(0);
        let until = range.until.min(series.end());
        let last_s = (until - series.start()).num_seconds() - window.duration().num_seconds();
        if last_s < 0 {
            return 0..0;
        }

        let first = usize::try_from((from_s + step - 1) / step).unwrap_or(usize::MAX);
        let end = usize::try_from(last_s / step + 1).unwrap_or(0);
        first..end.max(first)
    }

    /// All feasible starts inside `range`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSeries`] if the cycle is longer than
    /// the whole series.
    pub fn rank(
        &self,
        series: &ProductionSeries,
        window: &CycleWindow,
        range: &SearchRange,
    ) -> Result<Vec<Candidate>, ScheduleError> {
        let mut candidates = self.candidates(series, window, range)?;
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.start.cmp(&b.start)));

        // Scores within tolerance of a group's leader are ties: reorder each
        // such run by start time.
        let mut i = 0;
        while i < candidates.len() {
            let floor = candidates[i].score - tie_tolerance(candidates[i].score);
            let run = candidates[i..]
                .iter()
                .take_while(|c| c.score >= floor)
                .count()
                .max(1);
            candidates[i..i + run].sort_by_key(|c| c.start);
            i += run;
        }
        Ok(candidates)
    }

    /// The single best start inside `range`, if any window is feasible.
    ///
    /// # Errors
    ///
    /// Same conditions as [`OptimalStartFinder::rank`].
    pub fn best(
        &self,
        series: &ProductionSeries,
        window: &CycleWindow,
        range: &SearchRange,
    ) -> Result<Option<Candidate>, ScheduleError> {
        let candidates = self.candidates(series, window, range)?;
        let Some(top) = candidates.iter().map(|c| c.score).reduce(f64::max) else {
            return Ok(None);
        };
        let floor = top - tie_tolerance(top);
        Ok(candidates.into_iter().find(|c| c.score >= floor))
    }

    /// Scored candidates in ascending start order.
    fn candidates(
        &self,
        series: &ProductionSeries,
        window: &CycleWindow,
        range: &SearchRange,
    ) -> Result<Vec<Candidate>, ScheduleError> {
        if window.duration() > series.span() {
            return Err(ScheduleError::series(format!(
                "series spans {} minutes, shorter than a {}-minute cycle",
                series.span().num_minutes(),
                window.duration().num_minutes()
            )));
        }

        let starts = Self::feasible_starts(series, window, range);
        let powers: Vec<f64> = series.powers().collect();
        let w = window.len();

        // lit[i] counts positive samples in powers[..i]
        let mut lit = Vec::with_capacity(powers.len() + 1);
        lit.push(0_usize);
        for p in &powers {
            lit.push(lit[lit.len() - 1] + usize::from(*p > 0.0));
        }
        let has_production = |i: usize| lit[i + w] > lit[i];

        let mut out = Vec::with_capacity(starts.len());
        if starts.is_empty() {
            debug!(
                range_from = %range.from,
                range_until = %range.until,
                "no start fits the search range"
            );
            return Ok(out);
        }

        match self.scorer.mode() {
            ScoringMode::Net => {
                let interval = series.interval();
                let full = window.full_slots(interval);
                let tail_h = window.tail_hours(interval);
                let slot_h = series.slot_hours();

                let mut sum: f64 = powers[starts.start..starts.start + full].iter().sum();
                for i in starts.clone() {
                    if i > starts.start {
                        sum += powers[i + full - 1] - powers[i - 1];
                    }
                    if self.require_production && !has_production(i) {
                        continue;
                    }
                    let tail = if w > full { powers[i + full] * tail_h } else { 0.0 };
                    out.push(Candidate {
                        start: series.timestamp(i),
                        score: sum * slot_h + tail - window.total_wh(),
                    });
                }
            }
            ScoringMode::Closeness => {
                for i in starts.clone() {
                    if self.require_production && !has_production(i) {
                        continue;
                    }
                    out.push(Candidate {
                        start: series.timestamp(i),
                        score: self.scorer.score(&powers[i..i + w], window),
                    });
                }
            }
        }

        debug!(
            scanned = starts.len(),
            viable = out.len(),
            "scored candidate windows"
        );
        Ok(out)
    }
}
