//! Sequential greedy placement of several appliances on one forecast day.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use super::adjuster::SeriesAdjuster;
use super::error::ScheduleError;
use super::finder::{Candidate, OptimalStartFinder, SearchRange};
use super::options::{EngineOptions, OutputMode, Sequencing, WindowFallback};
use super::schedule::{Outcome, Schedule};
use super::scorer::{CycleWindow, WindowScorer};
use super::series::ProductionSeries;
use crate::appliances::{Appliance, PreferredTime};

/// Places appliances one after another in caller order.
///
/// Stateless: every call is a pure function of its inputs, so one
/// coordinator can serve concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleCoordinator {
    options: EngineOptions,
}

impl ScheduleCoordinator {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Computes a schedule for `appliances` against `series`.
    ///
    /// A lone appliance may run at any time of day. With several, each one
    /// keeps its own preferred hours. Once an appliance is placed, later ones
    /// either start after it ends or see production minus its draw,
    /// depending on [`Sequencing`]. An appliance without a feasible window
    /// leaves the constraints for the next one unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidProfile`] for a repeated appliance id
    /// and [`ScheduleError::InvalidSeries`] when a cycle is longer than the
    /// series.
    #[instrument(skip_all, fields(appliances = appliances.len(), mode = ?self.options.mode))]
    pub fn schedule(
        &self,
        series: &ProductionSeries,
        appliances: &[Appliance],
    ) -> Result<Schedule, ScheduleError> {
        let mut seen = HashSet::with_capacity(appliances.len());
        for a in appliances {
            if !seen.insert(a.id.as_str()) {
                return Err(ScheduleError::profile(&a.id, "appliance requested twice"));
            }
        }

        let finder = OptimalStartFinder::new(
            WindowScorer::new(self.options.mode),
            self.options.require_production,
        );
        let single = appliances.len() == 1;
        let mut working = Cow::Borrowed(series);
        let mut not_before: Option<DateTime<Utc>> = None;
        let mut schedule = Schedule::default();

        for appliance in appliances {
            let preference = if single {
                PreferredTime::Anytime
            } else {
                appliance.preferred_time.unwrap_or_default()
            };
            let window = CycleWindow::new(&appliance.profile, series.interval());
            let ranked = self.rank_within(&finder, &working, &window, preference, not_before)?;

            let Some(best) = ranked.first().copied() else {
                info!(appliance = %appliance.id, %preference, "no feasible window");
                schedule.push(&appliance.id, Outcome::NoFeasibleWindow);
                continue;
            };
            info!(
                appliance = %appliance.id,
                %preference,
                start = %best.start,
                score = best.score,
                "scheduled appliance"
            );

            match self.options.sequencing {
                Sequencing::AfterPrevious => {
                    not_before = Some(best.start + window.duration());
                }
                Sequencing::Residual => {
                    working = Cow::Owned(SeriesAdjuster::subtract(
                        &working,
                        &appliance.profile,
                        best.start,
                    )?);
                }
            }
            schedule.push(&appliance.id, self.outcome(best, ranked));
        }

        Ok(schedule)
    }

    /// Ranks starts inside the preferred hours, falling back per policy when
    /// the cycle cannot fit there.
    fn rank_within(
        &self,
        finder: &OptimalStartFinder,
        series: &ProductionSeries,
        window: &CycleWindow,
        preference: PreferredTime,
        not_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Candidate>, ScheduleError> {
        let (from, until) = preference.bounds(series.start());
        let preferred = SearchRange { from, until }.not_before(not_before);

        let range = if OptimalStartFinder::feasible_starts(series, window, &preferred).is_empty() {
            match self.options.fallback {
                WindowFallback::FullDay => {
                    debug!(%preference, "cycle does not fit preferred hours, searching whole day");
                    SearchRange::full(series).not_before(not_before)
                }
                WindowFallback::NoResult => preferred,
            }
        } else {
            preferred
        };
        finder.rank(series, window, &range)
    }

    fn outcome(&self, best: Candidate, ranked: Vec<Candidate>) -> Outcome {
        match self.options.output {
            OutputMode::Single => Outcome::Start(best.start),
            OutputMode::Ranked => {
                let limit = self.options.top_n.unwrap_or(ranked.len());
                Outcome::Ranked(ranked.into_iter().take(limit).map(|c| c.start).collect())
            }
        }
    }
}
