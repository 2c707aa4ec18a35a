//! Failure modes of the scheduling engine.
//!
//! A day without a feasible window is not an error; see
//! [`super::schedule::Outcome::NoFeasibleWindow`].

use thiserror::Error;

/// Malformed engine input. Scheduling fails fast and never truncates data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The production series is empty, irregular, or too short for a cycle.
    #[error("invalid production series: {0}")]
    InvalidSeries(String),

    /// The load profile is empty or has no positive duration.
    #[error("invalid load profile `{appliance}`: {reason}")]
    InvalidProfile { appliance: String, reason: String },
}

impl ScheduleError {
    pub(crate) fn series(reason: impl Into<String>) -> Self {
        Self::InvalidSeries(reason.into())
    }

    pub(crate) fn profile(appliance: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            appliance: appliance.to_string(),
            reason: reason.into(),
        }
    }
}
