//! Appliance load profiles and time-of-day preferences.

/// Built-in measured appliance cycles.
pub mod catalog;
pub mod preference;
/// Load profile representations and resampling.
pub mod profile;

pub use preference::PreferredTime;
pub use profile::{LoadProfile, ProfileSample};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::engine::error::ScheduleError;

/// An appliance to schedule: identifier, cycle profile, and preferred window.
#[derive(Debug, Clone, PartialEq)]
pub struct Appliance {
    pub id: String,
    pub profile: LoadProfile,
    pub preferred_time: Option<PreferredTime>,
}

impl Appliance {
    /// Creates an appliance after validating its profile.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidProfile`] if the profile is empty or
    /// has no positive duration.
    pub fn new(
        id: impl Into<String>,
        profile: LoadProfile,
        preferred_time: Option<PreferredTime>,
    ) -> Result<Self, ScheduleError> {
        let id = id.into();
        profile
            .validate()
            .map_err(|reason| ScheduleError::profile(&id, reason))?;
        Ok(Self {
            id,
            profile,
            preferred_time,
        })
    }
}

fn default_step_minutes() -> i64 {
    catalog::STEP_MINUTES
}

/// Profile as written in scenario files and API requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileSpec {
    /// Reference to a built-in profile by name.
    Builtin { builtin: String },
    /// Measured steps at a fixed sub-interval.
    Samples {
        #[serde(default = "default_step_minutes")]
        interval_minutes: i64,
        samples: Vec<ProfileSample>,
    },
    /// Total energy over a cycle of known length.
    Scalar { total_wh: f64, duration_minutes: i64 },
}

impl ProfileSpec {
    /// Resolves the spec into a concrete profile.
    ///
    /// # Errors
    ///
    /// Returns a message if a built-in name is unknown.
    pub fn resolve(&self) -> Result<LoadProfile, String> {
        match self {
            Self::Builtin { builtin } => catalog::profile(builtin).ok_or_else(|| {
                format!(
                    "unknown built-in appliance \"{builtin}\", available: {}",
                    catalog::NAMES.join(", ")
                )
            }),
            Self::Samples {
                interval_minutes,
                samples,
            } => Ok(LoadProfile::per_sample(
                minutes(*interval_minutes)?,
                samples.clone(),
            )),
            Self::Scalar {
                total_wh,
                duration_minutes,
            } => Ok(LoadProfile::scalar(*total_wh, minutes(*duration_minutes)?)),
        }
    }
}

fn minutes(value: i64) -> Result<TimeDelta, String> {
    TimeDelta::try_minutes(value).ok_or_else(|| format!("{value} minutes is out of range"))
}

/// Appliance entry of a scenario file or API request.
///
/// Without an explicit profile, `id` must name a built-in appliance, whose
/// default preferred time then applies unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<PreferredTime>,
}

impl ApplianceSpec {
    /// Builds a validated [`Appliance`].
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidProfile`] for unknown built-ins and
    /// invalid profiles.
    pub fn to_appliance(&self) -> Result<Appliance, ScheduleError> {
        let (profile, default_preference) = match &self.profile {
            Some(spec) => (
                spec.resolve()
                    .map_err(|reason| ScheduleError::profile(&self.id, reason))?,
                None,
            ),
            None => {
                let builtin = ProfileSpec::Builtin {
                    builtin: self.id.clone(),
                };
                (
                    builtin
                        .resolve()
                        .map_err(|reason| ScheduleError::profile(&self.id, reason))?,
                    catalog::default_preference(&self.id),
                )
            }
        };
        Appliance::new(
            self.id.clone(),
            profile,
            self.preferred_time.or(default_preference),
        )
    }
}
