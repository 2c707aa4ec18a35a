use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Preferred time of day for running an appliance.
///
/// Each tag maps to a fixed hour range `[start, end)` of the forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredTime {
    /// 06:00 to 13:00.
    Morning,
    /// 13:00 to 20:00.
    Afternoon,
    /// 20:00 to midnight.
    Evening,
    /// 06:00 to midnight.
    #[default]
    Anytime,
}

impl PreferredTime {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Anytime];

    /// Hour range `[start, end)` as hours after midnight.
    pub fn hours(self) -> (i64, i64) {
        match self {
            Self::Morning => (6, 13),
            Self::Afternoon => (13, 20),
            Self::Evening => (20, 24),
            Self::Anytime => (6, 24),
        }
    }

    /// The hour range resolved against the midnight of a forecast day.
    pub fn bounds(self, day_start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let (start, end) = self.hours();
        (
            day_start + TimeDelta::hours(start),
            day_start + TimeDelta::hours(end),
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Anytime => "anytime",
        }
    }
}

impl fmt::Display for PreferredTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!("unknown time of day \"{s}\", expected morning, afternoon, evening or anytime")
            })
    }
}
