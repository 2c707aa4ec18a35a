//! Scheduling result: one outcome per requested appliance.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Reported for an appliance when no window qualifies. A normal result,
/// not a failure.
pub const NO_FEASIBLE_WINDOW: &str = "No optimal time found within solar production constraints.";

/// Display and wire format of start times.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Serializes a timestamp with [`TIME_FORMAT`].
pub(crate) fn serialize_time<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&t.format(TIME_FORMAT))
}

/// Result for a single appliance.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The best start time.
    Start(DateTime<Utc>),
    /// Feasible start times, best first.
    Ranked(Vec<DateTime<Utc>>),
    /// No window satisfied the constraints.
    NoFeasibleWindow,
}

impl Outcome {
    /// The chosen (or top-ranked) start time.
    pub fn best(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Start(t) => Some(*t),
            Self::Ranked(ts) => ts.first().copied(),
            Self::NoFeasibleWindow => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.best().is_some()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Self::Ranked(ts) => {
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", t.format(TIME_FORMAT))?;
                }
                Ok(())
            }
            Self::NoFeasibleWindow => f.write_str(NO_FEASIBLE_WINDOW),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Start(t) => serialize_time(t, serializer),
            Self::Ranked(ts) => {
                let mut seq = serializer.serialize_seq(Some(ts.len()))?;
                for t in ts {
                    seq.serialize_element(&t.format(TIME_FORMAT).to_string())?;
                }
                seq.end()
            }
            Self::NoFeasibleWindow => serializer.serialize_str(NO_FEASIBLE_WINDOW),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub appliance_id: String,
    pub outcome: Outcome,
}

/// Per-appliance outcomes in request order.
///
/// Serializes as a map from appliance id to a time string, a list of time
/// strings, or [`NO_FEASIBLE_WINDOW`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub(crate) fn push(&mut self, appliance_id: impl Into<String>, outcome: Outcome) {
        self.entries.push(ScheduleEntry {
            appliance_id: appliance_id.into(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn get(&self, appliance_id: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|e| e.appliance_id == appliance_id)
            .map(|e| &e.outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for e in &self.entries {
            map.serialize_entry(&e.appliance_id, &e.outcome)?;
        }
        map.end()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            writeln!(f, "{}: {}", e.appliance_id, e.outcome)?;
        }
        Ok(())
    }
}
