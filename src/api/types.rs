//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::appliances::{ApplianceSpec, PreferredTime, catalog};
use crate::engine::{DailySummary, EngineOptions, ProductionSample, Schedule};

/// Body of `POST /schedule`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleRequest {
    /// One UTC day of forecast samples at a uniform interval.
    pub production: Vec<ProductionSample>,
    /// Appliances in placement order.
    pub appliances: Vec<ApplianceSpec>,
    /// Overrides the server's default policy.
    #[serde(default)]
    pub options: Option<EngineOptions>,
}

/// Schedule plus the production summary of the supplied forecast.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule: Schedule,
    pub summary: DailySummary,
}

/// One built-in appliance as listed by `GET /appliances`.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub preferred_time: Option<PreferredTime>,
    pub duration_minutes: i64,
    pub total_wh: f64,
}

impl CatalogEntry {
    /// Every built-in appliance, in catalog order.
    pub fn all() -> Vec<Self> {
        catalog::NAMES
            .iter()
            .filter_map(|&name| {
                catalog::profile(name).map(|profile| Self {
                    name,
                    preferred_time: catalog::default_preference(name),
                    duration_minutes: profile.duration().num_minutes(),
                    total_wh: profile.total_wh(),
                })
            })
            .collect()
    }
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
