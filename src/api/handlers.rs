//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, warn};

use super::AppState;
use super::types::{CatalogEntry, ErrorResponse, ScheduleRequest, ScheduleResponse};
use crate::appliances::Appliance;
use crate::engine::{DailySummary, ProductionSeries, ScheduleCoordinator};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn unprocessable(error: impl ToString) -> ApiError {
    let error = error.to_string();
    warn!(%error, "rejected schedule request");
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse { error }))
}

/// Schedules the requested appliances against the supplied forecast.
///
/// `POST /schedule` → 200 + `ScheduleResponse` JSON
/// Invalid series, profile, or options → 422 + `ErrorResponse`
pub async fn post_schedule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let options = req.options.unwrap_or(state.options);
    if options.top_n == Some(0) {
        return Err(unprocessable("options.top_n must be > 0"));
    }
    if req.appliances.is_empty() {
        return Err(unprocessable("appliances must not be empty"));
    }

    let series = ProductionSeries::new(req.production).map_err(unprocessable)?;
    let appliances = req
        .appliances
        .iter()
        .map(|spec| spec.to_appliance())
        .collect::<Result<Vec<Appliance>, _>>()
        .map_err(unprocessable)?;
    debug!(appliances = appliances.len(), samples = series.len(), "schedule request");

    let schedule = ScheduleCoordinator::new(options)
        .schedule(&series, &appliances)
        .map_err(unprocessable)?;

    Ok(Json(ScheduleResponse {
        schedule,
        summary: DailySummary::from_series(&series),
    }))
}

/// Lists the built-in appliances.
///
/// `GET /appliances` → 200 + `Vec<CatalogEntry>` JSON
pub async fn get_appliances() -> Json<Vec<CatalogEntry>> {
    Json(CatalogEntry::all())
}
