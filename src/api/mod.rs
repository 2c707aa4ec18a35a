//! REST API for on-demand scheduling.
//!
//! Provides two endpoints:
//! - `POST /schedule`: schedule appliances against a supplied forecast
//! - `GET /appliances`: built-in appliance catalog

mod handlers;
mod types;

pub use types::{CatalogEntry, ErrorResponse, ScheduleRequest, ScheduleResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::engine::EngineOptions;

/// Immutable application state shared across all request handlers.
///
/// Scheduling is stateless, so no locks are needed.
pub struct AppState {
    /// Policy applied when a request carries no `options`.
    pub options: EngineOptions,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/schedule", post(handlers::post_schedule))
        .route("/appliances", get(handlers::get_appliances))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
