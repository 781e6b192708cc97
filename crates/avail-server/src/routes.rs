//! The availability endpoint and router.
//!
//! Preserves the consumed REST contract bit-exact:
//!
//! ```text
//! GET /service/{serviceId}/availability
//!   ?timezone=<IANA>&date_forward_start=<int>&date_forward_end=<int>[&client_id=<id>]
//!   Header: X-Company-ID: <tenant id>
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};
use avail_engine::model::ServiceAvailability;
use avail_engine::query::{compute_availability, AvailabilityRequest};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::clock::Clock;
use crate::error::ApiError;
use crate::store::SnapshotStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SnapshotStore>,
    pub clock: Arc<dyn Clock>,
}

/// Raw query parameters; presence and numeric parsing are validated by the
/// handler so that a missing or malformed field produces a contract-level
/// 400 JSON body rather than the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
struct AvailabilityParams {
    timezone: Option<String>,
    date_forward_start: Option<String>,
    date_forward_end: Option<String>,
    client_id: Option<String>,
}

fn parse_offset(raw: Option<String>, name: &str) -> Result<i64, ApiError> {
    let raw = raw
        .ok_or_else(|| ApiError::Validation(format!("{name} query parameter is required")))?;
    raw.parse().map_err(|_| {
        ApiError::Validation(format!("{name} must be an integer day offset, got '{raw}'"))
    })
}

/// Handler for GET /service/:service_id/availability
async fn get_service_availability(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
    Query(params): Query<AvailabilityParams>,
    headers: HeaderMap,
) -> Result<Json<ServiceAvailability>, ApiError> {
    let company_id = headers
        .get("x-company-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("X-Company-ID header is required".to_string()))?;

    let timezone = params
        .timezone
        .filter(|tz| !tz.is_empty())
        .ok_or_else(|| ApiError::Validation("timezone query parameter is required".to_string()))?;
    let date_forward_start = parse_offset(params.date_forward_start, "date_forward_start")?;
    let date_forward_end = parse_offset(params.date_forward_end, "date_forward_end")?;

    tracing::debug!(%service_id, company = %company_id, "availability query");

    let snapshot = state
        .store
        .company(company_id)
        .ok_or_else(|| ApiError::NotFound {
            resource: "Company".to_string(),
            id: company_id.to_string(),
        })?;

    let request = AvailabilityRequest {
        service_id,
        timezone,
        date_forward_start,
        date_forward_end,
        client_id: params.client_id,
    };

    let availability = compute_availability(&request, &snapshot, state.clock.now(), None)?;

    tracing::debug!(
        service = %availability.service_id,
        dates = availability.available_dates.len(),
        "availability computed"
    );
    Ok(Json(availability))
}

/// Build the application router with CORS for browser consumers.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/service/:service_id/availability", get(get_service_availability))
        .layer(cors)
        .with_state(state)
}
