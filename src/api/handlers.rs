//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::AppState;
use super::error::ApiError;
use super::types::{
    BriefingResponse, CheckFeasibilityBody, FeasibilityResponse, HealthResponse, RootResponse,
};
use crate::engine::{FacilitySummary, FeasibilityResult, InsightsSnapshot, brief};

/// `GET /` → 200 + liveness message
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Grid feasibility API is running",
    })
}

/// `GET /health` → 200 + dataset counts
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from(state.engine.dataset()))
}

/// Evaluates one request from a JSON body.
///
/// `POST /check-feasibility` → 200 + `FeasibilityResponse`
/// invalid body, coordinate, or power → 400 + `ErrorResponse`
/// no station found → 404 + `ErrorResponse`
pub async fn check_feasibility(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckFeasibilityBody>, JsonRejection>,
) -> Result<Json<FeasibilityResponse>, ApiError> {
    let Json(body) = payload?;
    let result = evaluate(&state, &body).inspect_err(|e| {
        if matches!(e, ApiError::NotFound(_)) {
            state.insights.record_not_found();
        }
    })?;
    state.insights.record(&result);
    Ok(Json(FeasibilityResponse::from(&result)))
}

/// `POST /briefing` → 200 + `BriefingResponse`, errors as `/check-feasibility`
///
/// Not counted in the usage insights; clients call it after a check.
pub async fn briefing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckFeasibilityBody>, JsonRejection>,
) -> Result<Json<BriefingResponse>, ApiError> {
    let Json(body) = payload?;
    let result = evaluate(&state, &body)?;
    Ok(Json(BriefingResponse {
        briefing: brief(&result),
        result: FeasibilityResponse::from(&result),
    }))
}

/// `GET /stations` → 200 + every station with a position
pub async fn stations(State(state): State<Arc<AppState>>) -> Json<Vec<FacilitySummary>> {
    Json(state.engine.list_facilities())
}

/// `GET /insights` → 200 + usage counters
pub async fn insights(State(state): State<Arc<AppState>>) -> Json<InsightsSnapshot> {
    Json(state.insights.snapshot())
}

fn evaluate(state: &AppState, body: &CheckFeasibilityBody) -> Result<FeasibilityResult, ApiError> {
    let request = body.to_request();
    request.validate(&state.service_area)?;
    let locale = body.lang.unwrap_or(state.default_locale);
    Ok(state.engine.evaluate(&request, locale)?)
}
