use crate::infra::{evaluate_scenario, parse_carrier, AppState, CommissionState};
use agency_commissions::commissions::scenario::{Scenario, ScenarioReport};
use agency_commissions::error::AppError;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluateQuery {
    /// Restrict evaluation to one validating carrier.
    #[serde(default)]
    pub(crate) carrier: Option<String>,
}

pub(crate) fn with_commission_routes(state: CommissionState) -> Router {
    Router::new()
        .route("/api/v1/commissions/evaluate", post(evaluate_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    State(state): State<CommissionState>,
    Query(query): Query<EvaluateQuery>,
    Json(scenario): Json<Scenario>,
) -> Result<Json<ScenarioReport>, AppError> {
    let carrier = query
        .carrier
        .as_deref()
        .map(parse_carrier)
        .transpose()
        .map_err(AppError::InvalidRequest)?;

    let config = state.engine.as_ref().clone();
    let report = evaluate_scenario(scenario, carrier.as_deref(), config)?;
    Ok(Json(report))
}
