// HTTP handlers: version, state/alerts views, configuration calls

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;

use super::AppState;
use crate::error::EngineError;
use crate::models::EngineView;
use crate::version;

/// Engine errors rendered as `{ "error": ..., "kind": ... }`.
pub(super) struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EngineError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            EngineError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult = Result<Json<EngineView>, ApiError>;

/// Numbers and strings are both accepted; everything is validated as text by the engine.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// GET /version - service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(version::BUILD_INFO)
}

/// GET /api/state - consistent copy of the engine state.
pub(super) async fn state_handler(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.engine.view()?))
}

/// GET /api/alerts - full alert log for this run, oldest first.
pub(super) async fn alerts_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.engine.alert_history()?))
}

pub(super) async fn clear_active_handler(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.engine.clear_active_alerts()?))
}

pub(super) async fn pause_handler(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.engine.pause()?))
}

pub(super) async fn resume_handler(State(state): State<AppState>) -> ApiResult {
    Ok(Json(state.engine.resume()?))
}

#[derive(Debug, Deserialize)]
pub(super) struct IntervalBody {
    seconds: Value,
}

/// PUT /api/interval {"seconds": 2.5}
pub(super) async fn interval_handler(
    State(state): State<AppState>,
    Json(body): Json<IntervalBody>,
) -> ApiResult {
    let text = value_as_text(&body.seconds);
    Ok(Json(state.engine.set_interval_secs_str(&text)?))
}

#[derive(Debug, Deserialize)]
pub(super) struct ThresholdBody {
    value: Value,
}

/// PUT /api/thresholds/{metric} {"value": 85}
pub(super) async fn threshold_handler(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Json(body): Json<ThresholdBody>,
) -> ApiResult {
    let text = value_as_text(&body.value);
    Ok(Json(state.engine.set_threshold_named(&metric, &text)?))
}

#[derive(Debug, Deserialize)]
pub(super) struct CapacityBody {
    capacity: Value,
}

/// PUT /api/history-capacity {"capacity": 60}
pub(super) async fn history_capacity_handler(
    State(state): State<AppState>,
    Json(body): Json<CapacityBody>,
) -> ApiResult {
    let text = value_as_text(&body.capacity);
    Ok(Json(state.engine.set_history_capacity_str(&text)?))
}

#[derive(Debug, Deserialize)]
pub(super) struct NetworkSeriesBody {
    sent: bool,
    recv: bool,
}

/// PUT /api/network-series {"sent": true, "recv": false}
pub(super) async fn network_series_handler(
    State(state): State<AppState>,
    Json(body): Json<NetworkSeriesBody>,
) -> ApiResult {
    Ok(Json(
        state
            .engine
            .set_network_series_visibility(body.sent, body.recv)?,
    ))
}
