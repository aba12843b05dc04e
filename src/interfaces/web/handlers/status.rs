use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use super::super::AppState;

/// Poll endpoint. Returns the full record; completed and failed jobs stay
/// visible until the scheduled sweep removes them.
pub(crate) async fn status_endpoint(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&job_id).await {
        Some(record) => (StatusCode::OK, Json(json!(record))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Job not found" })),
        ),
    }
}
