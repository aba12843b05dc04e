//! Feedback intake feeding the guidance store. Feedback is tied to an
//! existing job id purely as a validity check; it never mutates the job.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::super::AppState;

#[derive(Deserialize)]
pub(crate) struct FeedbackRequest {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    pattern: Option<String>,
    description: String,
    #[serde(default)]
    correction: Option<String>,
    #[serde(default)]
    importance: Option<String>,
}

pub(crate) async fn feedback_endpoint(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> impl IntoResponse {
    if !state.store.contains(&job_id).await {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Job not found" })),
        );
    }
    if req.description.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "A description is required" })),
        );
    }

    let pattern = req.pattern.as_deref().unwrap_or("manual-feedback");
    let result = match req.kind.as_str() {
        "success" => state.guidance.add_success(pattern, &req.description).await,
        "error" => {
            state
                .guidance
                .add_error(pattern, &req.description, req.correction.clone())
                .await
        }
        "rule" => {
            let importance = req.importance.as_deref().unwrap_or("medium");
            state.guidance.add_rule(&req.description, importance).await
        }
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Unknown feedback type '{other}', expected success, error, or rule")
                })),
            );
        }
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "recorded" }))),
        Err(e) => {
            error!("failed to persist feedback for job {job_id}: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to persist feedback" })),
            )
        }
    }
}

/// Expose the accumulated guidance, both raw and as the rendered text that
/// gets interpolated into prompts.
pub(crate) async fn guidance_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let memory = state.guidance.snapshot().await;
    let formatted = state.guidance.formatted(10).await;
    Json(json!({
        "memory": memory,
        "formatted": formatted,
    }))
}
