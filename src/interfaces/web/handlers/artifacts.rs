use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::super::AppState;

/// Serve the packaged archive for a completed job. The id is restricted to
/// the UUID alphabet before it touches a filesystem path.
pub(crate) async fn download_endpoint(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    if job_id.is_empty()
        || !job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid job id" })),
        )
            .into_response();
    }

    let archive = state.downloads_dir.join(format!("{job_id}.zip"));
    match tokio::fs::read(&archive).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{job_id}.zip\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Archive not found" })),
        )
            .into_response(),
    }
}
