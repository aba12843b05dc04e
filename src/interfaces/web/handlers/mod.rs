pub(crate) mod artifacts;
pub(crate) mod convert;
pub(crate) mod feedback;
pub(crate) mod status;

use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

pub(crate) async fn health_endpoint() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
