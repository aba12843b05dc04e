use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::AppState;
use super::handlers::{self, artifacts, convert, feedback, status};

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://127.0.0.1:4200",
        "http://localhost:4200",
        "http://127.0.0.1:4700",
        "http://localhost:4700",
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState) -> Router {
    let previews = ServeDir::new(&state.workspaces_dir);

    Router::new()
        .route("/health", get(handlers::health_endpoint))
        .route("/api/convert", post(convert::convert_endpoint))
        .route(
            "/api/convert/voice",
            post(convert::voice_endpoint).layer(DefaultBodyLimit::max(25 * 1024 * 1024)),
        )
        .route("/api/status/{job_id}", get(status::status_endpoint))
        .route("/api/feedback/{job_id}", post(feedback::feedback_endpoint))
        .route("/api/guidance", get(feedback::guidance_endpoint))
        .route("/api/download/{job_id}", get(artifacts::download_endpoint))
        .nest_service("/previews", previews)
        .layer(build_localhost_cors())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Map, Value, json};
    use tower::util::ServiceExt;

    use crate::core::figma::FigmaClient;
    use crate::core::gateway::ModelGateway;
    use crate::core::guidance::GuidanceStore;
    use crate::core::jobs::{InputKind, JobStore};
    use crate::core::llm::{GenerationConfig, TextModel};
    use crate::core::pipeline::Pipeline;

    struct SilentModel;

    #[async_trait]
    impl TextModel for SilentModel {
        async fn complete(&self, _prompt: &str, _config: &GenerationConfig) -> anyhow::Result<String> {
            Err(anyhow!("no model in router tests"))
        }
    }

    async fn test_state(root: &std::path::Path) -> AppState {
        let store = JobStore::new();
        let guidance = GuidanceStore::load(root.join("guidance.json")).await.unwrap();
        let gateway = ModelGateway::new(Arc::new(SilentModel), 1, Duration::ZERO);
        let figma = FigmaClient::new("http://127.0.0.1:1", "unused");
        let workspaces = root.join("workspaces");
        let downloads = root.join("downloads");
        let uploads = root.join("uploads");
        for dir in [&workspaces, &downloads, &uploads] {
            std::fs::create_dir_all(dir).unwrap();
        }
        let pipeline = Arc::new(Pipeline::new(
            store.clone(),
            gateway,
            figma,
            guidance.clone(),
            workspaces.clone(),
            downloads.clone(),
            Duration::from_secs(7200),
        ));
        AppState {
            store,
            pipeline,
            guidance,
            workspaces_dir: workspaces,
            downloads_dir: downloads,
            uploads_dir: uploads,
            transcriber_command: "false".to_string(),
        }
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_api_router(test_state(tmp.path()).await);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], json!("healthy"));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_creating_a_job() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path()).await;
        let app = build_api_router(state.clone());
        let response = app
            .oneshot(json_request("/api/convert", json!({ "input": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            json!("Input is required")
        );
    }

    #[tokio::test]
    async fn text_input_is_accepted_with_a_pollable_job() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path()).await;
        let app = build_api_router(state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                "/api/convert",
                json!({ "input": "a login page with a sidebar" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        assert_eq!(body["status"], json!("queued"));
        assert_eq!(body["inputType"], json!("text"));

        let job_id = body["jobId"].as_str().unwrap().to_string();
        let record = state.store.get(&job_id).await.expect("job should exist");
        assert_eq!(record.input, InputKind::Text);

        let response = app
            .oneshot(
                Request::get(format!("/api/status/{job_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn figma_key_input_is_classified_as_figma() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path()).await;
        let app = build_api_router(state);
        let response = app
            .oneshot(json_request(
                "/api/convert",
                json!({ "input": "aB3dEfGh1jKlMnOpQrStUvWxYz012345" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_json(response).await["inputType"], json!("figma"));
    }

    #[tokio::test]
    async fn unknown_job_status_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_api_router(test_state(tmp.path()).await);
        let response = app
            .oneshot(
                Request::get("/api/status/no-such-job")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn feedback_requires_an_existing_job() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_api_router(test_state(tmp.path()).await);
        let response = app
            .oneshot(json_request(
                "/api/feedback/no-such-job",
                json!({ "type": "rule", "description": "prefer css variables" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn feedback_lands_in_the_guidance_store() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path()).await;
        let id = state
            .store
            .create(InputKind::Text, "Job queued", Map::new())
            .await;
        let app = build_api_router(state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                &format!("/api/feedback/{id}"),
                json!({ "type": "rule", "description": "always use standalone components", "importance": "high" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/guidance").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(
            body["formatted"]
                .as_str()
                .unwrap()
                .contains("always use standalone components")
        );
    }

    #[tokio::test]
    async fn download_rejects_path_traversal_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_api_router(test_state(tmp.path()).await);
        let response = app
            .oneshot(
                Request::get("/api/download/..%2Fsecret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn download_serves_an_existing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path()).await;
        std::fs::write(state.downloads_dir.join("abc-123.zip"), b"PK").unwrap();
        let app = build_api_router(state);

        let response = app
            .oneshot(
                Request::get("/api/download/abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/zip")
        );

        let missing = build_api_router(test_state(tmp.path()).await)
            .oneshot(
                Request::get("/api/download/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
