//! Conversion intake. Both endpoints answer 202 with a job id the moment
//! the record exists; the pipeline runs detached and the client polls.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Map, json};
use tracing::{error, info};
use uuid::Uuid;

use super::super::AppState;
use crate::core::input::{self, MAX_DESCRIPTION_LEN};
use crate::core::jobs::InputKind;
use crate::core::pipeline::JobInput;
use crate::core::transcribe;

#[derive(Deserialize)]
pub(crate) struct ConvertRequest {
    #[serde(default)]
    input: String,
}

pub(crate) async fn convert_endpoint(
    State(state): State<AppState>,
    Json(req): Json<ConvertRequest>,
) -> impl IntoResponse {
    let trimmed = req.input.trim();
    let Some(kind) = input::classify(trimmed) else {
        let error = if trimmed.is_empty() {
            "Input is required".to_string()
        } else {
            format!(
                "Input must be a 32-character Figma file key or a description of at most {MAX_DESCRIPTION_LEN} characters"
            )
        };
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": error })));
    };

    let job_input = match kind {
        InputKind::Figma => JobInput::FigmaKey(trimmed.to_string()),
        _ => JobInput::Description(trimmed.to_string()),
    };
    let id = state.store.create(kind, "Job queued", Map::new()).await;
    info!("accepted {kind:?} conversion request as job {id}");
    state.pipeline.spawn(id.clone(), job_input);

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "jobId": id,
            "status": "queued",
            "inputType": kind,
        })),
    )
}

pub(crate) async fn voice_endpoint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut audio: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("audio") => {
                let ext = field
                    .file_name()
                    .and_then(|n| n.rsplit('.').next().map(|e| e.to_string()))
                    .unwrap_or_else(|| "webm".to_string());
                match field.bytes().await {
                    Ok(bytes) => {
                        audio = Some((ext, bytes.to_vec()));
                        break;
                    }
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": format!("failed to read audio field: {e}") })),
                        );
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("invalid multipart body: {e}") })),
                );
            }
        }
    }

    let Some((ext, bytes)) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "An 'audio' file field is required" })),
        );
    };

    let upload_path = state.uploads_dir.join(format!("{}.{ext}", Uuid::new_v4()));
    if let Err(e) = tokio::fs::write(&upload_path, &bytes).await {
        error!("failed to store uploaded audio: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to store uploaded audio" })),
        );
    }

    let transcription = transcribe::transcribe(&state.transcriber_command, &upload_path).await;
    // The upload is consumed either way.
    if let Err(e) = tokio::fs::remove_file(&upload_path).await {
        tracing::warn!("failed to remove upload {}: {e}", upload_path.display());
    }

    let transcription = match transcription {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Transcription produced no text" })),
            );
        }
        Err(e) => {
            error!("transcription failed: {e:#}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Transcription failed" })),
            );
        }
    };

    let mut extras = Map::new();
    extras.insert("transcription".to_string(), json!(transcription));
    let id = state
        .store
        .create(InputKind::Voice, "Job queued", extras)
        .await;
    info!("accepted voice conversion request as job {id}");
    state
        .pipeline
        .spawn(id.clone(), JobInput::Description(transcription.clone()));

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "jobId": id,
            "status": "queued",
            "inputType": InputKind::Voice,
            "transcription": transcription,
        })),
    )
}
