//! In-memory job tracking for the conversion pipeline.
//!
//! The store is an injected, cloneable handle around a mutex-guarded map.
//! The pipeline writes, status polling reads, and every mutation happens
//! under the lock so readers never observe a partially-updated record.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Figma,
    Text,
    Voice,
}

/// One in-flight or completed conversion request. `extras` is an open-ended
/// merge target (download/preview URLs, transcription text) flattened into
/// the record on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(rename = "inputType")]
    pub input: InputKind,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

#[derive(Clone)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<String, JobRecord>>>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert a fresh record (status `queued`, progress 0) and return its id.
    pub async fn create(&self, input: InputKind, message: &str, extras: Map<String, Value>) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = JobRecord {
            id: id.clone(),
            status: JobStatus::Queued,
            progress: 0,
            message: message.to_string(),
            created: now,
            updated: now,
            input,
            extras,
        };
        self.jobs.lock().await.insert(id.clone(), record);
        info!("[job {id}] queued (0%): {message}");
        id
    }

    /// Merge-update an existing record. Scalar fields are replaced, extras
    /// are merged additively. Unknown ids log a warning and no-op.
    pub async fn update(
        &self,
        id: &str,
        status: JobStatus,
        progress: u8,
        message: &str,
        extras: Map<String, Value>,
    ) {
        let mut jobs = self.jobs.lock().await;
        let Some(record) = jobs.get_mut(id) else {
            warn!("job {id} not found in store, dropping update");
            return;
        };
        record.status = status;
        record.progress = progress;
        record.message = message.to_string();
        record.updated = Utc::now();
        record.extras.extend(extras);
        info!("[job {id}] {status:?} ({progress}%): {message}");
        if matches!(status, JobStatus::Completed | JobStatus::Failed) {
            let elapsed = record.updated - record.created;
            info!("[job {id}] finished after {}s", elapsed.num_seconds());
        }
    }

    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        self.jobs.lock().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.jobs.lock().await.contains_key(id)
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.jobs.lock().await.remove(id).is_some()
    }

    /// Drop the record and its on-disk artifacts after `delay`. Registered
    /// against the store so tests can drive it with a paused clock; removal
    /// failures are logged, never escalated. A poll after the sweep sees
    /// "not found".
    pub fn schedule_removal(&self, id: String, delay: Duration, artifacts: Vec<PathBuf>) {
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.remove(&id).await {
                info!("[job {id}] record expired and removed");
            }
            for path in artifacts {
                let result = match tokio::fs::metadata(&path).await {
                    Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(&path).await,
                    Ok(_) => tokio::fs::remove_file(&path).await,
                    Err(_) => continue,
                };
                if let Err(e) = result {
                    warn!("[job {id}] failed to remove artifact {}: {e}", path.display());
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extras(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn create_then_get_returns_queued_record() {
        let store = JobStore::new();
        let id = store.create(InputKind::Text, "Job queued", Map::new()).await;
        let record = store.get(&id).await.expect("record should exist");
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.progress, 0);
        assert_eq!(record.input, InputKind::Text);
        assert_eq!(record.created, record.updated);
    }

    #[tokio::test]
    async fn update_on_unknown_id_is_a_noop() {
        let store = JobStore::new();
        store
            .update("missing", JobStatus::Processing, 50, "ignored", Map::new())
            .await;
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn update_merges_extras_instead_of_replacing() {
        let store = JobStore::new();
        let id = store.create(InputKind::Figma, "Job queued", Map::new()).await;
        store
            .update(
                &id,
                JobStatus::Completed,
                100,
                "done",
                extras(&[("downloadUrl", json!("/api/download/x"))]),
            )
            .await;
        // A later progress-only update must preserve downloadUrl.
        store
            .update(&id, JobStatus::Completed, 100, "still done", Map::new())
            .await;
        let record = store.get(&id).await.unwrap();
        assert_eq!(record.extras["downloadUrl"], json!("/api/download/x"));
        assert_eq!(record.message, "still done");
    }

    #[tokio::test]
    async fn record_serializes_with_flattened_extras_and_lowercase_status() {
        let store = JobStore::new();
        let id = store
            .create(
                InputKind::Voice,
                "Job queued",
                extras(&[("transcription", json!("a login page"))]),
            )
            .await;
        let record = store.get(&id).await.unwrap();
        let wire = serde_json::to_value(&record).unwrap();
        assert_eq!(wire["status"], json!("queued"));
        assert_eq!(wire["inputType"], json!("voice"));
        assert_eq!(wire["transcription"], json!("a login page"));
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_removal_fires_after_the_delay() {
        let store = JobStore::new();
        let id = store.create(InputKind::Text, "Job queued", Map::new()).await;
        store.schedule_removal(id.clone(), Duration::from_secs(3600), Vec::new());
        // Poll the sweep task so its timer registers before the clock moves.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(store.get(&id).await.is_some());

        tokio::time::advance(Duration::from_secs(3601)).await;
        // Let the sweep task run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(store.get(&id).await.is_none());
    }
}
