//! Persisted feedback store consulted during prompt construction.
//!
//! Successes, corrected errors, and standing rules accumulate across jobs in
//! a JSON file; `formatted` renders the most recent entries into a guidance
//! section interpolated into future prompts. This is a side channel only:
//! recording feedback never affects an in-flight job.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuidanceMemory {
    #[serde(default)]
    pub successes: Vec<SuccessEntry>,
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEntry {
    pub pattern: String,
    pub description: String,
    pub recorded: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub pattern: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    pub recorded: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub description: String,
    pub importance: String,
    pub recorded: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct GuidanceStore {
    path: PathBuf,
    memory: Arc<Mutex<GuidanceMemory>>,
}

impl GuidanceStore {
    /// Load the store from `path`, starting empty when the file does not
    /// exist yet.
    pub async fn load(path: PathBuf) -> Result<Self> {
        let memory = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("guidance file {} is corrupt", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => GuidanceMemory::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        Ok(Self {
            path,
            memory: Arc::new(Mutex::new(memory)),
        })
    }

    pub async fn add_success(&self, pattern: &str, description: &str) -> Result<()> {
        let mut memory = self.memory.lock().await;
        memory.successes.push(SuccessEntry {
            pattern: pattern.to_string(),
            description: description.to_string(),
            recorded: Utc::now(),
        });
        self.persist(&memory).await
    }

    pub async fn add_error(
        &self,
        pattern: &str,
        description: &str,
        correction: Option<String>,
    ) -> Result<()> {
        let mut memory = self.memory.lock().await;
        memory.errors.push(ErrorEntry {
            pattern: pattern.to_string(),
            description: description.to_string(),
            correction,
            recorded: Utc::now(),
        });
        self.persist(&memory).await
    }

    pub async fn add_rule(&self, description: &str, importance: &str) -> Result<()> {
        let mut memory = self.memory.lock().await;
        memory.rules.push(RuleEntry {
            description: description.to_string(),
            importance: importance.to_string(),
            recorded: Utc::now(),
        });
        self.persist(&memory).await
    }

    pub async fn snapshot(&self) -> GuidanceMemory {
        self.memory.lock().await.clone()
    }

    /// Render the most recent entries (up to `limit` per category) as the
    /// guidance text injected into prompts. Empty store renders empty.
    pub async fn formatted(&self, limit: usize) -> String {
        let memory = self.memory.lock().await;
        let mut sections = Vec::new();

        if !memory.rules.is_empty() {
            let rules: Vec<String> = memory
                .rules
                .iter()
                .rev()
                .take(limit)
                .map(|r| format!("- [{}] {}", r.importance, r.description))
                .collect();
            sections.push(format!("Rules:\n{}", rules.join("\n")));
        }
        if !memory.errors.is_empty() {
            let errors: Vec<String> = memory
                .errors
                .iter()
                .rev()
                .take(limit)
                .map(|e| match &e.correction {
                    Some(fix) => format!("- Avoid: {} (fix: {fix})", e.description),
                    None => format!("- Avoid: {}", e.description),
                })
                .collect();
            sections.push(format!("Known mistakes to avoid:\n{}", errors.join("\n")));
        }
        if !memory.successes.is_empty() {
            let successes: Vec<String> = memory
                .successes
                .iter()
                .rev()
                .take(limit)
                .map(|s| format!("- {}", s.description))
                .collect();
            sections.push(format!("Patterns that worked well:\n{}", successes.join("\n")));
        }

        sections.join("\n\n")
    }

    async fn persist(&self, memory: &GuidanceMemory) -> Result<()> {
        let raw = serde_json::to_string_pretty(memory)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_survive_a_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("guidance.json");

        let store = GuidanceStore::load(path.clone()).await.unwrap();
        store.add_rule("always use standalone components", "high").await.unwrap();
        store
            .add_error("missing-injectable", "services lacked @Injectable", Some("prepend decorator".to_string()))
            .await
            .unwrap();

        let reloaded = GuidanceStore::load(path).await.unwrap();
        let memory = reloaded.snapshot().await;
        assert_eq!(memory.rules.len(), 1);
        assert_eq!(memory.errors.len(), 1);
        assert_eq!(memory.errors[0].correction.as_deref(), Some("prepend decorator"));
    }

    #[tokio::test]
    async fn formatted_renders_recent_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let store = GuidanceStore::load(tmp.path().join("g.json")).await.unwrap();
        assert_eq!(store.formatted(10).await, "");

        store.add_rule("prefer css variables", "medium").await.unwrap();
        store.add_success("routing", "wildcard fallback route").await.unwrap();
        let text = store.formatted(10).await;
        assert!(text.contains("[medium] prefer css variables"));
        assert!(text.contains("wildcard fallback route"));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_not_silently_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("guidance.json");
        std::fs::write(&path, "not json").unwrap();
        let err = GuidanceStore::load(path).await.unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }
}
