//! Retrying wrapper around a [`TextModel`].
//!
//! Each attempt is one model call plus one extraction pass. Transport
//! failures and extraction failures both consume an attempt (a fresh call
//! may well produce better-formed output), but the two are logged distinctly
//! so telemetry can tell them apart.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::core::FileMap;
use crate::core::error::{ExtractError, GenerateError};
use crate::core::extract;
use crate::core::llm::{GenerationConfig, TextModel};

pub struct ModelGateway {
    model: Arc<dyn TextModel>,
    config: GenerationConfig,
    max_attempts: u32,
    backoff_base: Duration,
}

impl ModelGateway {
    pub fn new(model: Arc<dyn TextModel>, max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            model,
            config: GenerationConfig::default(),
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Generate and extract a JSON value.
    pub async fn generate_json(&self, prompt: &str) -> Result<Value, GenerateError> {
        self.run(prompt, extract::extract_json).await
    }

    /// Generate and extract a file-path-to-content map.
    pub async fn generate_files(&self, prompt: &str) -> Result<FileMap, GenerateError> {
        self.run(prompt, extract::extract_file_map).await
    }

    async fn run<T>(
        &self,
        prompt: &str,
        extract_fn: fn(&str) -> Result<T, ExtractError>,
    ) -> Result<T, GenerateError> {
        let mut last_err: Option<anyhow::Error> = None;

        for attempt in 1..=self.max_attempts {
            match self.model.complete(prompt, &self.config).await {
                Ok(text) => match extract_fn(&text) {
                    Ok(value) => return Ok(value),
                    Err(e) => {
                        warn!(
                            "extraction failed on attempt {attempt}/{}: {e}",
                            self.max_attempts
                        );
                        last_err = Some(e.into());
                    }
                },
                Err(e) => {
                    warn!(
                        "model call failed on attempt {attempt}/{}: {e:#}",
                        self.max_attempts
                    );
                    last_err = Some(e);
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.backoff_base * attempt).await;
            }
        }

        Err(GenerateError {
            attempts: self.max_attempts,
            source: last_err
                .unwrap_or_else(|| anyhow::anyhow!("generation produced no attempts")),
        })
    }
}
