pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Sampling parameters forwarded verbatim to the model endpoint. Code
/// generation wants near-deterministic output, hence the low temperature.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 8192,
            top_k: 40,
            top_p: 0.8,
        }
    }
}

/// A single-shot text completion endpoint. Implementations are not expected
/// to be deterministic: two calls with the same prompt may produce different
/// output, which is exactly why the gateway retries extraction failures.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}
