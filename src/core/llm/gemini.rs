use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationConfig, TextModel};

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiResContent,
}

#[derive(Deserialize)]
struct GeminiResContent {
    parts: Vec<GeminiResPart>,
}

#[derive(Deserialize)]
struct GeminiResPart {
    text: String,
}

/// Thin REST client for the Gemini `generateContent` endpoint. The base URL
/// is injectable so tests can point it at a local stub.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: config,
        };
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let res = self.client.post(&url).json(&req).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            return Err(anyhow!(
                "Gemini API error ({}): {}",
                status,
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: GeminiResponse = res.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("Gemini response contained no candidates"))
    }
}
