use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::Value;

/// Design-source client for the Figma file API. The core only needs a
/// success/failure signal plus the opaque node tree; the document itself is
/// handed to [`crate::core::design`] for traversal.
pub struct FigmaClient {
    base_url: String,
    token: String,
    client: Client,
}

impl FigmaClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// `GET /files/{key}` with the auth header, yielding the raw document
    /// tree. Error envelopes are folded into the message.
    pub async fn fetch_file(&self, key: &str) -> Result<Value> {
        let url = format!("{}/files/{}", self.base_url, key);
        let res = self
            .client
            .get(&url)
            .header("X-Figma-Token", &self.token)
            .send()
            .await
            .context("Figma request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let body: Value = res.json().await.unwrap_or(Value::Null);
            let detail = body
                .get("err")
                .or_else(|| body.get("status"))
                .map(|v| v.to_string())
                .unwrap_or_else(|| status.to_string());
            return Err(anyhow!("Figma API error: {detail}"));
        }

        res.json().await.context("Figma response was not valid JSON")
    }
}
