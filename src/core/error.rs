use thiserror::Error;

/// How much of the offending raw model output is kept for diagnostics.
const SNIPPET_LEN: usize = 200;

/// Failures of the best-effort structured-text extraction layer. A successful
/// extraction means "plausible", not "valid"; downstream consumers re-check
/// the fields they need.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object could be recovered from model output: {snippet:?}")]
    NoJson { snippet: String },

    #[error("no file blocks found in model output: {snippet:?}")]
    NoFiles { snippet: String },

    #[error("extracted structure is missing required key '{key}'")]
    MissingKey { key: &'static str },
}

impl ExtractError {
    pub fn no_json(raw: &str) -> Self {
        Self::NoJson {
            snippet: snippet(raw),
        }
    }

    pub fn no_files(raw: &str) -> Self {
        Self::NoFiles {
            snippet: snippet(raw),
        }
    }
}

fn snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SNIPPET_LEN).collect();
        format!("{cut}…")
    }
}

/// Terminal failure of a model-generation request after the retry budget is
/// exhausted. Wraps whichever error the final attempt produced, transport or
/// extraction alike.
#[derive(Debug, Error)]
#[error("generation failed after {attempts} attempts: {source:#}")]
pub struct GenerateError {
    pub attempts: u32,
    #[source]
    pub source: anyhow::Error,
}
