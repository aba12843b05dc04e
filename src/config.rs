use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read once at startup from `UIFORGE_*` environment
/// variables. Every field has a sensible local-dev default; the two API
/// credentials default to empty strings and surface as upstream auth errors
/// the first time they are used.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub figma_base_url: String,
    pub figma_token: String,
    pub data_dir: PathBuf,
    pub transcriber_command: String,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub cleanup_after: Duration,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_host: env_or("UIFORGE_HOST", "127.0.0.1"),
            api_port: env_parse("UIFORGE_PORT", 4700),
            gemini_base_url: env_or(
                "UIFORGE_GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            gemini_api_key: env_or("UIFORGE_GEMINI_API_KEY", ""),
            gemini_model: env_or("UIFORGE_GEMINI_MODEL", "gemini-2.0-flash"),
            figma_base_url: env_or("UIFORGE_FIGMA_BASE_URL", "https://api.figma.com/v1"),
            figma_token: env_or("UIFORGE_FIGMA_TOKEN", ""),
            data_dir: PathBuf::from(env_or("UIFORGE_DATA_DIR", "data")),
            transcriber_command: env_or("UIFORGE_TRANSCRIBER", "transcribe"),
            max_attempts: env_parse("UIFORGE_MAX_ATTEMPTS", 3),
            backoff_base: Duration::from_millis(env_parse("UIFORGE_BACKOFF_MS", 1000)),
            cleanup_after: Duration::from_secs(env_parse("UIFORGE_JOB_TTL_SECS", 2 * 60 * 60)),
        }
    }

    pub fn workspaces_dir(&self) -> PathBuf {
        self.data_dir.join("workspaces")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.data_dir.join("downloads")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn guidance_path(&self) -> PathBuf {
        self.data_dir.join("guidance.json")
    }
}
