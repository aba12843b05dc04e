mod handlers;
mod router;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::core::guidance::GuidanceStore;
use crate::core::jobs::JobStore;
use crate::core::pipeline::Pipeline;

pub struct ApiServer {
    addr: String,
    state: AppState,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: JobStore,
    pub(crate) pipeline: Arc<Pipeline>,
    pub(crate) guidance: GuidanceStore,
    pub(crate) workspaces_dir: PathBuf,
    pub(crate) downloads_dir: PathBuf,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) transcriber_command: String,
}

impl ApiServer {
    pub fn new(
        config: &Config,
        store: JobStore,
        pipeline: Arc<Pipeline>,
        guidance: GuidanceStore,
    ) -> Self {
        Self {
            addr: format!("{}:{}", config.api_host, config.api_port),
            state: AppState {
                store,
                pipeline,
                guidance,
                workspaces_dir: config.workspaces_dir(),
                downloads_dir: config.downloads_dir(),
                uploads_dir: config.uploads_dir(),
                transcriber_command: config.transcriber_command.clone(),
            },
        }
    }

    pub async fn serve(self) -> Result<()> {
        let app = router::build_api_router(self.state);
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .with_context(|| format!("failed to bind {}", self.addr))?;
        info!("API Server running at http://{}", self.addr);
        axum::serve(listener, app)
            .await
            .context("API Server crashed")
    }
}
