mod config;
mod core;
mod interfaces;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::core::figma::FigmaClient;
use crate::core::gateway::ModelGateway;
use crate::core::guidance::GuidanceStore;
use crate::core::jobs::JobStore;
use crate::core::llm::TextModel;
use crate::core::llm::gemini::GeminiClient;
use crate::core::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("uiforge failed to start: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let config = config::Config::from_env();

    for dir in [
        config.workspaces_dir(),
        config.downloads_dir(),
        config.uploads_dir(),
    ] {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    info!("Data directory initialized at {}", config.data_dir.display());

    let store = JobStore::new();
    let guidance = GuidanceStore::load(config.guidance_path()).await?;
    let model: Arc<dyn TextModel> = Arc::new(GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_api_key,
        &config.gemini_model,
    ));
    let gateway = ModelGateway::new(model, config.max_attempts, config.backoff_base);
    let figma = FigmaClient::new(&config.figma_base_url, &config.figma_token);
    let pipeline = Arc::new(Pipeline::new(
        store.clone(),
        gateway,
        figma,
        guidance.clone(),
        config.workspaces_dir(),
        config.downloads_dir(),
        config.cleanup_after,
    ));

    interfaces::web::ApiServer::new(&config, store, pipeline, guidance)
        .serve()
        .await
}
