//! The per-job conversion pipeline.
//!
//! One run per job, spawned fire-and-forget by the request handlers after the
//! job record already exists. Steps execute strictly sequentially; progress
//! milestones are advisory. Any step error is caught at the run boundary,
//! recorded verbatim on the job record, and never crosses into another job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::core::design;
use crate::core::extract;
use crate::core::figma::FigmaClient;
use crate::core::gateway::ModelGateway;
use crate::core::guidance::GuidanceStore;
use crate::core::jobs::{JobStatus, JobStore};
use crate::core::patch;
use crate::core::prompts;
use crate::core::workspace;

/// What the pipeline receives after input classification. Voice input has
/// already been transcribed by the time a job exists, so it arrives here as
/// a description.
#[derive(Debug, Clone)]
pub enum JobInput {
    FigmaKey(String),
    Description(String),
}

pub struct Pipeline {
    store: JobStore,
    gateway: ModelGateway,
    figma: FigmaClient,
    guidance: GuidanceStore,
    workspaces_dir: PathBuf,
    downloads_dir: PathBuf,
    cleanup_after: Duration,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: JobStore,
        gateway: ModelGateway,
        figma: FigmaClient,
        guidance: GuidanceStore,
        workspaces_dir: PathBuf,
        downloads_dir: PathBuf,
        cleanup_after: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            figma,
            guidance,
            workspaces_dir,
            downloads_dir,
            cleanup_after,
        }
    }

    /// Kick off a run on the shared runtime. The handler has already
    /// answered 202; nothing awaits this task.
    pub fn spawn(self: &Arc<Self>, job_id: String, input: JobInput) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.run(job_id, input).await;
        });
    }

    /// Execute one job to completion. Errors become a `failed` record plus a
    /// best-effort workspace sweep; failed records expire on the same TTL as
    /// completed ones so the job map never grows without bound.
    pub async fn run(&self, job_id: String, input: JobInput) {
        let workdir = self.workspaces_dir.join(&job_id);
        if let Err(err) = self.run_inner(&job_id, &workdir, input).await {
            error!("job {job_id} failed: {err:#}");
            self.store
                .update(
                    &job_id,
                    JobStatus::Failed,
                    0,
                    &format!("Conversion failed: {err:#}"),
                    Map::new(),
                )
                .await;
            workspace::remove_best_effort(&workdir).await;
            self.store
                .schedule_removal(job_id, self.cleanup_after, Vec::new());
        }
    }

    async fn run_inner(&self, job_id: &str, workdir: &Path, input: JobInput) -> Result<()> {
        tokio::fs::create_dir_all(workdir)
            .await
            .with_context(|| format!("failed to create workspace {}", workdir.display()))?;

        let stage_message = match &input {
            JobInput::FigmaKey(_) => "Fetching Figma design data",
            JobInput::Description(_) => "Generating design from description",
        };
        self.store
            .update(job_id, JobStatus::Processing, 10, stage_message, Map::new())
            .await;

        let guidance = self.guidance.formatted(10).await;

        let design: Value = match input {
            JobInput::FigmaKey(key) => {
                let document = self.figma.fetch_file(&key).await?;
                serde_json::to_value(design::from_figma_document(&document))?
            }
            JobInput::Description(text) => {
                let prompt = prompts::design_from_text(&text, &guidance);
                let structure = self.gateway.generate_json(&prompt).await?;
                extract::require_key(&structure, "components")?;
                structure
            }
        };

        let design_json = serde_json::to_string_pretty(&design)?;
        tokio::fs::write(workdir.join("design-structure.json"), &design_json)
            .await
            .context("failed to write design-structure.json")?;

        self.store
            .update(
                job_id,
                JobStatus::Processing,
                30,
                "Generating application code from design",
                Map::new(),
            )
            .await;
        let prompt = prompts::code_from_design(&design_json, &guidance);
        let mut files = self.gateway.generate_files(&prompt).await?;

        self.store
            .update(
                job_id,
                JobStatus::Processing,
                45,
                "Applying repair rules to generated files",
                Map::new(),
            )
            .await;
        patch::apply_all(&mut files);

        self.store
            .update(
                job_id,
                JobStatus::Processing,
                50,
                "Materializing project files",
                Map::new(),
            )
            .await;
        workspace::materialize(&files, workdir).await?;
        workspace::verify_required(workdir).await?;

        self.store
            .update(
                job_id,
                JobStatus::Processing,
                80,
                "Packaging project archive",
                Map::new(),
            )
            .await;
        let archive = self.downloads_dir.join(format!("{job_id}.zip"));
        {
            let workdir = workdir.to_path_buf();
            let archive = archive.clone();
            tokio::task::spawn_blocking(move || workspace::package_zip(&workdir, &archive))
                .await
                .context("archive task aborted")??;
        }

        let mut extras = Map::new();
        extras.insert("downloadUrl".to_string(), json!(format!("/api/download/{job_id}")));
        extras.insert(
            "previewUrl".to_string(),
            json!(format!("/previews/{job_id}/src/index.html")),
        );
        extras.insert("projectPath".to_string(), json!(workdir.display().to_string()));
        self.store
            .update(
                job_id,
                JobStatus::Completed,
                100,
                "Project files generated successfully",
                extras,
            )
            .await;

        self.store.schedule_removal(
            job_id.to_string(),
            self.cleanup_after,
            vec![workdir.to_path_buf(), archive],
        );
        Ok(())
    }
}
