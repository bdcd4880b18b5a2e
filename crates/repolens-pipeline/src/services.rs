//! Wiring of the real clients shared by the server and the CLI.

use std::path::Path;
use std::sync::Arc;

use repolens_comfy::{ComfyClient, WorkflowTemplate};
use repolens_core::AppConfig;
use repolens_github::GithubClient;
use repolens_ollama::OllamaClient;
use sqlx::PgPool;

use crate::error::PipelineError;
use crate::ingest::Ingestor;
use crate::retention::RetentionSweeper;

/// The ingestion engine and retention sweeper built from one configuration.
#[derive(Clone)]
pub struct Services {
    pub ingestor: Arc<Ingestor>,
    pub sweeper: Arc<RetentionSweeper>,
}

impl Services {
    /// Builds every client from `config`, sharing `pool` as the profile store.
    ///
    /// A workflow template that fails to load is logged; the services still
    /// start and image generation reports itself unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a client cannot be constructed, e.g. for
    /// a malformed base URL.
    pub fn from_config(config: &AppConfig, pool: PgPool) -> Result<Self, PipelineError> {
        let source = GithubClient::with_base_url(
            config.github_token.as_deref(),
            config.http_timeout_secs,
            &config.github_api_url,
        )?;
        let summarizer = OllamaClient::new(&config.ollama_url, &config.ollama_model)?;
        let images = ComfyClient::new(
            &config.comfyui_url,
            load_workflow(&config.comfyui_workflow_path),
        )?;

        let store = Arc::new(pool);
        let ingestor = Ingestor::new(
            store.clone(),
            Arc::new(source),
            Arc::new(summarizer),
            Arc::new(images),
        );
        let sweeper = RetentionSweeper::new(store, config.retention_days);

        Ok(Self {
            ingestor: Arc::new(ingestor),
            sweeper: Arc::new(sweeper),
        })
    }
}

/// Loads the image workflow, logging instead of failing when it is unusable.
#[must_use]
pub fn load_workflow(path: &Path) -> Option<WorkflowTemplate> {
    match WorkflowTemplate::load(path) {
        Ok(template) => {
            tracing::info!(path = %path.display(), "image workflow loaded");
            Some(template)
        }
        Err(e) => {
            tracing::error!(error = %e, "image workflow not loaded; image generation disabled");
            None
        }
    }
}
