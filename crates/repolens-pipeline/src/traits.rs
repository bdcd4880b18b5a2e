//! Seams between the ingestion logic and the services it drives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_core::{AnalysisResult, Candidate, NewProfile};
use repolens_db::ProfileRow;

use crate::error::PipelineError;

/// Persistent profile storage.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Whether a profile for `owner/name` is already stored.
    async fn exists(&self, repo_full_name: &str) -> Result<bool, PipelineError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ProfileRow>, PipelineError>;

    /// Stores a batch atomically, skipping names that already exist. Returns
    /// the number of rows written.
    async fn insert_batch(&self, profiles: &[NewProfile]) -> Result<u64, PipelineError>;

    async fn update_image_url(&self, id: i64, image_url: &str) -> Result<(), PipelineError>;

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, PipelineError>;
}

/// Repository discovery and README retrieval.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn search(&self, topic: &str, page: u32) -> Result<Vec<Candidate>, PipelineError>;

    /// `Ok(None)` when the repository has no readable README.
    async fn readme(&self, owner: &str, name: &str) -> Result<Option<String>, PipelineError>;
}

/// README analysis by a language model.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn analyze(&self, readme: &str) -> Result<Option<AnalysisResult>, PipelineError>;
}

/// Text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Whether generation can be attempted at all.
    fn is_available(&self) -> bool;

    /// Returns the URL of the generated image.
    async fn generate(&self, positive: &str, negative: &str) -> Result<String, PipelineError>;
}
