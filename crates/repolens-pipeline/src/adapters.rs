//! Trait implementations backed by the real clients and the Postgres pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_comfy::ComfyClient;
use repolens_core::{AnalysisResult, Candidate, NewProfile};
use repolens_db::ProfileRow;
use repolens_github::GithubClient;
use repolens_ollama::OllamaClient;
use sqlx::PgPool;

use crate::error::PipelineError;
use crate::traits::{ImageGenerator, ProfileStore, RepoSource, Summarizer};

#[async_trait]
impl ProfileStore for PgPool {
    async fn exists(&self, repo_full_name: &str) -> Result<bool, PipelineError> {
        Ok(repolens_db::get_profile_by_full_name(self, repo_full_name)
            .await?
            .is_some())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProfileRow>, PipelineError> {
        Ok(repolens_db::get_profile(self, id).await?)
    }

    async fn insert_batch(&self, profiles: &[NewProfile]) -> Result<u64, PipelineError> {
        Ok(repolens_db::insert_profiles(self, profiles).await?)
    }

    async fn update_image_url(&self, id: i64, image_url: &str) -> Result<(), PipelineError> {
        Ok(repolens_db::update_profile_image_url(self, id, image_url).await?)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, PipelineError> {
        Ok(repolens_db::delete_profiles_created_before(self, cutoff).await?)
    }
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn search(&self, topic: &str, page: u32) -> Result<Vec<Candidate>, PipelineError> {
        Ok(self.search_repositories(topic, page).await?)
    }

    async fn readme(&self, owner: &str, name: &str) -> Result<Option<String>, PipelineError> {
        Ok(self.fetch_readme(owner, name).await?)
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn analyze(&self, readme: &str) -> Result<Option<AnalysisResult>, PipelineError> {
        Ok(self.analyze_readme(readme).await?)
    }
}

#[async_trait]
impl ImageGenerator for ComfyClient {
    fn is_available(&self) -> bool {
        ComfyClient::is_available(self)
    }

    async fn generate(&self, positive: &str, negative: &str) -> Result<String, PipelineError> {
        Ok(ComfyClient::generate(self, positive, negative).await?)
    }
}
