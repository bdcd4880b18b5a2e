//! Stand-ins for the pipeline services used by router and scheduler tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_comfy::ComfyError;
use repolens_core::{AnalysisResult, Candidate, NewProfile};
use repolens_db::ProfileRow;
use repolens_pipeline::{
    ImageGenerator, Ingestor, PipelineError, ProfileStore, RepoSource, Summarizer,
};

#[derive(Default)]
pub struct StubStore {
    pub rows: Mutex<Vec<ProfileRow>>,
}

impl StubStore {
    pub fn with_profile(id: i64, title: &str) -> Self {
        let store = Self::default();
        store.rows.lock().expect("lock").push(ProfileRow {
            id,
            repo_full_name: "acme/widget".to_string(),
            repo_url: "https://github.com/acme/widget".to_string(),
            title: title.to_string(),
            summary: "작은 도구".to_string(),
            topic: "Rust".to_string(),
            image_url: None,
            created_at: Utc::now(),
        });
        store
    }
}

#[async_trait]
impl ProfileStore for StubStore {
    async fn exists(&self, repo_full_name: &str) -> Result<bool, PipelineError> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .iter()
            .any(|r| r.repo_full_name == repo_full_name))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProfileRow>, PipelineError> {
        Ok(self
            .rows
            .lock()
            .expect("lock")
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn insert_batch(&self, profiles: &[NewProfile]) -> Result<u64, PipelineError> {
        Ok(u64::try_from(profiles.len()).expect("fits"))
    }

    async fn update_image_url(&self, id: i64, image_url: &str) -> Result<(), PipelineError> {
        if let Some(row) = self.rows.lock().expect("lock").iter_mut().find(|r| r.id == id) {
            row.image_url = Some(image_url.to_string());
        }
        Ok(())
    }

    async fn delete_created_before(&self, _cutoff: DateTime<Utc>) -> Result<u64, PipelineError> {
        Ok(0)
    }
}

struct EmptySource;

#[async_trait]
impl RepoSource for EmptySource {
    async fn search(&self, _topic: &str, _page: u32) -> Result<Vec<Candidate>, PipelineError> {
        Ok(Vec::new())
    }

    async fn readme(&self, _owner: &str, _name: &str) -> Result<Option<String>, PipelineError> {
        Ok(None)
    }
}

struct SilentSummarizer;

#[async_trait]
impl Summarizer for SilentSummarizer {
    async fn analyze(&self, _readme: &str) -> Result<Option<AnalysisResult>, PipelineError> {
        Ok(None)
    }
}

pub struct StubImages {
    url: Option<String>,
}

impl StubImages {
    pub fn succeeding(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { url: None }
    }
}

#[async_trait]
impl ImageGenerator for StubImages {
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, _positive: &str, _negative: &str) -> Result<String, PipelineError> {
        self.url.clone().ok_or_else(|| {
            PipelineError::Image(ComfyError::Timeout {
                prompt_id: "stub".to_string(),
                waited: Duration::from_secs(180),
            })
        })
    }
}

pub fn stub_ingestor(store: Arc<StubStore>, images: StubImages) -> Ingestor {
    Ingestor::new(
        store,
        Arc::new(EmptySource),
        Arc::new(SilentSummarizer),
        Arc::new(images),
    )
}
