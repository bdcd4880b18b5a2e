//! In-memory fakes for the pipeline service traits.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repolens_comfy::ComfyError;
use repolens_core::{AnalysisResult, Candidate, NewProfile};
use repolens_db::{DbError, ProfileRow};
use repolens_github::GithubError;
use repolens_pipeline::{ImageGenerator, PipelineError, ProfileStore, RepoSource, Summarizer};

pub fn candidate(owner: &str, name: &str) -> Candidate {
    Candidate {
        owner: Some(owner.to_string()),
        name: Some(name.to_string()),
        html_url: Some(format!("https://github.com/{owner}/{name}")),
        description: Some(format!("{name} description")),
        declared_language: Some("Rust".to_string()),
    }
}

pub fn analysis(title: &str, summary: &str, concept: &str) -> AnalysisResult {
    AnalysisResult {
        title: Some(title.to_string()),
        summary: Some(summary.to_string()),
        image_concept: Some(concept.to_string()),
    }
}

fn source_error() -> PipelineError {
    PipelineError::Source(GithubError::InvalidBaseUrl {
        base_url: "fake".to_string(),
        reason: "unreachable".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ProfileRow>>,
    pub insert_calls: Mutex<usize>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<ProfileRow> {
        self.rows.lock().expect("lock").clone()
    }

    pub fn insert_calls(&self) -> usize {
        *self.insert_calls.lock().expect("lock")
    }

    pub fn seed(&self, full_name: &str, title: &str, created_at: DateTime<Utc>) -> i64 {
        let mut rows = self.rows.lock().expect("lock");
        let id = i64::try_from(rows.len()).expect("fits") + 1;
        rows.push(ProfileRow {
            id,
            repo_full_name: full_name.to_string(),
            repo_url: format!("https://github.com/{full_name}"),
            title: title.to_string(),
            summary: "요약".to_string(),
            topic: "Rust".to_string(),
            image_url: Some("http://img/view?filename=old.png&subfolder=&type=output".to_string()),
            created_at,
        });
        id
    }

    fn write_error() -> PipelineError {
        PipelineError::Store(DbError::NotFound)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
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
        *self.insert_calls.lock().expect("lock") += 1;
        if self.fail_writes {
            return Err(Self::write_error());
        }
        let mut rows = self.rows.lock().expect("lock");
        let mut inserted = 0;
        for p in profiles {
            if rows.iter().any(|r| r.repo_full_name == p.repo_full_name) {
                continue;
            }
            let id = i64::try_from(rows.len()).expect("fits") + 1;
            rows.push(ProfileRow {
                id,
                repo_full_name: p.repo_full_name.clone(),
                repo_url: p.repo_url.clone(),
                title: p.title.clone(),
                summary: p.summary.clone(),
                topic: p.topic.clone(),
                image_url: p.image_url.clone(),
                created_at: Utc::now(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update_image_url(&self, id: i64, image_url: &str) -> Result<(), PipelineError> {
        if self.fail_writes {
            return Err(Self::write_error());
        }
        let mut rows = self.rows.lock().expect("lock");
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(PipelineError::Store(DbError::NotFound))?;
        row.image_url = Some(image_url.to_string());
        Ok(())
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, PipelineError> {
        if self.fail_writes {
            return Err(Self::write_error());
        }
        let mut rows = self.rows.lock().expect("lock");
        let before = rows.len();
        rows.retain(|r| r.created_at >= cutoff);
        Ok(u64::try_from(before - rows.len()).expect("fits"))
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSource {
    pub candidates: Vec<Candidate>,
    /// README per `owner/name`; missing keys mean "no README".
    pub readmes: HashMap<String, String>,
    /// `owner/name` whose README fetch fails.
    pub failing: Vec<String>,
    pub searches: Mutex<Vec<(String, u32)>>,
    pub readme_calls: Mutex<usize>,
}

impl FakeSource {
    pub fn with_readme(mut self, full_name: &str, readme: &str) -> Self {
        self.readmes.insert(full_name.to_string(), readme.to_string());
        self
    }

    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches.lock().expect("lock").clone()
    }
}

#[async_trait]
impl RepoSource for FakeSource {
    async fn search(&self, topic: &str, page: u32) -> Result<Vec<Candidate>, PipelineError> {
        self.searches
            .lock()
            .expect("lock")
            .push((topic.to_string(), page));
        Ok(self.candidates.clone())
    }

    async fn readme(&self, owner: &str, name: &str) -> Result<Option<String>, PipelineError> {
        *self.readme_calls.lock().expect("lock") += 1;
        let key = format!("{owner}/{name}");
        if self.failing.contains(&key) {
            return Err(source_error());
        }
        Ok(self.readmes.get(&key).cloned())
    }
}

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Returns the same analysis for every README.
pub struct FakeSummarizer {
    pub result: Option<AnalysisResult>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn returning(result: Option<AnalysisResult>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn analyze(&self, readme: &str) -> Result<Option<AnalysisResult>, PipelineError> {
        self.calls.lock().expect("lock").push(readme.to_string());
        Ok(self.result.clone())
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

pub struct FakeImages {
    pub available: bool,
    /// `None` makes every job time out.
    pub url: Option<String>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl FakeImages {
    pub fn succeeding(url: &str) -> Self {
        Self {
            available: true,
            url: Some(url.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            available: true,
            url: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            url: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, positive: &str, negative: &str) -> Result<String, PipelineError> {
        self.prompts
            .lock()
            .expect("lock")
            .push((positive.to_string(), negative.to_string()));
        if !self.available {
            return Err(PipelineError::Image(ComfyError::TemplateNotLoaded));
        }
        self.url.clone().ok_or_else(|| {
            PipelineError::Image(ComfyError::Timeout {
                prompt_id: "fake".to_string(),
                waited: Duration::from_secs(180),
            })
        })
    }
}
