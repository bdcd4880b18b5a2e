//! Discovery, enrichment and persistence of repository profiles.
//!
//! [`Ingestor`] has three entry points sharing one enrichment path
//! (summarize, sanitize, generate image, assemble):
//!
//! - [`Ingestor::run_batch_tick`]: one scheduled pass over the next topic page.
//! - [`Ingestor::analyze_url`] / [`Ingestor::spawn_analyze`]: a single
//!   repository submitted by URL.
//! - [`Ingestor::regenerate_image`]: a fresh cover image for a stored profile.

use std::sync::{Arc, LazyLock};

use rand::seq::IndexedRandom;
use regex::Regex;
use repolens_core::{
    AnalysisResult, Candidate, NewProfile, ON_DEMAND_TOPIC, SUMMARY_FALLBACK,
    UNTITLED_PROJECT_FALLBACK,
};
use tokio::task::JoinHandle;

use crate::error::PipelineError;
use crate::language::should_reject;
use crate::sanitize::{compose_prompt, QUALITY_PREFIX};
use crate::topic_cursor::{Selection, TopicCursor};
use crate::traits::{ImageGenerator, ProfileStore, RepoSource, Summarizer};

/// Negative prompt sent with every image job.
pub const NEGATIVE_PROMPT: &str = "(worst quality, low quality, normal quality:2.0), \
     (text, watermark, signature:1.5), (human, people, man, woman, face, realistic:2.0), \
     (robot:1.5), (dog, cat, pet:1.5), blurry, deformed, nsfw";

/// Styles drawn from at random when regenerating an image.
pub const IMAGE_STYLES: [&str; 6] = [
    "cyberpunk style, neon lights",
    "minimalist vector art, flat design",
    "3D render, unreal engine, isometric",
    "blueprint, technical drawing",
    "oil painting, artistic",
    "abstract tech visualization, blue nodes",
];

static GITHUB_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://github\.com/([^/]+)/([^/]+)").expect("valid regex"));

/// Result of one scheduled batch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No workflow template is loaded; nothing was fetched.
    ImagesUnavailable,
    /// The topic list is empty.
    NoTopics,
    Completed(TickReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub topic: String,
    pub page: u32,
    pub discovered: usize,
    pub prepared: usize,
    pub stored: u64,
}

/// Result of analyzing a single repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Stored {
        repo_full_name: String,
        image_url: Option<String>,
    },
    AlreadyStored {
        repo_full_name: String,
    },
    NoReadme {
        repo_full_name: String,
    },
    NoAnalysis {
        repo_full_name: String,
    },
}

/// Drives discovery and enrichment against pluggable services.
pub struct Ingestor {
    store: Arc<dyn ProfileStore>,
    source: Arc<dyn RepoSource>,
    summarizer: Arc<dyn Summarizer>,
    images: Arc<dyn ImageGenerator>,
    cursor: TopicCursor,
}

impl Ingestor {
    #[must_use]
    pub fn new(
        store: Arc<dyn ProfileStore>,
        source: Arc<dyn RepoSource>,
        summarizer: Arc<dyn Summarizer>,
        images: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            store,
            source,
            summarizer,
            images,
            cursor: TopicCursor::default(),
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: TopicCursor) -> Self {
        self.cursor = cursor;
        self
    }

    // -----------------------------------------------------------------------
    // Batch tick
    // -----------------------------------------------------------------------

    /// Runs one discovery pass over the next topic page.
    ///
    /// Never fails: per-candidate errors are logged and the candidate is
    /// skipped, and a failed batch insert is logged.
    pub async fn run_batch_tick(&self) -> TickOutcome {
        if !self.images.is_available() {
            tracing::warn!("scheduler: image workflow not loaded, skipping ingest tick");
            return TickOutcome::ImagesUnavailable;
        }
        let Some(Selection { topic, page }) = self.cursor.next_selection() else {
            return TickOutcome::NoTopics;
        };

        let mut report = TickReport {
            topic: topic.clone(),
            page,
            discovered: 0,
            prepared: 0,
            stored: 0,
        };

        let candidates = match self.source.search(&topic, page).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(topic = %topic, page, error = %e, "scheduler: discovery failed");
                return TickOutcome::Completed(report);
            }
        };
        report.discovered = candidates.len();
        if candidates.is_empty() {
            tracing::info!(topic = %topic, page, "scheduler: no repositories found");
            return TickOutcome::Completed(report);
        }
        tracing::info!(topic = %topic, page, count = candidates.len(), "scheduler: ingest tick started");

        let mut batch = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            match self.prepare_candidate(candidate, &topic).await {
                Ok(Some(profile)) => batch.push(profile),
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    repo = ?candidate.full_name(),
                    error = %e,
                    "scheduler: candidate skipped"
                ),
            }
        }
        report.prepared = batch.len();

        if !batch.is_empty() {
            match self.store.insert_batch(&batch).await {
                Ok(stored) => {
                    report.stored = stored;
                    tracing::info!(topic = %topic, stored, "scheduler: batch persisted");
                }
                Err(e) => tracing::error!(topic = %topic, error = %e, "scheduler: batch persist failed"),
            }
        }

        TickOutcome::Completed(report)
    }

    async fn prepare_candidate(
        &self,
        candidate: &Candidate,
        topic: &str,
    ) -> Result<Option<NewProfile>, PipelineError> {
        let (Some(owner), Some(name), Some(full_name)) = (
            candidate.owner.as_deref(),
            candidate.name.as_deref(),
            candidate.full_name(),
        ) else {
            tracing::debug!("candidate without owner or name");
            return Ok(None);
        };

        if self.store.exists(&full_name).await? {
            tracing::debug!(repo = %full_name, "already stored");
            return Ok(None);
        }

        let Some(readme) = self.fetch_readme(owner, name).await? else {
            tracing::debug!(repo = %full_name, "no README");
            return Ok(None);
        };

        if should_reject(&readme, candidate.declared_language.as_deref()) {
            tracing::debug!(repo = %full_name, "README language rejected");
            return Ok(None);
        }

        let Some(analysis) = self.summarizer.analyze(&readme).await? else {
            tracing::debug!(repo = %full_name, "no analysis");
            return Ok(None);
        };

        let title_fallback = candidate
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map_or_else(|| full_name.clone(), str::to_string);
        let repo_url = candidate
            .html_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{full_name}"));

        Ok(Some(
            self.assemble(analysis, full_name, repo_url, topic.to_string(), title_fallback)
                .await,
        ))
    }

    // -----------------------------------------------------------------------
    // On-demand analysis
    // -----------------------------------------------------------------------

    /// Analyzes and stores a single repository given its GitHub URL.
    ///
    /// No language filter is applied. The profile is stored under the
    /// `On-Demand` topic with `url` as its repository URL.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidUrl`] if no `owner/name` can be parsed.
    /// - Any storage, source or summarizer error met along the way.
    pub async fn analyze_url(&self, url: &str) -> Result<AnalyzeOutcome, PipelineError> {
        let (owner, name) =
            parse_github_url(url).ok_or_else(|| PipelineError::InvalidUrl(url.to_string()))?;
        let repo_full_name = format!("{owner}/{name}");

        if self.store.exists(&repo_full_name).await? {
            return Ok(AnalyzeOutcome::AlreadyStored { repo_full_name });
        }

        let Some(readme) = self.fetch_readme(&owner, &name).await? else {
            return Ok(AnalyzeOutcome::NoReadme { repo_full_name });
        };

        let Some(analysis) = self.summarizer.analyze(&readme).await? else {
            return Ok(AnalyzeOutcome::NoAnalysis { repo_full_name });
        };

        let profile = self
            .assemble(
                analysis,
                repo_full_name.clone(),
                url.to_string(),
                ON_DEMAND_TOPIC.to_string(),
                repo_full_name.clone(),
            )
            .await;
        let image_url = profile.image_url.clone();
        self.store.insert_batch(std::slice::from_ref(&profile)).await?;

        Ok(AnalyzeOutcome::Stored {
            repo_full_name,
            image_url,
        })
    }

    /// Runs [`Ingestor::analyze_url`] on a detached task and logs the result.
    pub fn spawn_analyze(self: &Arc<Self>, url: String) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.analyze_url(&url).await {
                Ok(outcome) => tracing::info!(url = %url, ?outcome, "on-demand analysis finished"),
                Err(e) => tracing::warn!(url = %url, error = %e, "on-demand analysis failed"),
            }
        })
    }

    // -----------------------------------------------------------------------
    // Image regeneration
    // -----------------------------------------------------------------------

    /// Generates a new cover image for a stored profile in a random style and
    /// stores its URL. The profile is left untouched on failure.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NotFound`] if no profile has `id`.
    /// - [`PipelineError::Image`] if generation fails.
    /// - [`PipelineError::Store`] if the lookup or update fails.
    pub async fn regenerate_image(&self, id: i64) -> Result<String, PipelineError> {
        let profile = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PipelineError::NotFound(id))?;

        let style = IMAGE_STYLES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(IMAGE_STYLES[0]);
        let prompt = regeneration_prompt(style, &profile.title);

        let image_url = self.images.generate(&prompt, NEGATIVE_PROMPT).await?;
        self.store.update_image_url(id, &image_url).await?;
        tracing::info!(id, repo = %profile.repo_full_name, "image regenerated");
        Ok(image_url)
    }

    // -----------------------------------------------------------------------
    // Shared enrichment
    // -----------------------------------------------------------------------

    async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<String>, PipelineError> {
        Ok(self
            .source
            .readme(owner, name)
            .await?
            .filter(|readme| !readme.is_empty()))
    }

    async fn assemble(
        &self,
        analysis: AnalysisResult,
        repo_full_name: String,
        repo_url: String,
        topic: String,
        title_fallback: String,
    ) -> NewProfile {
        let image_url = self
            .generate_cover(
                &repo_full_name,
                analysis.title.as_deref(),
                analysis.image_concept.as_deref(),
            )
            .await;

        NewProfile {
            repo_full_name,
            repo_url,
            title: analysis.title.unwrap_or(title_fallback),
            summary: analysis
                .summary
                .unwrap_or_else(|| SUMMARY_FALLBACK.to_string()),
            topic,
            image_url,
        }
    }

    /// Image failures degrade to a profile without an image.
    async fn generate_cover(
        &self,
        repo_full_name: &str,
        title: Option<&str>,
        concept: Option<&str>,
    ) -> Option<String> {
        let Some(prompt) = compose_prompt(title, concept) else {
            tracing::debug!(repo = %repo_full_name, "no usable image prompt");
            return None;
        };
        match self.images.generate(&prompt, NEGATIVE_PROMPT).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(repo = %repo_full_name, error = %e, "image generation failed");
                None
            }
        }
    }
}

/// Extracts `(owner, name)` from the first `https://github.com/<owner>/<name>`
/// in `url`. A trailing `.git`, query, fragment or anything after whitespace
/// is not part of the name.
#[must_use]
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let caps = GITHUB_URL_RE.captures(url)?;
    let owner = caps.get(1)?.as_str();
    let raw_name = caps.get(2)?.as_str();

    let name = raw_name
        .split(|c: char| c == '?' || c == '#' || c.is_whitespace())
        .next()
        .unwrap_or(raw_name);
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Prompt used for regeneration: quality prefix, style, then title.
#[must_use]
pub fn regeneration_prompt(style: &str, title: &str) -> String {
    let title = if title.trim().is_empty() {
        UNTITLED_PROJECT_FALLBACK
    } else {
        title
    };
    format!("{QUALITY_PREFIX}, {style}, {title}")
}
