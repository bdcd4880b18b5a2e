use serde::{Deserialize, Serialize};

/// Topic recorded on profiles created through on-demand analysis rather than
/// topic rotation.
pub const ON_DEMAND_TOPIC: &str = "On-Demand";

/// Summary stored when the language model produced no usable summary.
pub const SUMMARY_FALLBACK: &str = "요약 추출 실패";

/// Title used for image regeneration when a profile has no title.
pub const UNTITLED_PROJECT_FALLBACK: &str = "Software Project";

/// A repository returned by discovery, not yet evaluated for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    /// Primary language as declared by the hosting service (e.g. `"Rust"`).
    pub declared_language: Option<String>,
}

impl Candidate {
    /// Returns `owner/name`, or `None` when either part is missing or blank.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let owner = self.owner.as_deref().filter(|s| !s.trim().is_empty())?;
        let name = self.name.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(format!("{owner}/{name}"))
    }
}

/// Title, summary and visual concept extracted from a README.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image_concept: Option<String>,
}

impl AnalysisResult {
    /// Builds a result, returning `None` when all three parts are absent.
    #[must_use]
    pub fn from_parts(
        title: Option<String>,
        summary: Option<String>,
        image_concept: Option<String>,
    ) -> Option<Self> {
        if title.is_none() && summary.is_none() && image_concept.is_none() {
            return None;
        }
        Some(Self {
            title,
            summary,
            image_concept,
        })
    }
}

/// A fully assembled profile ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    /// `owner/name`; unique across all stored profiles.
    pub repo_full_name: String,
    pub repo_url: String,
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub image_url: Option<String>,
}
