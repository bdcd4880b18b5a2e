//! Wire types for the subset of the GitHub REST API used for discovery.

use repolens_core::Candidate;
use serde::Deserialize;

/// Response body of `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub owner: Option<RepoOwner>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    #[serde(default)]
    pub login: Option<String>,
}

/// Response body of `GET /repos/{owner}/{name}/readme`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeResponse {
    /// Base64 payload, wrapped with embedded newlines.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl From<SearchItem> for Candidate {
    fn from(item: SearchItem) -> Self {
        Candidate {
            owner: item.owner.and_then(|o| o.login),
            name: item.name,
            html_url: item.html_url,
            description: item.description,
            declared_language: item.language,
        }
    }
}
