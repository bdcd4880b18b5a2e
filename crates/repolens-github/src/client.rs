//! HTTP client for the GitHub REST API.
//!
//! Covers the two calls ingestion needs: star-ranked repository search by
//! topic keyword and README retrieval.

use std::time::Duration;

use base64::Engine as _;
use reqwest::{Client, StatusCode, Url};
use repolens_core::Candidate;

use crate::error::GithubError;
use crate::types::{ReadmeResponse, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://api.github.com/";

/// Number of repositories requested per discovery page.
pub const SEARCH_PAGE_SIZE: u32 = 5;

/// Client for the GitHub REST API.
///
/// Use [`GithubClient::new`] for production or [`GithubClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GithubClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl GithubClient {
    /// Creates a client pointed at `api.github.com`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: Option<&str>, timeout_secs: u64) -> Result<Self, GithubError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (GitHub Enterprise or wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GithubError::InvalidBaseUrl`] if `base_url` does not
    /// parse as an absolute URL.
    pub fn with_base_url(
        token: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("repolens/0.1 (repository-ingestion)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| GithubError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(GithubError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            token: token.map(str::to_owned),
            base_url: parsed,
        })
    }

    /// Searches repositories matching `topic`, most-starred first.
    ///
    /// Returns at most [`SEARCH_PAGE_SIZE`] candidates for the 1-based `page`.
    ///
    /// # Errors
    ///
    /// - [`GithubError::Http`] on network failure or non-2xx status.
    /// - [`GithubError::Deserialize`] if the body is not a search response.
    pub async fn search_repositories(
        &self,
        topic: &str,
        page: u32,
    ) -> Result<Vec<Candidate>, GithubError> {
        let mut url = self.endpoint(&["search", "repositories"]);
        url.query_pairs_mut()
            .append_pair("q", topic)
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("per_page", &SEARCH_PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());

        let response = self.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                context: format!("search(q={topic}, page={page})"),
                source: e,
            })?;

        tracing::debug!(topic, page, count = parsed.items.len(), "github search returned");
        Ok(parsed.items.into_iter().map(Candidate::from).collect())
    }

    /// Fetches and decodes the README of `owner/name`.
    ///
    /// Returns `Ok(None)` when the repository has no README (404), when the
    /// payload carries no content, or when the content is not valid base64
    /// encoded UTF-8.
    ///
    /// # Errors
    ///
    /// - [`GithubError::Http`] on network failure or a non-2xx status other
    ///   than 404.
    /// - [`GithubError::Deserialize`] if the body is not a README response.
    pub async fn fetch_readme(&self, owner: &str, name: &str) -> Result<Option<String>, GithubError> {
        let url = self.endpoint(&["repos", owner, name, "readme"]);

        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(repo = %format!("{owner}/{name}"), "no README");
            return Ok(None);
        }
        let body = response.error_for_status()?.text().await?;
        let parsed: ReadmeResponse =
            serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                context: format!("readme({owner}/{name})"),
                source: e,
            })?;

        let Some(content) = parsed.content else {
            return Ok(None);
        };
        let decoded = decode_content(&content);
        if decoded.is_none() {
            tracing::warn!(repo = %format!("{owner}/{name}"), "README content could not be decoded");
        }
        Ok(decoded)
    }

    fn get(&self, url: &Url) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor: the base URL can always carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Decodes the README API's base64 payload, which is wrapped with newlines.
fn decode_content(content: &str) -> Option<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .ok()?;
    String::from_utf8(bytes).ok()
}
