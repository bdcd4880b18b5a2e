//! HTTP client for the Ollama `generate` endpoint.

use std::time::Duration;

use repolens_core::AnalysisResult;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::OllamaError;
use crate::prompts;

/// Request timeout for a single non-streaming generation.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: Client,
    generate_url: Url,
    model: String,
}

impl OllamaClient {
    /// Creates a client for the Ollama API rooted at `base_url`
    /// (e.g. `http://localhost:11435/api`).
    ///
    /// # Errors
    ///
    /// Returns [`OllamaError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`OllamaError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str, model: &str) -> Result<Self, OllamaError> {
        Self::with_timeout(base_url, model, GENERATE_TIMEOUT)
    }

    /// Same as [`OllamaClient::new`] with a custom request timeout.
    ///
    /// # Errors
    ///
    /// See [`OllamaClient::new`].
    pub fn with_timeout(
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, OllamaError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("repolens/0.1 (readme-analysis)")
            .build()?;

        let invalid = |reason: String| OllamaError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let generate_url = Url::parse(&normalised)
            .and_then(|u| u.join("generate"))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            generate_url,
            model: model.to_string(),
        })
    }

    /// Runs one non-streaming generation and returns the `response` text.
    ///
    /// A body without a `response` field yields an empty string.
    ///
    /// # Errors
    ///
    /// - [`OllamaError::Http`] on network failure, timeout or non-2xx status.
    /// - [`OllamaError::Deserialize`] if the body is not JSON.
    pub async fn generate(&self, prompt: &str) -> Result<String, OllamaError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let body = self
            .client
            .post(self.generate_url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| OllamaError::Deserialize {
                context: format!("generate(model={})", self.model),
                source: e,
            })?;
        Ok(parsed.response)
    }

    /// Derives a title, Korean summary and image concept from a README.
    ///
    /// Runs three generations in sequence. A failed title or summary call
    /// leaves that part empty, and a failed or blank concept call falls back
    /// to [`prompts::DEFAULT_IMAGE_CONCEPT`]. Returns `Ok(None)` for blank
    /// input.
    ///
    /// # Errors
    ///
    /// Returns the last error when all three calls fail, which means the
    /// model server is unreachable rather than unhelpful.
    pub async fn analyze_readme(&self, content: &str) -> Result<Option<AnalysisResult>, OllamaError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let readme = prompts::truncate_readme(content);

        let title = self.generate(&prompts::title_prompt(&readme)).await;
        let summary = self.generate(&prompts::summary_prompt(&readme)).await;
        let concept = self.generate(&prompts::scene_prompt(&readme)).await;

        let concept = match (title.is_err(), summary.is_err(), concept) {
            (true, true, Err(e)) => {
                tracing::warn!(error = %e, "all analysis calls failed");
                return Err(e);
            }
            (_, _, Err(e)) => {
                tracing::warn!(error = %e, "concept extraction failed, using default");
                prompts::DEFAULT_IMAGE_CONCEPT.to_string()
            }
            (_, _, Ok(raw)) => prompts::clean_concept(&raw),
        };

        let title = match title {
            Ok(raw) => prompts::clean_title(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "title extraction failed");
                None
            }
        };
        let summary = match summary {
            Ok(raw) => prompts::clean_summary(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "summary extraction failed");
                None
            }
        };

        Ok(AnalysisResult::from_parts(title, summary, Some(concept)))
    }
}
