use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ComfyError;
use crate::history::extract_image_url;
use crate::workflow::WorkflowTemplate;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
const HISTORY_TIMEOUT: Duration = Duration::from_secs(5);

/// How often to poll job history and how long to wait overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Measured from the start of submission.
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            deadline: Duration::from_secs(180),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    prompt_id: Option<String>,
}

/// Submits text-to-image jobs to ComfyUI and waits for their output.
///
/// The workflow template is optional so that a service whose template failed
/// to load can still start; every [`ComfyClient::generate`] call then fails
/// with [`ComfyError::TemplateNotLoaded`].
pub struct ComfyClient {
    client: Client,
    base_url: Url,
    template: Option<WorkflowTemplate>,
    policy: PollPolicy,
}

impl ComfyClient {
    /// # Errors
    ///
    /// Returns [`ComfyError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ComfyError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str, template: Option<WorkflowTemplate>) -> Result<Self, ComfyError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("repolens/0.1 (image-generation)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ComfyError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            template,
            policy: PollPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a workflow template is loaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.template.is_some()
    }

    /// Runs one generation job and returns the URL of the produced image.
    ///
    /// # Errors
    ///
    /// - [`ComfyError::TemplateNotLoaded`] without contacting the server when
    ///   no template is loaded.
    /// - [`ComfyError::Submission`] if `/prompt` fails or returns no id.
    /// - [`ComfyError::Timeout`] if the job does not finish before the
    ///   poll deadline.
    /// - [`ComfyError::MissingImage`] if the job finished without an image.
    pub async fn generate(&self, positive: &str, negative: &str) -> Result<String, ComfyError> {
        let template = self.template.as_ref().ok_or(ComfyError::TemplateNotLoaded)?;
        let graph = template.render(positive, negative);

        let started = Instant::now();
        let prompt_id = self.submit(graph).await?;
        tracing::info!(prompt_id = %prompt_id, "comfyui job submitted");

        while started.elapsed() < self.policy.deadline {
            match self.fetch_history(&prompt_id).await {
                Ok(Some(entry)) => {
                    return extract_image_url(&self.base_url, &entry).ok_or_else(|| {
                        ComfyError::MissingImage {
                            prompt_id: prompt_id.clone(),
                        }
                    });
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(prompt_id = %prompt_id, error = %e, "history poll failed"),
            }
            tokio::time::sleep(self.policy.interval).await;
        }

        tracing::warn!(prompt_id = %prompt_id, "comfyui job timed out");
        Err(ComfyError::Timeout {
            prompt_id,
            waited: started.elapsed(),
        })
    }

    async fn submit(&self, graph: Value) -> Result<String, ComfyError> {
        let submission = |reason: String| ComfyError::Submission { reason };

        let url = self.base_url.join("prompt").map_err(|e| submission(e.to_string()))?;
        let response = self
            .client
            .post(url)
            .timeout(SUBMIT_TIMEOUT)
            .json(&json!({ "prompt": graph }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| submission(e.to_string()))?;

        let body: SubmitResponse = response.json().await.map_err(|e| submission(e.to_string()))?;
        body.prompt_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| submission("response carried no prompt_id".to_string()))
    }

    /// Returns the history entry for `prompt_id` once it is non-empty.
    async fn fetch_history(&self, prompt_id: &str) -> Result<Option<Value>, reqwest::Error> {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["history", prompt_id]);
        }

        let response = self.client.get(url).timeout(HISTORY_TIMEOUT).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let mut history: Value = response.error_for_status()?.json().await?;

        let entry = history.get_mut(prompt_id).map(Value::take);
        Ok(entry.filter(|e| e.as_object().is_some_and(|o| !o.is_empty())))
    }
}
