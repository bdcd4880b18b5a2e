use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComfyError {
    /// No workflow template was loaded at startup.
    #[error("workflow template not loaded")]
    TemplateNotLoaded,

    #[error("workflow template {path} is unusable: {reason}")]
    Template { path: String, reason: String },

    #[error("job submission failed: {reason}")]
    Submission { reason: String },

    #[error("job {prompt_id} did not finish within {waited:?}")]
    Timeout { prompt_id: String, waited: Duration },

    #[error("job {prompt_id} finished without an output image")]
    MissingImage { prompt_id: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
