use repolens_comfy::ComfyError;
use repolens_db::DbError;
use repolens_github::GithubError;
use repolens_ollama::OllamaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("profile {0} not found")]
    NotFound(i64),

    #[error("not a GitHub repository URL: {0}")]
    InvalidUrl(String),

    #[error("image generation failed: {0}")]
    Image(#[from] ComfyError),

    #[error("storage error: {0}")]
    Store(#[from] DbError),

    #[error("repository source error: {0}")]
    Source(#[from] GithubError),

    #[error("summarization error: {0}")]
    Summarizer(#[from] OllamaError),
}

