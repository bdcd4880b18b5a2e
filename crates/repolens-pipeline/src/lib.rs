//! Ingestion and enrichment engine: topic rotation, language filtering,
//! prompt sanitizing, image generation and retention.

pub mod adapters;
pub mod error;
pub mod ingest;
pub mod language;
pub mod retention;
pub mod sanitize;
pub mod services;
pub mod topic_cursor;
pub mod traits;

pub use error::PipelineError;
pub use ingest::{
    parse_github_url, regeneration_prompt, AnalyzeOutcome, Ingestor, TickOutcome, TickReport,
    IMAGE_STYLES, NEGATIVE_PROMPT,
};
pub use language::should_reject;
pub use retention::{RetentionSweeper, DEFAULT_RETENTION_DAYS};
pub use sanitize::{compose_prompt, sanitize, QUALITY_PREFIX};
pub use services::{load_workflow, Services};
pub use topic_cursor::{Selection, TopicCursor, MAX_PAGE};
pub use traits::{ImageGenerator, ProfileStore, RepoSource, Summarizer};
