//! Shared configuration and domain types for the repolens workspace.

pub mod app_config;
pub mod config;
pub mod profiles;
pub mod topics;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{
    AnalysisResult, Candidate, NewProfile, ON_DEMAND_TOPIC, SUMMARY_FALLBACK,
    UNTITLED_PROJECT_FALLBACK,
};
pub use topics::DEFAULT_TOPICS;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
