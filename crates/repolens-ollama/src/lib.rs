pub mod client;
pub mod error;
pub mod prompts;

pub use client::{OllamaClient, GENERATE_TIMEOUT};
pub use error::OllamaError;
pub use prompts::{DEFAULT_IMAGE_CONCEPT, MAX_README_CHARS};
