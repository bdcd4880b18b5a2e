//! Client for a ComfyUI server: workflow templating, job submission and
//! history polling until an image is produced.

pub mod client;
pub mod error;
pub mod history;
pub mod workflow;

pub use client::{ComfyClient, PollPolicy};
pub use error::ComfyError;
pub use history::extract_image_url;
pub use workflow::{WorkflowTemplate, NEGATIVE_NODE_ID, POSITIVE_NODE_ID};
