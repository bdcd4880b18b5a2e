pub mod client;
pub mod error;
pub mod types;

pub use client::{GithubClient, SEARCH_PAGE_SIZE};
pub use error::GithubError;
pub use types::{ReadmeResponse, RepoOwner, SearchItem, SearchResponse};
