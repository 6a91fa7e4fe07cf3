pub mod client;
pub mod error;
pub mod repository;

// Re-exports
pub use client::{GitHubClient, RepoService};
pub use error::{Error, Result};
pub use repository::{RemoteRepo, Repository};
