//! PyPI and GitHub metadata client for feu
//!
//! This crate fetches release lists from PyPI and repository metadata from
//! the GitHub API with timeouts, retry logic and an in-memory TTL cache.

pub mod api;
pub mod cache;
pub mod client;
pub mod github;
pub mod pypi;

// Re-export main types
pub use api::{GithubRepo, PypiProject};
pub use cache::{CacheEntry, CacheStats, MetadataCache};
pub use client::{RegistryClient, RetryConfig};
pub use github::{sort_repos_by_full_name, sort_repos_by_name};

use feu_core::error::FeuError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, FeuError>;
