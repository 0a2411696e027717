//! PyPI and GitHub API response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Project document returned by `GET /pypi/{name}/json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PypiProject {
    /// Release version -> uploaded files
    pub releases: HashMap<String, Value>,
}

/// Repository object returned by the GitHub REST API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GithubRepo {
    /// Repository name, e.g. `feu`
    pub name: String,
    /// Owner-qualified name, e.g. `durandtibo/feu`
    pub full_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub private: bool,
    /// Remaining fields, kept as returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GithubRepo {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            html_url: None,
            description: None,
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            private: false,
            extra: Map::new(),
        }
    }
}
