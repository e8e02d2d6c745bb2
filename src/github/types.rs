// GitHub API response types.
// Defines structs for deserializing the search, user, and repository endpoints.

use serde::{Deserialize, Serialize};

/// Repository owner as embedded in repository payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: Option<String>,
}

/// GitHub repository with the fields used for ranking and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub open_issues: u64,
}

/// Body of `GET /search/repositories`.
///
/// Error bodies carry `message` instead of `items`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub items: Option<Vec<Repository>>,
    pub message: Option<String>,
}

/// GitHub user profile from `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: String,
    pub location: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// True once at least one response has reported limits.
    pub fn is_known(&self) -> bool {
        self.limit > 0
    }
}
