// GitHub API module.
// Provides the client, response types, and data-source traits.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use endpoints::{ProfileSource, RepoSource};
pub use types::*;
