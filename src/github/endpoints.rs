// GitHub API endpoint functions.
// Typed fetches for popular repositories and user profiles, plus the traits
// the state controllers depend on.

use async_trait::async_trait;

use crate::error::{BattleError, Result};
use crate::state::Language;

use super::client::GitHubClient;
use super::types::{RateLimit, Repository, SearchResponse, User};

/// Maximum page size accepted by the user repositories endpoint.
const USER_REPOS_PER_PAGE: u32 = 100;

/// Longest login GitHub allows.
const MAX_LOGIN_LEN: usize = 39;

/// Source of ranked popular repositories.
#[async_trait]
pub trait RepoSource: Send + Sync + 'static {
    async fn popular_repos(&self, language: Language) -> Result<Vec<Repository>>;

    /// Latest known API quota, if the source tracks one.
    fn quota(&self) -> Option<RateLimit> {
        None
    }
}

/// Source of user profiles and their repositories.
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn get_user(&self, username: &str) -> Result<User>;
    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>>;
}

/// Build the search query for the most-starred repositories in a language.
pub fn popular_query(language: Language) -> String {
    match language.qualifier() {
        Some(lang) => format!("stars:>1 language:{}", lang),
        None => "stars:>1".to_string(),
    }
}

/// Accept only names GitHub could have issued: ASCII alphanumerics and hyphens.
///
/// Anything else cannot name a user and must not reach the request path.
fn checked_login(username: &str) -> Result<&str> {
    let valid = !username.is_empty()
        && username.len() <= MAX_LOGIN_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(username)
    } else {
        Err(BattleError::UserNotFound(username.to_string()))
    }
}

/// A 404 on a user path means the user does not exist.
fn user_not_found(username: &str) -> impl FnOnce(BattleError) -> BattleError + '_ {
    move |e| match e {
        BattleError::NotFound(_) => BattleError::UserNotFound(username.to_string()),
        other => other,
    }
}

impl GitHubClient {
    /// Search for the most-starred repositories, optionally restricted by language.
    pub async fn search_popular(&self, language: Language) -> Result<Vec<Repository>> {
        let query = popular_query(language);
        let per_page = self.per_page().to_string();
        let params = [
            ("q", query.as_str()),
            ("sort", "stars"),
            ("order", "desc"),
            ("type", "Repositories"),
            ("per_page", per_page.as_str()),
        ];
        let response = self
            .get_with_params("/search/repositories", &params)
            .await?;
        let body: SearchResponse = response.json().await?;
        body.items.ok_or_else(|| {
            BattleError::Other(
                body.message
                    .unwrap_or_else(|| "search response missing items".to_string()),
            )
        })
    }

    /// Get a user's public profile.
    pub async fn fetch_user(&self, username: &str) -> Result<User> {
        let login = checked_login(username)?;
        let response = self
            .get(&format!("/users/{}", login))
            .await
            .map_err(user_not_found(username))?;
        let user: User = response.json().await?;
        Ok(user)
    }

    /// Get a user's public repositories (first page only).
    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let login = checked_login(username)?;
        let per_page = USER_REPOS_PER_PAGE.to_string();
        let params = [("per_page", per_page.as_str())];
        let response = self
            .get_with_params(&format!("/users/{}/repos", login), &params)
            .await
            .map_err(user_not_found(username))?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn popular_repos(&self, language: Language) -> Result<Vec<Repository>> {
        self.search_popular(language).await
    }

    fn quota(&self) -> Option<RateLimit> {
        Some(self.rate_limit()).filter(RateLimit::is_known)
    }
}

#[async_trait]
impl ProfileSource for GitHubClient {
    async fn get_user(&self, username: &str) -> Result<User> {
        self.fetch_user(username).await
    }

    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        self.fetch_user_repos(username).await
    }
}
