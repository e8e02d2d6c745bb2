// GitHub API HTTP client.
// Handles optional authentication, rate limit tracking, and status mapping.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::config::Settings;
use crate::error::{BattleError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with rate limit tracking.
///
/// Methods take `&self` so a single client can be shared across fetch tasks.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    per_page: u32,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &settings.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| BattleError::Config(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("gh-battle-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(BattleError::Network)?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            per_page: settings.per_page,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Page size used for repository search.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Snapshot of the most recent rate limit headers.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|rate| rate.clone())
            .unwrap_or_default()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET with params");
        let response = self.client.get(&url).query(params).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate = self.rate_limit();
        match status {
            StatusCode::UNAUTHORIZED => Err(BattleError::Unauthorized),
            StatusCode::NOT_FOUND => Err(BattleError::NotFound(response.url().to_string())),
            // Only an exhausted, reported quota counts; other 403s are plain HTTP errors.
            StatusCode::FORBIDDEN if rate.is_known() && rate.remaining == 0 => {
                Err(BattleError::RateLimited {
                    reset_at: format_reset(rate.reset),
                })
            }
            status => Err(BattleError::Http {
                status: status.as_u16(),
                message: error_message(&response.text().await.unwrap_or_default()),
            }),
        }
    }
}

/// Format a rate limit reset epoch as a wall-clock time.
fn format_reset(reset: u64) -> String {
    chrono::DateTime::from_timestamp(reset as i64, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract the `message` field from a GitHub error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(url: String) -> GitHubClient {
        let settings = Settings {
            api_base_url: url,
            ..Settings::default()
        };
        GitHubClient::new(&settings).unwrap()
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"message":"Validation Failed","documentation_url":"https://docs"}"#;
        assert_eq!(error_message(body), "Validation Failed");
        assert_eq!(error_message("  bad gateway \n"), "bad gateway");
    }

    #[test]
    fn test_format_reset() {
        assert_eq!(format_reset(0), "00:00:00");
        assert_eq!(format_reset(3661), "01:01:01");
    }

    #[test]
    fn test_new_trims_base_url() {
        let settings = Settings {
            api_base_url: "http://localhost:1234/".to_string(),
            token: Some("abc".to_string()),
            ..Settings::default()
        };
        let client = GitHubClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
        assert_eq!(client.per_page(), 30);
        assert!(!client.rate_limit().is_known());
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let settings = Settings {
            token: Some("bad\ntoken".to_string()),
            ..Settings::default()
        };
        assert!(matches!(
            GitHubClient::new(&settings),
            Err(BattleError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let settings = Settings {
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..Settings::default()
        };
        let client = GitHubClient::new(&settings).unwrap();
        let err = client.get("/users/octocat").await.unwrap_err();
        assert!(matches!(err, BattleError::Network(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_headers_update_counters() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/octocat")
            .with_status(200)
            .with_header("x-ratelimit-limit", "60")
            .with_header("x-ratelimit-remaining", "57")
            .with_header("x-ratelimit-reset", "3661")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(server.url());
        client.get("/users/octocat").await.unwrap();

        let rate = client.rate_limit();
        assert!(rate.is_known());
        assert_eq!(rate.limit, 60);
        assert_eq!(rate.remaining, 57);
        assert_eq!(rate.reset, 3661);
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get("/user").await.unwrap_err();
        assert!(matches!(err, BattleError::Unauthorized));
    }

    #[tokio::test]
    async fn test_not_found_carries_url() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/nobody/nothing")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(server.url());
        match client.get("/repos/nobody/nothing").await.unwrap_err() {
            BattleError::NotFound(url) => assert!(url.ends_with("/repos/nobody/nothing")),
            e => panic!("Expected NotFound error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_exhausted_quota_is_rate_limited() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/repositories")
            .with_status(403)
            .with_header("x-ratelimit-limit", "60")
            .with_header("x-ratelimit-remaining", "0")
            .with_header("x-ratelimit-reset", "3661")
            .with_body(r#"{"message":"API rate limit exceeded"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get("/search/repositories").await.unwrap_err();
        assert_eq!(err.to_string(), "Rate limit exceeded, resets at 01:01:01");
    }

    #[tokio::test]
    async fn test_forbidden_without_quota_headers_is_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users/blocked")
            .with_status(403)
            .with_body(r#"{"message":"Forbidden"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get("/users/blocked").await.unwrap_err();
        match &err {
            BattleError::Http { status, message } => {
                assert_eq!(*status, 403);
                assert_eq!(message, "Forbidden");
            }
            e => panic!("Expected Http error, got: {:?}", e),
        }
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");
    }

    #[tokio::test]
    async fn test_forbidden_with_quota_left_is_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/private/thing")
            .with_status(403)
            .with_header("x-ratelimit-limit", "5000")
            .with_header("x-ratelimit-remaining", "4999")
            .with_header("x-ratelimit-reset", "3661")
            .with_body(r#"{"message":"Resource not accessible"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get("/repos/private/thing").await.unwrap_err();
        assert!(matches!(err, BattleError::Http { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_server_error_uses_body_message() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/repositories")
            .with_status(422)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create_async()
            .await;

        let client = client_for(server.url());
        let err = client.get("/search/repositories").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 422: Validation Failed");
    }
}
