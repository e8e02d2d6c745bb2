// Error types for the battle application.
// Covers GitHub API failures, configuration problems, and general I/O errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0} doesn't exist")]
    UserNotFound(String),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BattleError>;
