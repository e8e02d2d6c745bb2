// Application settings and platform directories.
// Layers built-in defaults, an optional config.json, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::state::Language;
use crate::theme::Theme;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the GitHub REST API.
    pub api_base_url: String,
    /// Optional token; the public API works without one at a lower rate limit.
    pub token: Option<String>,
    /// Language selected when the app starts.
    pub default_language: Language,
    /// Initial theme.
    pub theme: Theme,
    /// Page size for repository search.
    pub per_page: u32,
    /// tracing EnvFilter directive for the log file.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            token: None,
            default_language: Language::All,
            theme: Theme::Light,
            per_page: 30,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the platform config file and the process environment.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut settings = Self::from_file(path.as_deref())?;
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Read settings from a JSON file, falling back to defaults if it is absent.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| BattleError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
        if let Some(url) = lookup("BATTLE_API_URL").filter(|u| !u.is_empty()) {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(filter) = lookup("BATTLE_LOG").filter(|f| !f.is_empty()) {
            self.log_filter = filter;
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "gh-battle")
}

/// Path to the optional settings file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

/// Directory holding the log file.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("battle.log"))
}
