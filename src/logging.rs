// File-based tracing setup.
// The terminal belongs to the TUI, so log output goes to the cache directory.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config;
use crate::error::{BattleError, Result};

/// Install the global subscriber writing to the default log path.
pub fn init(filter: &str) -> Result<()> {
    let path = config::log_path()
        .ok_or_else(|| BattleError::Other("no cache directory available".to_string()))?;
    init_at(&path, filter)
}

/// Install the global subscriber writing to `path`.
pub fn init_at(path: &Path, filter: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter =
        EnvFilter::try_new(filter).map_err(|e| BattleError::Config(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| BattleError::Other(e.to_string()))
}
