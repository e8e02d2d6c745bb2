// GitHub Battle terminal client.
// Browse popular repositories by language and battle two GitHub users.

mod app;
mod config;
mod error;
mod github;
mod logging;
mod state;
mod theme;
mod ui;

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::App;
use crate::config::Settings;
use crate::github::GitHubClient;

#[tokio::main]
async fn main() -> error::Result<()> {
    let settings = Settings::load()?;

    if let Err(e) = logging::init(&settings.log_filter) {
        eprintln!("battle: logging disabled: {}", e);
    }
    info!(api = %settings.api_base_url, authenticated = settings.token.is_some(), "starting");

    let client = Arc::new(GitHubClient::new(&settings)?);
    let mut app = App::new(&settings, client);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    if let Err(e) = &result {
        warn!(error = %e, "terminal error");
    }
    info!("exiting");
    result.map_err(Into::into)
}
