// Popular repositories view state.
// Owns the selected language, the per-language cache, and the error line.
// Fetches run as tokio tasks and report back over a channel; their results are
// applied on the UI thread by `apply`.

use std::sync::Arc;

use ratatui::widgets::ListState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::github::{RepoSource, Repository};

use super::cache::{RepoCache, rank_repositories};
use super::language::Language;
use super::observer::{Observers, SubscriptionId};

/// Message shown when a popular repositories fetch fails.
pub const FETCH_ERROR: &str = "There was an error fetching the repositories.";

/// Completed fetch delivered back to the UI thread.
#[derive(Debug)]
pub struct FetchOutcome {
    pub key: Language,
    pub result: Result<Vec<Repository>>,
}

/// Status of the active language, passed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopularStatus {
    Loading(Language),
    Loaded { language: Language, count: usize },
    Failed { language: Language, message: String },
}

/// View state for the Popular tab.
pub struct PopularState<S> {
    active: Language,
    cache: RepoCache,
    error: Option<String>,
    source: Arc<S>,
    outcomes: UnboundedSender<FetchOutcome>,
    observers: Observers<PopularStatus>,
    /// Selection within the visible result list.
    pub list_state: ListState,
}

impl<S: RepoSource> PopularState<S> {
    /// Create an empty state. Nothing is fetched until the first `select`.
    pub fn new(source: Arc<S>, initial: Language) -> (Self, UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Self {
            active: initial,
            cache: RepoCache::new(),
            error: None,
            source,
            outcomes: tx,
            observers: Observers::default(),
            list_state: ListState::default(),
        };
        (state, rx)
    }

    pub fn active(&self) -> Language {
        self.active
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }

    /// Make `key` the active language, fetching it if nothing is cached.
    pub fn select(&mut self, key: Language) {
        info!(language = %key, "select language");
        self.active = key;
        self.error = None;
        self.reset_selection();

        if !self.cache.contains(key) {
            self.ensure_fetched(key);
        }
        self.notify();
    }

    /// Start a fetch for `key` unless it is cached or already in flight.
    ///
    /// Returns true when a new fetch was issued.
    pub fn ensure_fetched(&mut self, key: Language) -> bool {
        if !self.cache.begin_fetch(key) {
            debug!(language = %key, "fetch skipped, cached or in flight");
            return false;
        }

        debug!(language = %key, "fetch started");
        let source = Arc::clone(&self.source);
        let tx = self.outcomes.clone();
        tokio::spawn(async move {
            let result = source.popular_repos(key).await;
            if tx.send(FetchOutcome { key, result }).is_err() {
                debug!(language = %key, "view dropped before fetch completed");
            }
        });
        true
    }

    /// Apply a completed fetch.
    ///
    /// Stale results are cached even when their key is no longer active, but a
    /// stale failure never sets the error for a different active key.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { key, result } = outcome;
        self.cache.end_fetch(key);

        match result {
            Ok(repos) => {
                debug!(language = %key, count = repos.len(), "fetch completed");
                self.cache.insert(key, rank_repositories(repos));
                if key == self.active {
                    self.error = None;
                    self.reset_selection();
                }
            }
            Err(e) => {
                warn!(language = %key, error = %e, "Error fetching repos");
                if key == self.active {
                    self.error = Some(FETCH_ERROR.to_string());
                }
            }
        }
        self.notify();
    }

    /// Re-select the active language; retries a failed fetch.
    pub fn retry(&mut self) {
        self.select(self.active);
    }

    pub fn select_next_language(&mut self) {
        self.select(self.active.next());
    }

    pub fn select_prev_language(&mut self) {
        self.select(self.active.prev());
    }

    /// True while the active language has neither results nor an error.
    pub fn is_loading(&self) -> bool {
        !self.cache.contains(self.active) && self.error.is_none()
    }

    /// Ranked results for the active language, if loaded.
    pub fn current_result(&self) -> Option<&[Repository]> {
        self.cache.get(self.active)
    }

    pub fn status(&self) -> PopularStatus {
        if let Some(message) = &self.error {
            PopularStatus::Failed {
                language: self.active,
                message: message.clone(),
            }
        } else if let Some(repos) = self.current_result() {
            PopularStatus::Loaded {
                language: self.active,
                count: repos.len(),
            }
        } else {
            PopularStatus::Loading(self.active)
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&PopularStatus) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn select_next(&mut self) {
        let len = self.current_result().map_or(0, |r| r.len());
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.current_result().is_none_or(|r| r.is_empty()) {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    pub fn selected_repo(&self) -> Option<&Repository> {
        let index = self.list_state.selected()?;
        self.current_result()?.get(index)
    }

    fn reset_selection(&mut self) {
        let has_items = self.current_result().is_some_and(|r| !r.is_empty());
        self.list_state.select(has_items.then_some(0));
    }

    fn notify(&mut self) {
        let status = self.status();
        self.observers.notify(&status);
    }
}
