// App state and main event loop.
// Manages tabs, theme, fetch completions, and keyboard input handling.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::config::Settings;
use crate::github::{ProfileSource, RepoSource};
use crate::state::{
    BattleReport, BattleState, BattleView, FetchOutcome, Language, PopularState, PopularStatus,
};
use crate::theme::ThemeContext;
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Popular,
    Battle,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Popular => "Popular",
            Tab::Battle => "Battle",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Popular => Tab::Battle,
            Tab::Battle => Tab::Popular,
        }
    }

    pub fn prev(&self) -> Self {
        self.next()
    }
}

/// Main application state.
pub struct App<C> {
    /// Currently active tab.
    pub active_tab: Tab,
    /// Theme shared by every renderer.
    pub theme: ThemeContext,
    pub popular: PopularState<C>,
    pub battle: BattleState<C>,
    /// Data source, kept for the rate limit display.
    pub client: Arc<C>,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    popular_rx: UnboundedReceiver<FetchOutcome>,
    battle_rx: UnboundedReceiver<BattleReport>,
    dirty: Rc<Cell<bool>>,
    started: Instant,
}

impl<C: RepoSource + ProfileSource> App<C> {
    /// Build the app and kick off the initial fetch for the default language.
    pub fn new(settings: &Settings, client: Arc<C>) -> Self {
        let (mut popular, popular_rx) =
            PopularState::new(Arc::clone(&client), settings.default_language);
        let (battle, battle_rx) = BattleState::new(Arc::clone(&client));

        let dirty = Rc::new(Cell::new(true));
        {
            let dirty = Rc::clone(&dirty);
            popular.subscribe(move |status: &PopularStatus| {
                debug!(?status, "popular state changed");
                dirty.set(true);
            });
        }
        popular.select(settings.default_language);

        Self {
            active_tab: Tab::default(),
            theme: ThemeContext::new(settings.theme),
            popular,
            battle,
            client,
            show_help: false,
            should_quit: false,
            popular_rx,
            battle_rx,
            dirty,
            started: Instant::now(),
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_completions();
            if self.dirty.replace(false) || self.is_animating() {
                terminal.draw(|frame| ui::draw(frame, self))?;
            }
            self.handle_events()?;
        }
        Ok(())
    }

    /// Time since startup, used to animate loading indicators.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether a loading indicator is on screen.
    fn is_animating(&self) -> bool {
        match self.active_tab {
            Tab::Popular => self.popular.is_loading(),
            Tab::Battle => self.battle.result.is_loading(),
        }
    }

    /// Apply every fetch that has completed since the last tick.
    pub fn drain_completions(&mut self) {
        while let Ok(outcome) = self.popular_rx.try_recv() {
            self.popular.apply(outcome);
        }
        while let Ok(report) = self.battle_rx.try_recv() {
            self.battle.finish(report);
            self.dirty.set(true);
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Resize(..) => self.dirty.set(true),
                _ => {}
            }
        }
        Ok(())
    }

    /// Dispatch a single key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.dirty.set(true);

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Text entry swallows everything else.
        if self.active_tab == Tab::Battle && self.battle.editing {
            self.handle_edit_key(key.code);
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('t') => self.theme.toggle(),
            KeyCode::Tab => self.active_tab = self.active_tab.next(),
            KeyCode::BackTab => self.active_tab = self.active_tab.prev(),
            code => match self.active_tab {
                Tab::Popular => self.handle_popular_key(code),
                Tab::Battle => self.handle_battle_key(code),
            },
        }
    }

    fn handle_popular_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.popular.select_prev_language(),
            KeyCode::Right | KeyCode::Char('l') => self.popular.select_next_language(),
            KeyCode::Up | KeyCode::Char('k') => self.popular.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.popular.select_next(),
            KeyCode::Char('r') => self.popular.retry(),
            KeyCode::Char(c) => {
                if let Some(language) = Language::from_digit(c) {
                    self.popular.select(language);
                }
            }
            _ => {}
        }
    }

    fn handle_battle_key(&mut self, code: KeyCode) {
        match self.battle.view {
            BattleView::Input => match code {
                KeyCode::Enter => {
                    if !self.battle.start() {
                        self.battle.begin_edit();
                    }
                }
                KeyCode::Char('i') => self.battle.begin_edit(),
                KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                    self.battle.toggle_focus()
                }
                KeyCode::Char('x') | KeyCode::Delete => {
                    self.battle.reset_player(self.battle.focus)
                }
                _ => {}
            },
            BattleView::Results => {
                if matches!(code, KeyCode::Esc | KeyCode::Char('r')) {
                    self.battle.reset();
                }
            }
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.battle.submit();
            }
            KeyCode::Esc => self.battle.cancel_edit(),
            KeyCode::Backspace => self.battle.pop_char(),
            KeyCode::Char(c) => self.battle.push_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BattleError, Result};
    use crate::github::{Repository, User};
    use crate::state::PlayerSlot;
    use crate::theme::Theme;
    use async_trait::async_trait;

    struct OfflineSource;

    #[async_trait]
    impl RepoSource for OfflineSource {
        async fn popular_repos(&self, _language: Language) -> Result<Vec<Repository>> {
            Err(BattleError::Other("offline".to_string()))
        }
    }

    #[async_trait]
    impl ProfileSource for OfflineSource {
        async fn get_user(&self, username: &str) -> Result<User> {
            Err(BattleError::UserNotFound(username.to_string()))
        }

        async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
            Err(BattleError::UserNotFound(username.to_string()))
        }
    }

    fn press(app: &mut App<OfflineSource>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App<OfflineSource> {
        let settings = Settings {
            default_language: Language::Ruby,
            theme: Theme::Dark,
            ..Settings::default()
        };
        App::new(&settings, Arc::new(OfflineSource))
    }

    #[tokio::test]
    async fn test_starts_on_default_language() {
        let app = app();
        assert_eq!(app.active_tab, Tab::Popular);
        assert_eq!(app.popular.active(), Language::Ruby);
        assert!(app.popular.is_loading());
        assert_eq!(app.theme.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_global_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::Battle);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_tab, Tab::Popular);

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme.theme(), Theme::Light);

        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_popular_language_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.popular.active(), Language::Python);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.popular.active(), Language::Java);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.popular.active(), Language::Python);
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_error_after_drain() {
        let mut app = app();
        let outcome = app.popular_rx.recv().await.unwrap();
        app.popular.apply(outcome);
        assert!(app.popular.error().is_some());

        press(&mut app, KeyCode::Char('r'));
        assert!(app.popular.error().is_none());
        assert!(app.popular.is_loading());
    }

    #[tokio::test]
    async fn test_typing_in_battle_does_not_trigger_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.battle.editing);

        for c in "quit".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.battle.player(PlayerSlot::One).username.as_deref(),
            Some("quit")
        );

        press(&mut app, KeyCode::Char('i'));
        "tab".chars().for_each(|c| press(&mut app, KeyCode::Char(c)));
        press(&mut app, KeyCode::Enter);
        assert!(app.battle.ready());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.battle.view, BattleView::Results);

        let report = app.battle_rx.recv().await.unwrap();
        app.battle.finish(report);
        assert_eq!(app.battle.result.error(), Some("quit doesn't exist"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.battle.view, BattleView::Input);
        assert!(!app.battle.ready());
    }
}
