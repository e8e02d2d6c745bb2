// Battle tab state management.
// Collects two usernames, scores both players, and ranks them.

use std::sync::Arc;

use futures::try_join;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::github::{ProfileSource, Repository, User};

use super::loading::LoadingState;

/// Weight of each follower in a player's score.
const FOLLOWER_WEIGHT: u64 = 3;

/// Which of the two input panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(&self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerSlot::One => "Player One",
            PlayerSlot::Two => "Player Two",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Text buffer plus the username it was submitted as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub buffer: String,
    pub username: Option<String>,
}

/// A scored player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub profile: User,
    pub score: u64,
}

/// Both players, highest score first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub players: [Player; 2],
}

impl BattleOutcome {
    pub fn winner(&self) -> &Player {
        &self.players[0]
    }

    pub fn loser(&self) -> &Player {
        &self.players[1]
    }

    pub fn is_tie(&self) -> bool {
        self.players[0].score == self.players[1].score
    }
}

/// Total stars across a user's repositories.
pub fn star_count(repos: &[Repository]) -> u64 {
    repos.iter().map(|r| r.stargazers_count).sum()
}

pub fn score(followers: u64, repos: &[Repository]) -> u64 {
    followers * FOLLOWER_WEIGHT + star_count(repos)
}

async fn player_data<S: ProfileSource + ?Sized>(source: &S, username: &str) -> Result<Player> {
    let (profile, repos) = try_join!(source.get_user(username), source.get_user_repos(username))?;
    let score = score(profile.followers, &repos);
    debug!(%username, score, repos = repos.len(), "player scored");
    Ok(Player { profile, score })
}

/// Fetch and score both players, ranking them by score.
///
/// Ties keep player one first.
pub async fn battle<S: ProfileSource + ?Sized>(
    source: &S,
    usernames: [&str; 2],
) -> Result<BattleOutcome> {
    let (one, two) = try_join!(
        player_data(source, usernames[0]),
        player_data(source, usernames[1])
    )?;

    let players = if two.score > one.score {
        [two, one]
    } else {
        [one, two]
    };
    Ok(BattleOutcome { players })
}

/// Completed battle delivered back to the UI thread.
#[derive(Debug)]
pub struct BattleReport {
    round: u64,
    result: Result<BattleOutcome>,
}

/// Sub-view of the Battle tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleView {
    #[default]
    Input,
    Results,
}

/// Complete state for the battle tab.
pub struct BattleState<S> {
    pub players: [PlayerInput; 2],
    pub focus: PlayerSlot,
    /// Whether key presses go into the focused buffer.
    pub editing: bool,
    pub view: BattleView,
    pub result: LoadingState<BattleOutcome>,
    round: u64,
    source: Arc<S>,
    reports: UnboundedSender<BattleReport>,
}

impl<S: ProfileSource> BattleState<S> {
    pub fn new(source: Arc<S>) -> (Self, UnboundedReceiver<BattleReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Self {
            players: Default::default(),
            focus: PlayerSlot::One,
            editing: false,
            view: BattleView::Input,
            result: LoadingState::Idle,
            round: 0,
            source,
            reports: tx,
        };
        (state, rx)
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerInput {
        &self.players[slot.index()]
    }

    fn focused_mut(&mut self) -> &mut PlayerInput {
        &mut self.players[self.focus.index()]
    }

    /// Start editing the focused slot if it has no submitted username.
    pub fn begin_edit(&mut self) {
        if self.view == BattleView::Input && self.player(self.focus).username.is_none() {
            self.editing = true;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    pub fn push_char(&mut self, c: char) {
        if self.editing {
            self.focused_mut().buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.editing {
            self.focused_mut().buffer.pop();
        }
    }

    /// Submit the focused buffer. Blank input is rejected.
    pub fn submit(&mut self) -> bool {
        let input = self.focused_mut();
        let username = input.buffer.trim().to_string();
        if username.is_empty() {
            return false;
        }

        info!(slot = self.focus.label(), %username, "player submitted");
        let input = self.focused_mut();
        input.username = Some(username);
        input.buffer.clear();
        self.editing = false;

        // Move on to the other panel if it still needs a name.
        if self.player(self.focus.other()).username.is_none() {
            self.focus = self.focus.other();
        }
        true
    }

    pub fn reset_player(&mut self, slot: PlayerSlot) {
        self.players[slot.index()] = PlayerInput::default();
        self.focus = slot;
    }

    pub fn toggle_focus(&mut self) {
        if !self.editing {
            self.focus = self.focus.other();
        }
    }

    /// Both players have submitted usernames.
    pub fn ready(&self) -> bool {
        self.players.iter().all(|p| p.username.is_some())
    }

    /// Start a battle between the submitted players.
    ///
    /// Returns false unless both players are ready.
    pub fn start(&mut self) -> bool {
        let (Some(one), Some(two)) = (
            self.players[0].username.clone(),
            self.players[1].username.clone(),
        ) else {
            return false;
        };

        self.round += 1;
        self.view = BattleView::Results;
        self.result = LoadingState::Loading;
        info!(%one, %two, round = self.round, "battle started");

        let round = self.round;
        let source = Arc::clone(&self.source);
        let tx = self.reports.clone();
        tokio::spawn(async move {
            let result = battle(&*source, [one.as_str(), two.as_str()]).await;
            if tx.send(BattleReport { round, result }).is_err() {
                debug!(round, "battle view dropped before completion");
            }
        });
        true
    }

    /// Apply a finished battle. Reports from an abandoned round are ignored.
    pub fn finish(&mut self, report: BattleReport) {
        if report.round != self.round || self.view != BattleView::Results {
            debug!(round = report.round, "ignoring stale battle report");
            return;
        }

        self.result = match report.result {
            Ok(outcome) => LoadingState::Loaded(outcome),
            Err(e) => {
                warn!(error = %e, "battle failed");
                LoadingState::Error(e.to_string())
            }
        };
    }

    /// Back to the input view with both players cleared.
    pub fn reset(&mut self) {
        self.players = Default::default();
        self.focus = PlayerSlot::One;
        self.editing = false;
        self.view = BattleView::Input;
        self.result = LoadingState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BattleError;
    use crate::state::cache::tests::repo;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn user(login: &str, followers: u64) -> User {
        User {
            login: login.to_string(),
            name: None,
            avatar_url: None,
            html_url: format!("https://github.com/{}", login),
            location: None,
            company: None,
            followers,
            following: 0,
            public_repos: 0,
        }
    }

    #[derive(Default)]
    struct MockProfiles {
        users: HashMap<String, (User, Vec<Repository>)>,
    }

    impl MockProfiles {
        fn with(mut self, login: &str, followers: u64, stars: &[u64]) -> Self {
            let repos = stars.iter().map(|s| repo(login, *s)).collect();
            self.users
                .insert(login.to_string(), (user(login, followers), repos));
            self
        }
    }

    #[async_trait]
    impl ProfileSource for MockProfiles {
        async fn get_user(&self, username: &str) -> Result<User> {
            self.users
                .get(username)
                .map(|(u, _)| u.clone())
                .ok_or_else(|| BattleError::UserNotFound(username.to_string()))
        }

        async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
            self.users
                .get(username)
                .map(|(_, r)| r.clone())
                .ok_or_else(|| BattleError::UserNotFound(username.to_string()))
        }
    }

    #[test]
    fn test_score() {
        let repos = vec![repo("a", 10), repo("b", 5)];
        assert_eq!(star_count(&repos), 15);
        assert_eq!(score(4, &repos), 27);
        assert_eq!(score(0, &[]), 0);
    }

    #[tokio::test]
    async fn test_battle_ranks_by_score() {
        let source = MockProfiles::default()
            .with("alice", 1, &[1])
            .with("bob", 10, &[100, 20]);

        let outcome = battle(&source, ["alice", "bob"]).await.unwrap();
        assert_eq!(outcome.winner().profile.login, "bob");
        assert_eq!(outcome.winner().score, 150);
        assert_eq!(outcome.loser().profile.login, "alice");
        assert_eq!(outcome.loser().score, 4);
        assert!(!outcome.is_tie());
    }

    #[tokio::test]
    async fn test_battle_tie_keeps_player_one_first() {
        let source = MockProfiles::default()
            .with("alice", 2, &[4])
            .with("bob", 1, &[7]);

        let outcome = battle(&source, ["alice", "bob"]).await.unwrap();
        assert!(outcome.is_tie());
        assert_eq!(outcome.winner().profile.login, "alice");
    }

    #[tokio::test]
    async fn test_battle_unknown_user() {
        let source = MockProfiles::default().with("alice", 1, &[]);
        let err = battle(&source, ["alice", "ghost"]).await.unwrap_err();
        assert_eq!(err.to_string(), "ghost doesn't exist");
    }

    #[tokio::test]
    async fn test_input_flow() {
        let (mut state, _rx) = BattleState::new(Arc::new(MockProfiles::default()));

        // Typing is ignored until editing starts.
        state.push_char('x');
        assert_eq!(state.player(PlayerSlot::One).buffer, "");

        state.begin_edit();
        assert!(!state.submit());
        for c in "  alice ".chars() {
            state.push_char(c);
        }
        state.pop_char();
        assert!(state.submit());
        assert_eq!(state.player(PlayerSlot::One).username.as_deref(), Some("alice"));
        assert_eq!(state.focus, PlayerSlot::Two);
        assert!(!state.editing);
        assert!(!state.ready());

        state.begin_edit();
        "bob".chars().for_each(|c| state.push_char(c));
        assert!(state.submit());
        assert!(state.ready());

        // Submitted slots cannot be edited until reset.
        state.begin_edit();
        assert!(!state.editing);
        state.reset_player(PlayerSlot::One);
        assert!(!state.ready());
        assert_eq!(state.focus, PlayerSlot::One);
    }

    #[tokio::test]
    async fn test_start_requires_both_players() {
        let (mut state, _rx) = BattleState::new(Arc::new(MockProfiles::default()));
        assert!(!state.start());
        assert_eq!(state.view, BattleView::Input);
        assert_eq!(state.result, LoadingState::Idle);
    }

    fn ready_state(
        source: MockProfiles,
    ) -> (BattleState<MockProfiles>, UnboundedReceiver<BattleReport>) {
        let (mut state, rx) = BattleState::new(Arc::new(source));
        state.players[0].username = Some("alice".to_string());
        state.players[1].username = Some("bob".to_string());
        (state, rx)
    }

    #[tokio::test]
    async fn test_start_and_finish() {
        let source = MockProfiles::default()
            .with("alice", 5, &[50])
            .with("bob", 1, &[1]);
        let (mut state, mut rx) = ready_state(source);

        assert!(state.start());
        assert!(state.result.is_loading());
        state.finish(rx.recv().await.unwrap());

        let outcome = state.result.data().unwrap();
        assert_eq!(outcome.winner().profile.login, "alice");
        assert_eq!(outcome.winner().score, 65);
    }

    #[tokio::test]
    async fn test_failed_battle_reports_error() {
        let source = MockProfiles::default().with("alice", 5, &[50]);
        let (mut state, mut rx) = ready_state(source);

        state.start();
        state.finish(rx.recv().await.unwrap());
        assert_eq!(state.result.error(), Some("bob doesn't exist"));
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_round() {
        let source = MockProfiles::default()
            .with("alice", 5, &[50])
            .with("bob", 1, &[1]);
        let (mut state, mut rx) = ready_state(source);

        state.start();
        state.reset();
        state.finish(rx.recv().await.unwrap());

        assert_eq!(state.view, BattleView::Input);
        assert_eq!(state.result, LoadingState::Idle);
        assert!(!state.ready());
    }
}
