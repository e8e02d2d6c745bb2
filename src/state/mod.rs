// State management module.
// Per-tab view state, the popular repositories cache, and subscriptions.

#![allow(dead_code)]

pub mod battle;
pub mod cache;
pub mod language;
pub mod loading;
pub mod observer;
pub mod popular;

pub use battle::{BattleOutcome, BattleReport, BattleState, BattleView, Player, PlayerSlot};
pub use language::Language;
pub use loading::LoadingState;
pub use popular::{FetchOutcome, PopularState, PopularStatus};
