// Per-language result cache with in-flight tracking.
// A key is either cached, in flight, or absent; failed fetches leave it absent.

use std::collections::{HashMap, HashSet};

use crate::github::Repository;

use super::language::Language;

/// Memoized popular repositories keyed by language.
#[derive(Debug, Default)]
pub struct RepoCache {
    entries: HashMap<Language, Vec<Repository>>,
    in_flight: HashSet<Language>,
}

impl RepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: Language) -> Option<&[Repository]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: Language) -> bool {
        self.entries.contains_key(&key)
    }

    /// Store a result set. An existing entry for the key is kept.
    pub fn insert(&mut self, key: Language, repos: Vec<Repository>) {
        self.entries.entry(key).or_insert(repos);
    }

    pub fn is_in_flight(&self, key: Language) -> bool {
        self.in_flight.contains(&key)
    }

    /// Mark a key in flight. Returns false if it was already cached or in flight.
    pub fn begin_fetch(&mut self, key: Language) -> bool {
        if self.contains(key) {
            return false;
        }
        self.in_flight.insert(key)
    }

    pub fn end_fetch(&mut self, key: Language) {
        self.in_flight.remove(&key);
    }
}

/// Rank repositories by star count, descending.
///
/// The sort is stable: equal counts keep their input order.
pub fn rank_repositories(mut repos: Vec<Repository>) -> Vec<Repository> {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos
}
