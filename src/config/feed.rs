//! Feed configuration: buffer capacity, highlights, favorites

use serde::Deserialize;

use crate::feed::DEFAULT_CAPACITY;

/// Feed settings
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Maximum messages kept in the feed window
    pub capacity: usize,
    /// Names whose @mentions are highlighted (without the leading @)
    pub highlight_terms: Vec<String>,
    /// Usernames decorated as favorites
    pub favorites: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            highlight_terms: Vec::new(),
            favorites: Vec::new(),
        }
    }
}

/// Feed settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileFeed {
    pub capacity: Option<usize>,
    pub highlight_terms: Option<Vec<String>>,
    pub favorites: Option<Vec<String>>,
}

impl FeedConfig {
    /// Create from file config with defaults
    ///
    /// `highlight_env` is the comma separated override from the environment.
    pub fn from_file(file: Option<FileFeed>, highlight_env: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let highlight_terms = highlight_env
            .map(|v| split_list(&v))
            .or(file.highlight_terms)
            .unwrap_or(defaults.highlight_terms);

        Self {
            capacity: file.capacity.unwrap_or(defaults.capacity).max(1),
            highlight_terms,
            favorites: file.favorites.unwrap_or(defaults.favorites),
        }
    }

    /// Case-insensitive favorite check
    pub fn is_favorite(&self, username: &str) -> bool {
        self.favorites
            .iter()
            .any(|f| f.eq_ignore_ascii_case(username))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
