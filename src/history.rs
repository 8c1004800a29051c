//! Recent searches: most-recent-first, unique, at most [`MAX_RECENT_SEARCHES`] entries.

use crate::error::StorageError;
use crate::storage::{KeyValueStore, RECENT_SEARCHES_KEY};

pub const MAX_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    cities: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted list. Corrupt data is logged and treated as empty.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(saved) = store.get(RECENT_SEARCHES_KEY) else {
            return Self::new();
        };

        let saved: Vec<String> = match serde_json::from_str(&saved) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Discarding unreadable recent searches: {}", e);
                return Self::new();
            }
        };

        let mut cities: Vec<String> = Vec::with_capacity(MAX_RECENT_SEARCHES);
        for city in saved.iter().map(|c| normalize_city(c)) {
            if !city.is_empty() && !cities.contains(&city) {
                cities.push(city);
            }
        }
        cities.truncate(MAX_RECENT_SEARCHES);

        Self { cities }
    }

    /// Move (or insert) `city` to the front, evicting the oldest past the cap.
    pub fn record<S: KeyValueStore + ?Sized>(&mut self, city: &str, store: &mut S) {
        let city = normalize_city(city);
        self.cities.retain(|c| c != &city);
        self.cities.insert(0, city);
        self.cities.truncate(MAX_RECENT_SEARCHES);
        self.persist(store);
    }

    /// Empty the list and drop the persisted record entirely.
    pub fn clear<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        self.cities.clear();
        if let Err(e) = store.remove(RECENT_SEARCHES_KEY) {
            tracing::warn!("Failed to remove recent searches: {}", e);
        }
    }

    pub fn list(&self) -> &[String] {
        &self.cities
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cities.get(index).map(String::as_str)
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        let result = serde_json::to_string(&self.cities)
            .map_err(StorageError::from)
            .and_then(|encoded| store.set(RECENT_SEARCHES_KEY, &encoded));
        if let Err(e) = result {
            tracing::warn!("Failed to persist recent searches: {}", e);
        }
    }
}

/// First character upper case, the rest lower case.
pub fn normalize_city(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
