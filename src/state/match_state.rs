//! State of the matches screen.

use chrono::{DateTime, Utc};

use crate::analysis::filter;
use crate::api::{CollectionInfo, MatchLink};

/// State for the latest collected matches.
#[derive(Debug, Default)]
pub struct MatchState {
    /// Matches from the latest collection.
    pub matches: Vec<MatchLink>,
    /// Metadata of the collection they came from.
    pub collection: Option<CollectionInfo>,
    /// Currently selected index into the filtered list.
    pub selected_index: Option<usize>,
    /// Team name filter.
    pub search_query: Option<String>,
    /// Whether the latest links are loading.
    pub loading: bool,
    /// Whether a fresh collection is running.
    pub collecting: bool,
    /// When the list was last replaced.
    pub last_updated: Option<DateTime<Utc>>,
}

impl MatchState {
    /// Matches passing the search filter.
    pub fn filtered_matches(&self) -> Vec<&MatchLink> {
        filter::search_matches(&self.matches, self.search_query.as_deref().unwrap_or(""))
    }

    /// Get the currently selected match.
    pub fn selected_match(&self) -> Option<&MatchLink> {
        self.selected_index
            .and_then(|i| self.filtered_matches().get(i).copied())
    }

    /// Timestamp to show as "last update": the collection time when known.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.collection
            .as_ref()
            .and_then(|c| c.collection_timestamp)
            .or(self.last_updated)
    }

    /// Replace the list, keeping the selection in range.
    pub fn replace(&mut self, matches: Vec<MatchLink>, now: DateTime<Utc>) {
        self.matches = matches;
        self.last_updated = Some(now);
        self.clamp_selection();
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered_matches().len();
        self.selected_index = match (len, self.selected_index) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
    }
}
