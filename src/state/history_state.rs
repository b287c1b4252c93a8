//! State of the analysis history screen.

use chrono::{DateTime, Utc};

use crate::analysis::{AnalysisStats, GroupedMatch, SortOrder, filter, group_by_match};
use crate::api::ScreenshotAnalysis;

/// A row of the history list: either one analysis or one match bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryRow<'a> {
    Analysis(&'a ScreenshotAnalysis),
    Group(GroupedMatch),
}

/// State for the analysis history.
#[derive(Debug)]
pub struct HistoryState {
    /// All loaded analyses, as received.
    pub analyses: Vec<ScreenshotAnalysis>,
    /// Server-side total, when reported.
    pub total: Option<u64>,
    /// Search over team names and text.
    pub search_query: Option<String>,
    /// List ordering.
    pub sort: SortOrder,
    /// Show one row per match instead of per analysis.
    pub grouped: bool,
    /// Zero-based page.
    pub page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Selected row within the current page.
    pub selected_index: Option<usize>,
    /// Whether analyses are loading.
    pub loading: bool,
    /// When the list was last replaced.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            analyses: Vec::new(),
            total: None,
            search_query: None,
            sort: SortOrder::default(),
            grouped: false,
            page: 0,
            per_page: 10,
            selected_index: None,
            loading: false,
            last_updated: None,
        }
    }
}

impl HistoryState {
    /// Create an empty history with the given page size.
    pub fn with_page_size(per_page: usize) -> Self {
        Self {
            per_page,
            ..Default::default()
        }
    }

    /// Analyses passing the search, in the selected order.
    pub fn visible_analyses(&self) -> Vec<&ScreenshotAnalysis> {
        let mut visible =
            filter::search_analyses(&self.analyses, self.search_query.as_deref().unwrap_or(""));
        filter::sort_analyses(&mut visible, self.sort);
        visible
    }

    /// Visible analyses folded per match.
    pub fn groups(&self) -> Vec<GroupedMatch> {
        let visible: Vec<ScreenshotAnalysis> =
            self.visible_analyses().into_iter().cloned().collect();
        let mut groups = group_by_match(&visible);
        if self.sort == SortOrder::Team {
            groups.sort_by_cached_key(|g| g.home_team.to_lowercase());
        }
        groups
    }

    /// All rows in display order, before paging.
    pub fn rows(&self) -> Vec<HistoryRow<'_>> {
        if self.grouped {
            self.groups().into_iter().map(HistoryRow::Group).collect()
        } else {
            self.visible_analyses()
                .into_iter()
                .map(HistoryRow::Analysis)
                .collect()
        }
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<HistoryRow<'_>> {
        let rows = self.rows();
        filter::paginate(&rows, self.page, self.per_page).to_vec()
    }

    pub fn page_count(&self) -> usize {
        filter::page_count(self.rows().len(), self.per_page)
    }

    /// The match behind the selected row.
    pub fn selected_match_id(&self) -> Option<String> {
        let rows = self.page_rows();
        let row = rows.get(self.selected_index?)?;
        Some(match row {
            HistoryRow::Analysis(a) => a.match_id.clone(),
            HistoryRow::Group(g) => g.match_id.clone(),
        })
    }

    /// The analysis (or newest analysis of the group) behind the selected row.
    pub fn selected_analysis(&self) -> Option<ScreenshotAnalysis> {
        let rows = self.page_rows();
        match rows.get(self.selected_index?)? {
            HistoryRow::Analysis(a) => Some((*a).clone()),
            HistoryRow::Group(g) => g.latest().cloned(),
        }
    }

    /// Header counters relative to `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> AnalysisStats {
        AnalysisStats::compute(&self.analyses, now)
    }

    /// Replace the list after a fetch.
    pub fn replace(&mut self, analyses: Vec<ScreenshotAnalysis>, total: Option<u64>, now: DateTime<Utc>) {
        self.analyses = analyses;
        self.total = total;
        self.last_updated = Some(now);
        self.reset_position();
    }

    /// Go back to the first page after the row set changed.
    pub fn reset_position(&mut self) {
        self.page = 0;
        self.selected_index = if self.rows().is_empty() { None } else { Some(0) };
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected_index = Some(0);
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected_index = Some(0);
        }
    }

    /// Move the selection within the page by `delta`.
    pub fn move_selection(&mut self, delta: i32) {
        let len = self.page_rows().len();
        if len == 0 {
            self.selected_index = None;
            return;
        }
        let current = self.selected_index.unwrap_or(0) as i32;
        self.selected_index = Some((current + delta).clamp(0, len as i32 - 1) as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn analysis(id: &str, match_id: &str, home: &str, minutes: i64) -> ScreenshotAnalysis {
        ScreenshotAnalysis {
            id: id.to_string(),
            match_id: match_id.to_string(),
            home_team: home.to_string(),
            away_team: "Visitante".to_string(),
            match_url: String::new(),
            analysis_text: String::new(),
            screenshot_filename: None,
            analysis_type: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            updated_at: None,
        }
    }

    fn loaded() -> HistoryState {
        let mut state = HistoryState::with_page_size(2);
        state.replace(
            vec![
                analysis("a1", "m1", "Santos", 0),
                analysis("a2", "m2", "Bahia", 10),
                analysis("a3", "m1", "Santos", 20),
                analysis("a4", "m3", "Ceará", 5),
            ],
            Some(4),
            Utc::now(),
        );
        state
    }

    #[test]
    fn test_flat_rows_are_paged() {
        let mut state = loaded();
        assert_eq!(state.page_count(), 2);
        let ids: Vec<_> = state
            .page_rows()
            .iter()
            .map(|r| match r {
                HistoryRow::Analysis(a) => a.id.clone(),
                HistoryRow::Group(_) => unreachable!(),
            })
            .collect();
        assert_eq!(ids, vec!["a3", "a2"]);

        state.next_page();
        assert_eq!(state.page, 1);
        state.next_page();
        assert_eq!(state.page, 1);
        assert_eq!(state.selected_match_id().as_deref(), Some("m3"));
    }

    #[test]
    fn test_grouped_rows() {
        let mut state = loaded();
        state.grouped = true;
        state.reset_position();
        assert_eq!(state.rows().len(), 3);
        assert_eq!(state.selected_match_id().as_deref(), Some("m1"));
        assert_eq!(state.selected_analysis().unwrap().id, "a3");
    }

    #[test]
    fn test_search_resets_to_matching_rows() {
        let mut state = loaded();
        state.search_query = Some("bah".to_string());
        state.reset_position();
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.selected_match_id().as_deref(), Some("m2"));
    }

    #[test]
    fn test_team_sort_in_grouped_mode() {
        let mut state = loaded();
        state.grouped = true;
        state.sort = SortOrder::Team;
        let teams: Vec<_> = state
            .groups()
            .into_iter()
            .map(|g| g.home_team)
            .collect();
        assert_eq!(teams, vec!["Bahia", "Ceará", "Santos"]);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut state = loaded();
        state.move_selection(5);
        assert_eq!(state.selected_index, Some(1));
        state.move_selection(-9);
        assert_eq!(state.selected_index, Some(0));
    }
}
