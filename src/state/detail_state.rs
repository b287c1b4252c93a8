//! State of the match detail screen.

use chrono::{DateTime, Utc};

use crate::api::{DataAnalysis, MatchLink, ScreenshotAnalysis, ScreenshotCapture};

/// Identifies the match a detail screen is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTarget {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub match_url: String,
}

impl From<&MatchLink> for MatchTarget {
    fn from(link: &MatchLink) -> Self {
        Self {
            match_id: link.match_id.clone(),
            home_team: link.home_team.clone(),
            away_team: link.away_team.clone(),
            match_url: link.url.clone(),
        }
    }
}

impl From<&ScreenshotAnalysis> for MatchTarget {
    fn from(analysis: &ScreenshotAnalysis) -> Self {
        Self {
            match_id: analysis.match_id.clone(),
            home_team: analysis.home_team.clone(),
            away_team: analysis.away_team.clone(),
            match_url: analysis.match_url.clone(),
        }
    }
}

/// State for the selected match.
#[derive(Debug, Default)]
pub struct DetailState {
    /// Match being shown.
    pub target: Option<MatchTarget>,
    /// Stored analyses of the match, newest first.
    pub analyses: Vec<ScreenshotAnalysis>,
    /// Most recent generated analysis.
    pub latest: Option<DataAnalysis>,
    /// Most recent raw screenshot.
    pub capture: Option<ScreenshotCapture>,
    /// Selected stored analysis.
    pub selected_index: Option<usize>,
    /// Show full analysis text instead of the preview.
    pub expanded: bool,
    /// Vertical scroll of the analysis text.
    pub scroll: u16,
    /// Whether stored analyses are loading.
    pub loading: bool,
    /// Whether a generation or capture request is running.
    pub generating: bool,
    /// Whether the auto-refresh timer is active.
    pub auto_refresh: bool,
    /// When data for this match last arrived.
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl DetailState {
    /// Switch to a new match, discarding everything about the previous one.
    pub fn open(&mut self, target: MatchTarget) {
        let auto_refresh = self.auto_refresh && self.is_showing(&target.match_id);
        *self = Self {
            target: Some(target),
            auto_refresh,
            ..Default::default()
        };
    }

    /// Whether responses for `match_id` belong on this screen.
    pub fn is_showing(&self, match_id: &str) -> bool {
        self.target.as_ref().is_some_and(|t| t.match_id == match_id)
    }

    pub fn match_id(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.match_id.as_str())
    }

    /// Store a fetched list, newest first.
    pub fn set_analyses(&mut self, mut analyses: Vec<ScreenshotAnalysis>, now: DateTime<Utc>) {
        analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.fill_teams(analyses.first());
        self.analyses = analyses;
        self.loading = false;
        self.last_refreshed = Some(now);
        self.selected_index = match (self.analyses.len(), self.selected_index) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    /// Store a freshly generated analysis.
    pub fn set_latest(&mut self, analysis: DataAnalysis, now: DateTime<Utc>) {
        if let Some(target) = self.target.as_mut() {
            if target.home_team.is_empty()
                && let Some(home) = &analysis.home_team
            {
                target.home_team = home.clone();
            }
            if target.away_team.is_empty()
                && let Some(away) = &analysis.away_team
            {
                target.away_team = away.clone();
            }
        }
        self.latest = Some(analysis);
        self.generating = false;
        self.scroll = 0;
        self.last_refreshed = Some(now);
    }

    /// The stored analysis under the cursor.
    pub fn selected_analysis(&self) -> Option<&ScreenshotAnalysis> {
        self.selected_index.and_then(|i| self.analyses.get(i))
    }

    /// Text currently in focus: the generated analysis first, else the selection.
    pub fn focused_text(&self) -> Option<&str> {
        self.latest
            .as_ref()
            .map(|a| a.analysis_text.as_str())
            .or_else(|| self.selected_analysis().map(|a| a.analysis_text.as_str()))
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.analyses.is_empty() {
            self.selected_index = None;
            return;
        }
        let current = self.selected_index.unwrap_or(0) as i32;
        let max = self.analyses.len() as i32 - 1;
        self.selected_index = Some((current + delta).clamp(0, max) as usize);
        // Moving the cursor brings the stored analysis into focus.
        self.latest = None;
        self.scroll = 0;
    }

    fn fill_teams(&mut self, analysis: Option<&ScreenshotAnalysis>) {
        let (Some(target), Some(analysis)) = (self.target.as_mut(), analysis) else {
            return;
        };
        if target.home_team.is_empty() {
            target.home_team = analysis.home_team.clone();
        }
        if target.away_team.is_empty() {
            target.away_team = analysis.away_team.clone();
        }
        if target.match_url.is_empty() {
            target.match_url = analysis.match_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn target(id: &str) -> MatchTarget {
        MatchTarget {
            match_id: id.to_string(),
            ..Default::default()
        }
    }

    fn analysis(id: &str, minutes: i64) -> ScreenshotAnalysis {
        ScreenshotAnalysis {
            id: id.to_string(),
            match_id: "m1".to_string(),
            home_team: "Fortaleza".to_string(),
            away_team: "Sport".to_string(),
            match_url: "https://www.sofascore.com/m#id:1".to_string(),
            analysis_text: format!("text {id}"),
            screenshot_filename: None,
            analysis_type: None,
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            updated_at: None,
        }
    }

    #[test]
    fn test_open_resets_state() {
        let mut state = DetailState::default();
        state.open(target("m1"));
        state.auto_refresh = true;
        state.expanded = true;

        state.open(target("m1"));
        assert!(state.auto_refresh);
        assert!(!state.expanded);

        state.open(target("m2"));
        assert!(!state.auto_refresh);
        assert!(state.is_showing("m2"));
        assert!(!state.is_showing("m1"));
    }

    #[test]
    fn test_set_analyses_sorts_and_fills_target() {
        let mut state = DetailState::default();
        state.open(target("m1"));
        state.set_analyses(vec![analysis("old", 0), analysis("new", 30)], Utc::now());

        assert_eq!(state.analyses[0].id, "new");
        assert_eq!(state.selected_index, Some(0));
        let target = state.target.as_ref().unwrap();
        assert_eq!(target.home_team, "Fortaleza");
        assert_eq!(target.away_team, "Sport");
        assert_eq!(state.focused_text(), Some("text new"));
    }

    #[test]
    fn test_generated_analysis_takes_focus_until_cursor_moves() {
        let mut state = DetailState::default();
        state.open(target("m1"));
        state.set_analyses(vec![analysis("a", 0), analysis("b", 1)], Utc::now());
        state.set_latest(
            DataAnalysis {
                analysis_text: "fresh".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(state.focused_text(), Some("fresh"));

        state.move_selection(1);
        assert_eq!(state.focused_text(), Some("text a"));
    }
}
