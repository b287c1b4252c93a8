//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod theme;
mod widgets;

pub use layout::{Layout, centered_rect};
pub use theme::Theme;
pub use widgets::{
    AnalysisDetail, HelpPanel, HistoryList, MatchList, StatusBar, TabBar, markup_to_lines,
};

use crate::config::{Config, KeyBindings};
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui {
    theme: Theme,
    keybindings: KeyBindings,
}

impl Ui {
    pub fn new(config: &Config) -> Self {
        Self {
            theme: Theme::from(&config.theme),
            keybindings: config.keybindings.clone(),
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, store: &Store) {
        let layout = Layout::new(frame.area());
        let theme = &self.theme;

        StatusBar::render(frame, layout.status_area, store, theme);
        TabBar::render(frame, layout.tab_area, store, &self.keybindings, theme);

        // Render main content based on current view
        match store.app.current_view {
            View::Matches => MatchList::render(frame, layout.main_area, store, theme),
            View::History => HistoryList::render(frame, layout.main_area, store, theme),
            View::Detail => AnalysisDetail::render(frame, layout.main_area, store, theme),
        }

        // Render help panel if visible
        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &self.keybindings, theme);
        }

        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification, theme);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.error_area, error, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisPage, LatestLinks, MatchLink, ScreenshotAnalysis};
    use crate::state::{Action, MatchTarget};
    use chrono::Utc;
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    fn screen_text(store: &Store) -> String {
        let ui = Ui::new(&Config::default());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| ui.render(frame, store)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    #[test]
    fn test_matches_screen_lists_teams() {
        let mut store = store();
        store.reduce(Action::MatchesLoaded(LatestLinks {
            matches: vec![MatchLink {
                match_id: "777".to_string(),
                home_team: "Palmeiras".to_string(),
                away_team: "Corinthians".to_string(),
                ..Default::default()
            }],
            collection: None,
        }));

        let text = screen_text(&store);
        assert!(text.contains("Palmeiras vs Corinthians"));
        assert!(text.contains("Matches (1)"));
    }

    #[test]
    fn test_every_view_renders_empty_and_with_overlays() {
        let mut store = store();
        store.app.show_help = true;
        store.app.error = Some("HTTP 500: boom".to_string());
        for view in [View::Matches, View::History, View::Detail] {
            store.app.current_view = view;
            screen_text(&store);
        }
    }

    #[test]
    fn test_detail_screen_shows_analysis_text() {
        let mut store = store();
        store.reduce(Action::OpenDetail(MatchTarget {
            match_id: "42".to_string(),
            home_team: "Grêmio".to_string(),
            away_team: "Inter".to_string(),
            match_url: String::new(),
        }));
        store.reduce(Action::DetailLoaded {
            match_id: "42".to_string(),
            page: AnalysisPage {
                analyses: vec![ScreenshotAnalysis {
                    id: "1".to_string(),
                    match_id: "42".to_string(),
                    home_team: "Grêmio".to_string(),
                    away_team: "Inter".to_string(),
                    match_url: String::new(),
                    analysis_text: "## Clássico\nJogo **muito** truncado".to_string(),
                    screenshot_filename: None,
                    analysis_type: None,
                    created_at: Utc::now(),
                    updated_at: None,
                }],
                total: Some(1),
            },
        });

        let text = screen_text(&store);
        assert!(text.contains("Grêmio vs Inter"));
        assert!(text.contains("Clássico"));
        assert!(text.contains("Jogo muito truncado"));
    }
}
