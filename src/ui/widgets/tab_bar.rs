//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::config::KeyBindings;
use crate::state::{Store, View};
use crate::ui::Theme;

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, keys: &KeyBindings, theme: &Theme) {
        let tabs = [
            (keys.matches.as_str(), "Matches", View::Matches),
            (keys.history.as_str(), "History", View::History),
        ];

        let mut spans = vec![Span::raw(" ")];

        for (key, name, view) in tabs {
            let is_selected = store.app.current_view == view;
            let name_style = if is_selected {
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };

            spans.push(Span::styled(format!("[{key}] "), theme.muted()));
            spans.push(Span::styled(name, name_style));
            spans.push(Span::raw("  "));
        }

        if store.app.current_view == View::Detail
            && let Some(target) = &store.detail.target
        {
            spans.push(Span::styled("› ", theme.muted()));
            spans.push(Span::styled(
                detail_title(&target.home_team, &target.away_team, &target.match_id),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// "Home vs Away", or the match id while team names are unknown.
pub fn detail_title(home: &str, away: &str, match_id: &str) -> String {
    if home.is_empty() && away.is_empty() {
        format!("Match {match_id}")
    } else {
        format!("{home} vs {away}")
    }
}
