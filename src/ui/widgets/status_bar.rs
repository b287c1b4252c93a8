//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::Store;
use crate::ui::Theme;

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let connection_status = if store.app.connected {
            Span::styled("● Connected", Style::default().fg(theme.success))
        } else {
            Span::styled("○ Disconnected", Style::default().fg(theme.error))
        };

        let mut left_content = vec![
            Span::styled(
                " ⚽ matchdesk ",
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            connection_status,
        ];

        if let Some(version) = &store.app.api_version {
            left_content.push(Span::styled(format!(" API v{version}"), theme.muted()));
        }

        if store.detail.auto_refresh {
            left_content.push(Span::raw(" | "));
            left_content.push(Span::styled(
                "⟳ Auto-refresh",
                Style::default().fg(theme.accent),
            ));
        }

        if store.is_loading() {
            left_content.push(Span::styled(
                " Loading... ",
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        // Pad so the help hint sits on the right edge.
        let left_len: usize = left_content.iter().map(|s| s.content.chars().count()).sum();
        let right_len = help_hint.content.chars().count();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        left_content.push(Span::raw(" ".repeat(padding)));
        left_content.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(left_content)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
