//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;
use crate::ui::Theme;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings, theme: &Theme) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let sections: [(&str, Vec<(String, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (format!("{}/↓", keys.down), "Move down"),
                    (format!("{}/↑", keys.up), "Move up"),
                    (format!("{}/{}", keys.prev_page, keys.next_page), "Previous/next page"),
                    ("Home/End".to_string(), "Go to top/bottom"),
                    (keys.select.clone(), "Open match"),
                    (keys.back.clone(), "Back"),
                ],
            ),
            (
                "Views",
                vec![
                    (keys.matches.clone(), "Matches"),
                    (keys.history.clone(), "Analysis history"),
                ],
            ),
            (
                "Lists",
                vec![
                    (keys.search.clone(), "Search by team"),
                    (keys.collect.clone(), "Collect fresh links"),
                    (keys.sort.clone(), "Sort by date/team"),
                    (keys.group.clone(), "Group by match"),
                    (keys.refresh.clone(), "Refresh"),
                ],
            ),
            (
                "Match",
                vec![
                    (keys.data_analysis.clone(), "Generate data analysis"),
                    (keys.screenshot_analysis.clone(), "Generate screenshot analysis"),
                    (keys.screenshot.clone(), "Capture screenshot"),
                    (keys.auto_refresh.clone(), "Toggle auto-refresh"),
                    (keys.expand.clone(), "Expand/collapse text"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (title, entries) in sections {
            help_text.push(Line::from(Span::styled(
                title,
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<8}"), Style::default().fg(theme.primary)),
                    Span::raw(description),
                ]));
            }
            help_text.push(Line::from(""));
        }
        help_text.push(Line::from(vec![
            Span::styled(format!("  {:<8}", keys.help), Style::default().fg(theme.primary)),
            Span::raw("Toggle help"),
        ]));
        help_text.push(Line::from(vec![
            Span::styled(format!("  {:<8}", keys.quit), Style::default().fg(theme.primary)),
            Span::raw("Quit"),
        ]));

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.warning)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
