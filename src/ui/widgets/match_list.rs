//! Match list widget.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::{list_title, render_loading, truncate};
use crate::analysis::relative_time;
use crate::api::{DataConverter, MatchLink, MatchStatus};
use crate::state::Store;
use crate::ui::Theme;

/// Latest collected matches.
pub struct MatchList;

impl MatchList {
    /// Render the match list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let state = &store.matches;
        let matches = state.filtered_matches();

        let mut title = list_title("Matches", matches.len(), state.matches.len(), store);
        if let Some(updated) = state.last_update() {
            title.push_str(&format!("· updated {} ", relative_time(updated, Utc::now())));
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border());

        if matches.is_empty() && !state.loading {
            let hint = if state.matches.is_empty() {
                "No matches collected yet. Press c to collect links."
            } else {
                "No matches found for this search."
            };
            let paragraph = Paragraph::new(Line::styled(hint, theme.muted())).block(block);
            frame.render_widget(paragraph, area);
        } else {
            let header_cells = ["Match", "Score", "Status", "Time", "ID"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme.header()));
            let header = Row::new(header_cells).height(1).bottom_margin(1);

            let rows = matches.iter().map(|link| match_row(link, theme));

            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(50),
                    Constraint::Length(9),
                    Constraint::Length(13),
                    Constraint::Length(8),
                    Constraint::Length(12),
                ],
            )
            .header(header)
            .block(block)
            .row_highlight_style(theme.selected())
            .highlight_symbol("▶ ");

            let mut table_state = TableState::default();
            table_state.select(state.selected_index);
            frame.render_stateful_widget(table, area, &mut table_state);
        }

        if state.collecting {
            render_loading(frame, area, "Collecting...", theme);
        } else if state.loading {
            render_loading(frame, area, "Loading...", theme);
        }
    }
}

fn match_row<'a>(link: &'a MatchLink, theme: &Theme) -> Row<'a> {
    let postponed = DataConverter::is_postponed(link);

    let (status, status_style) = if postponed {
        ("Postponed".to_string(), Style::default().fg(theme.warning))
    } else {
        match &link.match_status {
            Some(MatchStatus::InProgress) => (
                "● Live".to_string(),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
            Some(MatchStatus::Finished) => ("Finished".to_string(), theme.muted()),
            Some(status) => (status.to_string(), Style::default()),
            None => (String::new(), Style::default()),
        }
    };

    let score = DataConverter::score_line(link).unwrap_or_else(|| "vs".to_string());

    Row::new(vec![
        Cell::from(truncate(&format!("{} vs {}", link.home_team, link.away_team), 60)),
        Cell::from(score),
        Cell::from(status).style(status_style),
        Cell::from(link.match_time.clone().unwrap_or_default()),
        Cell::from(link.match_id.as_str()).style(theme.muted()),
    ])
    .height(1)
}
