//! Analysis history widget.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::{list_title, render_loading, truncate};
use crate::analysis::{AnalysisStats, preview, relative_time};
use crate::state::{HistoryRow, Store};
use crate::ui::Theme;

/// Stored analyses, flat or grouped by match.
pub struct HistoryList;

impl HistoryList {
    /// Render the stats header, the current page and the pager.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let state = &store.history;
        let now = Utc::now();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let mut stats = state.stats(now);
        if let Some(total) = state.total {
            stats.total = total as usize;
        }
        render_stats(frame, chunks[0], &stats, theme);

        let rows = state.page_rows();
        let label = if state.grouped { "Matches" } else { "Analyses" };
        let block = Block::default()
            .title(list_title(label, state.rows().len(), state.analyses.len(), store))
            .borders(Borders::ALL)
            .border_style(theme.border());

        if rows.is_empty() && !state.loading {
            let hint = if state.analyses.is_empty() {
                "No analyses yet."
            } else {
                "No analyses found for this search."
            };
            frame.render_widget(
                Paragraph::new(Line::styled(hint, theme.muted())).block(block),
                chunks[1],
            );
        } else {
            let header_cells = ["Match", "Analyses", "Latest", "Preview"]
                .into_iter()
                .map(|h| Cell::from(h).style(theme.header()));
            let header = Row::new(header_cells).height(1).bottom_margin(1);

            let table_rows = rows.iter().map(|row| match row {
                HistoryRow::Analysis(a) => Row::new(vec![
                    Cell::from(truncate(&format!("{} vs {}", a.home_team, a.away_team), 40)),
                    Cell::from("1"),
                    Cell::from(relative_time(a.created_at, now)).style(theme.muted()),
                    Cell::from(single_line(&preview(&a.analysis_text, 80))),
                ]),
                HistoryRow::Group(g) => Row::new(vec![
                    Cell::from(truncate(&format!("{} vs {}", g.home_team, g.away_team), 40)),
                    Cell::from(g.total_analyses.to_string()).style(
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Cell::from(relative_time(g.latest_analysis, now)).style(theme.muted()),
                    Cell::from(
                        g.latest()
                            .map(|a| single_line(&preview(&a.analysis_text, 80)))
                            .unwrap_or_default(),
                    ),
                ]),
            });

            let table = Table::new(
                table_rows,
                [
                    Constraint::Percentage(35),
                    Constraint::Length(9),
                    Constraint::Length(16),
                    Constraint::Min(10),
                ],
            )
            .header(header)
            .block(block)
            .row_highlight_style(theme.selected())
            .highlight_symbol("▶ ");

            let mut table_state = TableState::default();
            table_state.select(state.selected_index);
            frame.render_stateful_widget(table, chunks[1], &mut table_state);
        }

        let pager = Line::from(vec![
            Span::styled(
                format!(" Page {}/{}", state.page + 1, state.page_count()),
                theme.muted(),
            ),
            Span::styled(format!("  ·  Sort: {}", state.sort.label()), theme.muted()),
            Span::styled(
                if state.grouped {
                    "  ·  Grouped by match"
                } else {
                    "  ·  All analyses"
                },
                theme.muted(),
            ),
        ]);
        frame.render_widget(Paragraph::new(pager), chunks[2]);

        if state.loading {
            render_loading(frame, chunks[1], "Loading...", theme);
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &AnalysisStats, theme: &Theme) {
    let cells = [
        ("Total", stats.total, theme.primary),
        ("Today", stats.today, theme.success),
        ("Yesterday", stats.yesterday, theme.warning),
        ("Matches", stats.unique_matches, theme.accent),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), column) in cells.into_iter().zip(columns.iter()) {
        let line = Line::from(vec![
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {label}"), theme.muted()),
        ]);
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.muted()),
        );
        frame.render_widget(paragraph, *column);
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
