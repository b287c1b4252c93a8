//! Match detail widget: stored analyses, the focused analysis text, and the
//! structured statistics of a generated data analysis.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use super::render_loading;
use crate::analysis::{Inline, LineKind, MarkupLine, format, relative_time, to_markup};
use crate::api::DataAnalysis;
use crate::state::{DetailState, Store};
use crate::ui::Theme;

/// The detail screen of one match.
pub struct AnalysisDetail;

impl AnalysisDetail {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, theme: &Theme) {
        let detail = &store.detail;
        let Some(target) = &detail.target else {
            let block = Block::default()
                .title(" Match ")
                .borders(Borders::ALL)
                .border_style(theme.border());
            frame.render_widget(
                Paragraph::new(Line::styled("No match selected.", theme.muted())).block(block),
                area,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let mut header = vec![Line::from(vec![
            Span::styled(
                super::tab_bar::detail_title(&target.home_team, &target.away_team, &target.match_id),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  #{}", target.match_id), theme.muted()),
        ])];
        let mut info = vec![Span::styled(target.match_url.clone(), theme.muted())];
        if let Some(at) = detail.last_refreshed {
            info.push(Span::styled(
                format!("  ·  refreshed {}", relative_time(at, Utc::now())),
                theme.muted(),
            ));
        }
        if let Some(name) = detail.capture.as_ref().and_then(|c| c.filename.as_deref()) {
            info.push(Span::styled(
                format!("  ·  screenshot {name}"),
                Style::default().fg(theme.success),
            ));
        }
        header.push(Line::from(info));
        frame.render_widget(
            Paragraph::new(header).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border()),
            ),
            chunks[0],
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        render_history(frame, body[0], detail, theme);

        let structured = detail
            .latest
            .as_ref()
            .filter(|a| !a.statistics.is_empty() || !a.events.is_empty());
        match structured {
            Some(analysis) => {
                let right = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(body[1]);
                render_text(frame, right[0], detail, store.preview_chars, theme);
                render_statistics(frame, right[1], analysis, theme);
            }
            None => render_text(frame, body[1], detail, store.preview_chars, theme),
        }

        if detail.generating {
            render_loading(frame, body[1], "Analyzing...", theme);
        } else if detail.loading {
            render_loading(frame, body[0], "Loading...", theme);
        }
    }
}

fn render_history(frame: &mut Frame, area: Rect, detail: &DetailState, theme: &Theme) {
    let now = Utc::now();
    let items: Vec<ListItem> = detail
        .analyses
        .iter()
        .map(|a| {
            let kind = a.analysis_type.as_deref().unwrap_or("analysis");
            ListItem::new(Line::from(vec![
                Span::raw(relative_time(a.created_at, now)),
                Span::styled(format!("  {kind}"), theme.muted()),
            ]))
        })
        .collect();

    let title = format!(" Analyses ({}) ", detail.analyses.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border());

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No analyses yet. Press d or a to generate one.",
                theme.muted(),
            ))
            .wrap(Wrap { trim: true })
            .block(block),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected())
        .highlight_symbol("▶ ");
    let mut state = ListState::default();
    // The generated analysis has focus; don't highlight a stored one.
    if detail.latest.is_none() {
        state.select(detail.selected_index);
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_text(frame: &mut Frame, area: Rect, detail: &DetailState, preview_chars: usize, theme: &Theme) {
    let title = if detail.latest.is_some() {
        " Latest analysis "
    } else {
        " Analysis "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border());

    let Some(text) = detail.focused_text() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let truncated = !detail.expanded && format::is_truncated(text, preview_chars);
    let shown = if truncated {
        format::preview(text, preview_chars)
    } else {
        text.to_string()
    };

    let mut lines = markup_to_lines(&to_markup(&shown), theme);
    if truncated {
        lines.push(Line::default());
        lines.push(Line::styled("Press e to read the full analysis", theme.muted()));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_statistics(frame: &mut Frame, area: Rect, analysis: &DataAnalysis, theme: &Theme) {
    let home = analysis.home_team.as_deref().unwrap_or("Home");
    let away = analysis.away_team.as_deref().unwrap_or("Away");

    let mut rows = Vec::new();
    for (category, stats) in &analysis.statistics {
        rows.push(Row::new(vec![Cell::from(category.clone()).style(theme.header())]));
        for (name, pair) in stats {
            rows.push(Row::new(vec![
                Cell::from(format!("  {name}")),
                Cell::from(pair.home.clone()),
                Cell::from(pair.away.clone()),
            ]));
        }
    }
    for (category, events) in &analysis.events {
        rows.push(Row::new(vec![Cell::from(category.clone()).style(theme.header())]));
        for event in events {
            let who = [event.player.as_deref(), event.team.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" · ");
            rows.push(Row::new(vec![
                Cell::from(format!("  {}", event.time.as_deref().unwrap_or("-"))),
                Cell::from(who),
                Cell::from(event.description.clone().unwrap_or_default()),
            ]));
        }
    }

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from(home.to_string()).style(theme.header()),
        Cell::from(away.to_string()).style(theme.header()),
    ]);

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(table, area);
}

/// Styled terminal lines for formatted analysis text.
pub fn markup_to_lines(markup: &[MarkupLine], theme: &Theme) -> Vec<Line<'static>> {
    markup
        .iter()
        .map(|line| {
            let base = match line.kind {
                LineKind::Heading(1) => Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                LineKind::Heading(_) => Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };

            let mut spans = match &line.kind {
                LineKind::Bullet => vec![Span::styled("  • ", Style::default().fg(theme.accent))],
                LineKind::Numbered(n) => {
                    vec![Span::styled(format!("  {n}. "), Style::default().fg(theme.accent))]
                }
                LineKind::Blank => return Line::default(),
                _ => Vec::new(),
            };

            spans.extend(line.spans.iter().map(|inline| match inline {
                Inline::Text(s) => Span::styled(s.clone(), base),
                Inline::Bold(s) => Span::styled(s.clone(), base.add_modifier(Modifier::BOLD)),
                Inline::Italic(s) => Span::styled(s.clone(), base.add_modifier(Modifier::ITALIC)),
            }));
            Line::from(spans)
        })
        .collect()
}
