//! TUI widgets.

mod analysis_detail;
mod help;
mod history_list;
mod match_list;
mod notifications;
mod status_bar;
mod tab_bar;

pub use analysis_detail::{AnalysisDetail, markup_to_lines};
pub use help::HelpPanel;
pub use history_list::HistoryList;
pub use match_list::MatchList;
pub use notifications::{render_error, render_notification};
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Theme;
use crate::state::Store;

/// Block title with counts and, while editing, the live search input.
fn list_title(label: &str, shown: usize, total: usize, store: &Store) -> String {
    let mut title = if shown == total {
        format!(" {label} ({total}) ")
    } else {
        format!(" {label} ({shown} of {total}) ")
    };
    if store.app.is_editing() {
        title.push_str(&format!("· /{}▏ ", store.app.input_buffer));
    }
    title
}

/// Cut to `max_chars` characters with a trailing ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn render_loading(frame: &mut Frame, area: Rect, label: &str, theme: &Theme) {
    let width = (label.chars().count() as u16 + 2).min(area.width.saturating_sub(2));
    if width == 0 || area.height < 3 {
        return;
    }

    let loading = Line::from(vec![Span::styled(
        label.to_string(),
        Style::default()
            .fg(theme.warning)
            .add_modifier(Modifier::ITALIC),
    )]);

    // Bottom right, inside the border.
    let loading_area = Rect {
        x: area.x + area.width - 1 - width,
        y: area.y + area.height - 2,
        width,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}
