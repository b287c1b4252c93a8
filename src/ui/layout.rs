//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top).
    pub status_area: Rect,
    /// Tab bar area.
    pub tab_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Notification area (overlaid, centered).
    pub notification_area: Rect,
    /// Error area (overlaid, bottom of the main area).
    pub error_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Tab bar
                Constraint::Min(0),    // Main content
            ])
            .split(area);

        let popup_height = 3.min(area.height);
        let notification_area = Rect {
            x: area.x + area.width / 4,
            y: area.y + (area.height / 2).saturating_sub(popup_height / 2),
            width: area.width / 2,
            height: popup_height,
        };

        let main = chunks[2];
        let error_height = 3.min(main.height);
        let error_area = Rect {
            x: main.x + main.width / 8,
            y: main.y + main.height.saturating_sub(error_height + 1),
            width: main.width - main.width / 4,
            height: error_height,
        };

        Self {
            status_area: chunks[0],
            tab_area: chunks[1],
            main_area: main,
            notification_area,
            error_area,
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
