//! Event handler for processing input events.

use super::{EventConfig, InputEvent};
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, InputMode, Store, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Polling behaviour.
    config: EventConfig,
    /// Store reference for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Debug, Clone, Copy, Default)]
struct StoreSnapshot {
    input_mode: InputMode,
    current_view: View,
    show_help: bool,
    has_error: bool,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, config: EventConfig) -> Self {
        Self {
            keybindings,
            config,
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            show_help: store.app.show_help,
            has_error: store.app.error.is_some(),
        });
    }

    /// Get the next action from user input.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.config.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => return Ok(self.handle_key(key)),
                CrosstermEvent::Mouse(mouse) if self.config.mouse_capture => {
                    return Ok(self.handle_mouse(mouse));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn snapshot(&self) -> StoreSnapshot {
        self.store_snapshot.unwrap_or_default()
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let snapshot = self.snapshot();
        match snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, &snapshot),
            InputMode::Search => self.handle_search_mode(key),
        }
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_normal_mode(&self, key: KeyEvent, snapshot: &StoreSnapshot) -> Option<Action> {
        let input = InputEvent::from(key);
        let keys = &self.keybindings;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        // An open error popup swallows the back key first.
        if snapshot.has_error && input.matches(&keys.back) {
            return Some(Action::ClearError);
        }

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) {
            return Some(Action::ToggleHelp);
        }
        if snapshot.show_help {
            return input.matches(&keys.back).then_some(Action::Back);
        }
        if input.matches(&keys.back) || key.code == KeyCode::Backspace {
            return Some(Action::Back);
        }
        if input.matches(&keys.refresh) {
            return Some(Action::RefreshCurrent);
        }

        // View switching
        if input.matches(&keys.matches) {
            return Some(Action::SetView(View::Matches));
        }
        if input.matches(&keys.history) {
            return Some(Action::SetView(View::History));
        }

        // Navigation
        if input.matches(&keys.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if input.matches(&keys.prev_page) || key.code == KeyCode::PageUp {
            return Some(Action::PrevPage);
        }
        if input.matches(&keys.next_page) || key.code == KeyCode::PageDown {
            return Some(Action::NextPage);
        }
        if key.code == KeyCode::Home {
            return Some(Action::GoToTop);
        }
        if key.code == KeyCode::End {
            return Some(Action::GoToBottom);
        }

        // View-specific actions
        match snapshot.current_view {
            View::Matches => self.handle_matches_view(&input),
            View::History => self.handle_history_view(&input),
            View::Detail => self.handle_detail_view(&input),
        }
    }

    fn handle_matches_view(&self, input: &InputEvent) -> Option<Action> {
        let keys = &self.keybindings;
        if input.matches(&keys.select) {
            return Some(Action::OpenSelected);
        }
        if input.matches(&keys.search) {
            return Some(Action::SetInputMode(InputMode::Search));
        }
        if input.matches(&keys.collect) {
            return Some(Action::CollectLinks);
        }
        None
    }

    fn handle_history_view(&self, input: &InputEvent) -> Option<Action> {
        let keys = &self.keybindings;
        if input.matches(&keys.select) {
            return Some(Action::OpenSelected);
        }
        if input.matches(&keys.search) {
            return Some(Action::SetInputMode(InputMode::Search));
        }
        if input.matches(&keys.sort) {
            return Some(Action::ToggleSort);
        }
        if input.matches(&keys.group) {
            return Some(Action::ToggleGrouping);
        }
        None
    }

    fn handle_detail_view(&self, input: &InputEvent) -> Option<Action> {
        let keys = &self.keybindings;
        if input.matches(&keys.screenshot_analysis) {
            return Some(Action::GenerateScreenshotAnalysis);
        }
        if input.matches(&keys.screenshot) {
            return Some(Action::CaptureScreenshot);
        }
        if input.matches(&keys.data_analysis) {
            return Some(Action::GenerateDataAnalysis);
        }
        if input.matches(&keys.auto_refresh) {
            return Some(Action::ToggleAutoRefresh);
        }
        if input.matches(&keys.expand) || input.matches(&keys.select) {
            return Some(Action::ToggleExpand);
        }
        None
    }

    fn handle_search_mode(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Enter => Some(Action::SubmitSearch),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Left => Some(Action::InputLeft),
            KeyCode::Right => Some(Action::InputRight),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::InputChar(c))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn handler(snapshot: StoreSnapshot) -> EventHandler {
        let mut handler = EventHandler::new(KeyBindings::default(), EventConfig::default());
        handler.store_snapshot = Some(snapshot);
        handler
    }

    fn in_view(view: View) -> StoreSnapshot {
        StoreSnapshot {
            current_view: view,
            ..Default::default()
        }
    }

    #[test]
    fn test_view_specific_keys() {
        let matches = handler(in_view(View::Matches));
        assert!(matches!(
            matches.handle_key(press(KeyCode::Char('c'))),
            Some(Action::CollectLinks)
        ));
        assert!(matches!(
            matches.handle_key(press(KeyCode::Enter)),
            Some(Action::OpenSelected)
        ));

        let history = handler(in_view(View::History));
        assert!(matches!(
            history.handle_key(press(KeyCode::Char('g'))),
            Some(Action::ToggleGrouping)
        ));
        assert!(matches!(
            history.handle_key(press(KeyCode::Char('s'))),
            Some(Action::ToggleSort)
        ));
        assert!(history.handle_key(press(KeyCode::Char('c'))).is_none());

        let detail = handler(in_view(View::Detail));
        assert!(matches!(
            detail.handle_key(press(KeyCode::Char('t'))),
            Some(Action::ToggleAutoRefresh)
        ));
        assert!(matches!(
            detail.handle_key(press(KeyCode::Char('d'))),
            Some(Action::GenerateDataAnalysis)
        ));
    }

    #[test]
    fn test_search_mode_captures_characters() {
        let handler = handler(StoreSnapshot {
            input_mode: InputMode::Search,
            ..Default::default()
        });
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::InputChar('q'))
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Enter)),
            Some(Action::SubmitSearch)
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Esc)),
            Some(Action::CancelSearch)
        ));
    }

    #[test]
    fn test_error_popup_takes_escape() {
        let handler = handler(StoreSnapshot {
            current_view: View::Detail,
            has_error: true,
            ..Default::default()
        });
        assert!(matches!(
            handler.handle_key(press(KeyCode::Esc)),
            Some(Action::ClearError)
        ));
    }

    #[test]
    fn test_help_overlay_blocks_other_keys() {
        let handler = handler(StoreSnapshot {
            show_help: true,
            ..Default::default()
        });
        assert!(handler.handle_key(press(KeyCode::Char('j'))).is_none());
        assert!(matches!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
        assert!(matches!(
            handler.handle_key(press(KeyCode::Esc)),
            Some(Action::Back)
        ));
    }

    #[test]
    fn test_release_events_ignored() {
        let handler = handler(in_view(View::Matches));
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert!(handler.handle_key(key).is_none());
    }
}
