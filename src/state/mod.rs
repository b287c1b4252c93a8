//! State management for matchdesk.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Network calls never
//! touch the store directly; their results come back as actions.

mod app_state;
mod detail_state;
mod history_state;
mod match_state;
mod polling;

pub use app_state::{AppState, InputMode, View};
pub use detail_state::{DetailState, MatchTarget};
pub use history_state::{HistoryRow, HistoryState};
pub use match_state::MatchState;
pub use polling::Poller;

use crate::api::{
    AnalysisPage, ApiStatus, DataAnalysis, LatestLinks, MatchLink, ScreenshotCapture,
};
use crate::error::Result;
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Which request a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Status,
    Matches,
    Collect,
    History,
    Detail,
    ScreenshotAnalysis,
    Screenshot,
    DataAnalysis,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Status => "Status check",
            Self::Matches => "Loading matches",
            Self::Collect => "Link collection",
            Self::History => "Loading analyses",
            Self::Detail => "Loading match analyses",
            Self::ScreenshotAnalysis => "Screenshot analysis",
            Self::Screenshot => "Screenshot capture",
            Self::DataAnalysis => "Data analysis",
        };
        f.write_str(label)
    }
}

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    OpenDetail(MatchTarget),
    /// Open the detail screen for whatever is selected.
    OpenSelected,
    Back,
    SetInputMode(InputMode),

    // Search input
    InputChar(char),
    InputBackspace,
    InputLeft,
    InputRight,
    SubmitSearch,
    CancelSearch,

    // List navigation
    ScrollUp,
    ScrollDown,
    NextPage,
    PrevPage,
    GoToTop,
    GoToBottom,
    ToggleSort,
    ToggleGrouping,
    ToggleExpand,
    ToggleHelp,

    // Requests (performed by the app, flagged as loading here)
    CheckStatus,
    LoadMatches,
    CollectLinks,
    LoadHistory,
    /// Reload stored analyses and regenerate the data analysis of the open match.
    RefreshDetail,
    GenerateScreenshotAnalysis,
    CaptureScreenshot,
    GenerateDataAnalysis,
    /// Reload whatever the current view shows.
    RefreshCurrent,
    ToggleAutoRefresh,

    // Results
    StatusLoaded(ApiStatus),
    MatchesLoaded(LatestLinks),
    LinksCollected(Vec<MatchLink>),
    HistoryLoaded(AnalysisPage),
    DetailLoaded {
        match_id: String,
        page: AnalysisPage,
    },
    AnalysisGenerated {
        match_id: String,
        analysis: DataAnalysis,
    },
    ScreenshotCaptured {
        match_id: String,
        capture: ScreenshotCapture,
    },
    RequestFailed {
        kind: RequestKind,
        message: String,
    },
    AutoRefreshChanged(bool),

    // Feedback
    ShowNotification(Notification),
    DismissNotification,
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
    pub created_at: Instant,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    fn with_level(message: impl Into<String>, level: NotificationLevel, duration_secs: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration_secs,
            created_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Info, 3)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Success, 3)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Warning, 5)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Error, 10)
    }

    /// Whether the notification has been on screen long enough.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= Duration::from_secs(self.duration_secs)
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Matches screen.
    pub matches: MatchState,
    /// History screen.
    pub history: HistoryState,
    /// Detail screen.
    pub detail: DetailState,
    /// Characters of analysis text shown before expanding.
    pub preview_chars: usize,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::default(),
            matches: MatchState::default(),
            history: HistoryState::default(),
            detail: DetailState::default(),
            preview_chars: 200,
            action_tx,
        }
    }

    /// Apply UI settings from configuration.
    pub fn with_ui(mut self, ui: &crate::config::UiConfig) -> Self {
        self.history = HistoryState::with_page_size(ui.analyses_per_page);
        self.preview_chars = ui.preview_chars;
        self
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Whether any request is in flight.
    pub fn is_loading(&self) -> bool {
        self.matches.loading
            || self.matches.collecting
            || self.history.loading
            || self.detail.loading
            || self.detail.generating
    }

    /// Drop the notification once it has expired.
    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .app
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.app.notification = None;
        }
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => {
                if view != View::Detail {
                    self.app.previous_view = view;
                }
                self.app.current_view = view;
            }
            Action::OpenDetail(target) => {
                if self.app.current_view != View::Detail {
                    self.app.previous_view = self.app.current_view;
                }
                self.detail.open(target);
                self.detail.loading = true;
                self.app.current_view = View::Detail;
            }
            Action::OpenSelected => {
                if let Some(target) = self.selected_target() {
                    self.reduce(Action::OpenDetail(target));
                }
            }
            Action::Back => {
                if self.app.show_help {
                    self.app.show_help = false;
                } else if self.app.current_view == View::Detail {
                    self.app.current_view = self.app.previous_view;
                }
            }
            Action::SetInputMode(mode) => {
                self.app.input_mode = mode;
                if mode == InputMode::Search {
                    let current = self.current_query().unwrap_or_default();
                    self.app.set_input(&current);
                }
            }

            // Search input
            Action::InputChar(c) => {
                self.app.push_char(c);
                self.apply_search();
            }
            Action::InputBackspace => {
                self.app.pop_char();
                self.apply_search();
            }
            Action::InputLeft => self.app.cursor_left(),
            Action::InputRight => self.app.cursor_right(),
            Action::SubmitSearch => {
                self.apply_search();
                self.app.input_mode = InputMode::Normal;
            }
            Action::CancelSearch => {
                self.app.clear_input();
                self.apply_search();
                self.app.input_mode = InputMode::Normal;
            }

            // List navigation
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::NextPage => self.page(1),
            Action::PrevPage => self.page(-1),
            Action::GoToTop => self.scroll(i32::MIN / 2),
            Action::GoToBottom => self.scroll(i32::MAX / 2),
            Action::ToggleSort => {
                self.history.sort = self.history.sort.toggle();
                self.history.reset_position();
            }
            Action::ToggleGrouping => {
                self.history.grouped = !self.history.grouped;
                self.history.reset_position();
            }
            Action::ToggleExpand => {
                self.detail.expanded = !self.detail.expanded;
                self.detail.scroll = 0;
            }
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,

            // Requests
            Action::CheckStatus => {}
            Action::LoadMatches => self.matches.loading = true,
            Action::CollectLinks => self.matches.collecting = true,
            Action::LoadHistory => self.history.loading = true,
            Action::RefreshDetail => {
                if self.detail.target.is_some() {
                    self.detail.loading = true;
                    self.detail.generating = true;
                }
            }
            Action::GenerateScreenshotAnalysis
            | Action::CaptureScreenshot
            | Action::GenerateDataAnalysis => {
                if self.detail.target.is_some() {
                    self.detail.generating = true;
                }
            }
            Action::RefreshCurrent | Action::ToggleAutoRefresh => {}

            // Results
            Action::StatusLoaded(status) => {
                self.app.connected = true;
                self.app.api_version = Some(status.version).filter(|v| !v.is_empty());
            }
            Action::MatchesLoaded(latest) => {
                self.matches.loading = false;
                self.matches.collection = latest.collection;
                self.matches.replace(latest.matches, Utc::now());
                self.app.connected = true;
            }
            Action::LinksCollected(links) => {
                self.matches.collecting = false;
                let count = links.len();
                // The stored collection metadata describes the previous list.
                self.matches.collection = None;
                self.matches.replace(links, Utc::now());
                self.app.notification =
                    Some(Notification::success(format!("Collected {count} matches")));
            }
            Action::HistoryLoaded(page) => {
                self.history.loading = false;
                self.history.replace(page.analyses, page.total, Utc::now());
                self.app.connected = true;
            }
            Action::DetailLoaded { match_id, page } => {
                if self.detail.is_showing(&match_id) {
                    self.detail.set_analyses(page.analyses, Utc::now());
                } else {
                    tracing::debug!(%match_id, "Dropping stale detail response");
                }
            }
            Action::AnalysisGenerated { match_id, analysis } => {
                if self.detail.is_showing(&match_id) {
                    self.detail.set_latest(analysis, Utc::now());
                    self.app.notification = Some(Notification::success("Analysis ready"));
                }
            }
            Action::ScreenshotCaptured { match_id, capture } => {
                if self.detail.is_showing(&match_id) {
                    self.detail.generating = false;
                    let name = capture.filename.clone().unwrap_or_else(|| "screenshot".into());
                    self.detail.capture = Some(capture);
                    self.app.notification = Some(Notification::success(format!("Saved {name}")));
                }
            }
            Action::RequestFailed { kind, message } => {
                self.clear_loading(kind);
                if kind == RequestKind::Status {
                    self.app.connected = false;
                }
                self.app.error = Some(format!("{kind} failed: {message}"));
            }
            Action::AutoRefreshChanged(enabled) => {
                self.detail.auto_refresh = enabled;
                let message = if enabled {
                    "Auto-refresh on"
                } else {
                    "Auto-refresh off"
                };
                self.app.notification = Some(Notification::info(message));
            }

            // Feedback
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }
            Action::SetError(error) => {
                self.app.error = Some(error);
            }
            Action::ClearError => {
                self.app.error = None;
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    /// The match behind the current selection, if any.
    pub fn selected_target(&self) -> Option<MatchTarget> {
        match self.app.current_view {
            View::Matches => self.matches.selected_match().map(MatchTarget::from),
            View::History => self.history.selected_analysis().as_ref().map(MatchTarget::from),
            View::Detail => self.detail.target.clone(),
        }
    }

    fn current_query(&self) -> Option<String> {
        match self.app.current_view {
            View::Matches => self.matches.search_query.clone(),
            View::History => self.history.search_query.clone(),
            View::Detail => None,
        }
    }

    fn apply_search(&mut self) {
        let query = Some(self.app.input_buffer.clone()).filter(|q| !q.is_empty());
        match self.app.current_view {
            View::Matches => {
                self.matches.search_query = query;
                self.matches.clamp_selection();
            }
            View::History => {
                self.history.search_query = query;
                self.history.reset_position();
            }
            View::Detail => {}
        }
    }

    fn clear_loading(&mut self, kind: RequestKind) {
        match kind {
            RequestKind::Status => {}
            RequestKind::Matches => self.matches.loading = false,
            RequestKind::Collect => self.matches.collecting = false,
            RequestKind::History => self.history.loading = false,
            RequestKind::Detail => self.detail.loading = false,
            RequestKind::ScreenshotAnalysis
            | RequestKind::Screenshot
            | RequestKind::DataAnalysis => self.detail.generating = false,
        }
    }

    fn scroll(&mut self, delta: i32) {
        match self.app.current_view {
            View::Matches => {
                let len = self.matches.filtered_matches().len();
                if len == 0 {
                    self.matches.selected_index = None;
                    return;
                }
                let current = self.matches.selected_index.unwrap_or(0) as i64;
                let new_index = (current + delta as i64).clamp(0, len as i64 - 1);
                self.matches.selected_index = Some(new_index as usize);
            }
            View::History => self.history.move_selection(delta),
            View::Detail => {
                if self.detail.expanded {
                    let next = (self.detail.scroll as i64 + delta as i64).clamp(0, u16::MAX as i64);
                    self.detail.scroll = next as u16;
                } else {
                    self.detail.move_selection(delta);
                }
            }
        }
    }

    fn page(&mut self, direction: i32) {
        match self.app.current_view {
            View::History if direction > 0 => self.history.next_page(),
            View::History => self.history.prev_page(),
            _ => self.scroll(direction * 10),
        }
    }
}
