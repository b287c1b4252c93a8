//! Event handling for matchdesk.
//!
//! Terminal input is polled, translated through the configured key
//! bindings, and turned into store actions.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};

use crate::config::UiConfig;
use std::time::Duration;

/// Configuration for the event handler.
#[derive(Debug, Clone)]
pub struct EventConfig {
    /// How long to wait for input before yielding back to the loop.
    pub tick_rate: Duration,
    /// Whether mouse events are translated.
    pub mouse_capture: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            mouse_capture: true,
        }
    }
}

impl EventConfig {
    /// Create a new event config with the specified tick rate in milliseconds.
    pub fn with_tick_rate_ms(mut self, ms: u64) -> Self {
        self.tick_rate = Duration::from_millis(ms);
        self
    }

    /// Enable or disable mouse capture.
    pub fn with_mouse_capture(mut self, capture: bool) -> Self {
        self.mouse_capture = capture;
        self
    }
}

impl From<&UiConfig> for EventConfig {
    fn from(ui: &UiConfig) -> Self {
        Self::default()
            .with_tick_rate_ms(ui.tick_rate_ms)
            .with_mouse_capture(ui.mouse_support)
    }
}
