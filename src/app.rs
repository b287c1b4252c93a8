//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, requests and rendering.

use crate::api::{ApiClient, MatchApi};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::events::{EventConfig, EventHandler};
use crate::state::{Action, Notification, Poller, Store, View};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Everything except the terminal: store, requests and the refresh timer.
pub struct Controller {
    store: Store,
    dispatcher: Dispatcher,
    poller: Poller,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Controller {
    pub fn new(
        config: &Config,
        api: Arc<dyn MatchApi>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            store: Store::new(action_tx.clone()).with_ui(&config.ui),
            dispatcher: Dispatcher::new(api, &config.api, action_tx.clone()),
            poller: Poller::new(Duration::from_secs(config.ui.auto_refresh_secs.max(1))),
            action_tx,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Queue the first requests.
    pub fn start(&self) -> Result<()> {
        for action in [Action::CheckStatus, Action::LoadMatches, Action::LoadHistory] {
            self.store.dispatch(action)?;
        }
        Ok(())
    }

    /// Apply an action: update state, then start any request it implies.
    pub fn handle_action(&mut self, action: Action) {
        let action = match action {
            Action::OpenSelected => match self.store.selected_target() {
                Some(target) => Action::OpenDetail(target),
                None => return,
            },
            Action::RefreshCurrent => match self.store.app.current_view {
                View::Matches => Action::LoadMatches,
                View::History => Action::LoadHistory,
                View::Detail => Action::RefreshDetail,
            },
            Action::ToggleAutoRefresh => {
                self.toggle_auto_refresh();
                return;
            }
            other => other,
        };

        self.store.reduce(action.clone());
        self.dispatcher
            .perform(&action, self.store.detail.match_id());
        self.sync_poller();
    }

    fn toggle_auto_refresh(&mut self) {
        if self.poller.stop() {
            self.store.reduce(Action::AutoRefreshChanged(false));
            return;
        }
        if self.store.app.current_view != View::Detail || self.store.detail.target.is_none() {
            self.store.reduce(Action::ShowNotification(Notification::warning(
                "Open a match to auto-refresh it",
            )));
            return;
        }
        self.poller
            .start(self.action_tx.clone(), Action::RefreshDetail);
        self.store.reduce(Action::AutoRefreshChanged(true));
    }

    /// Stop polling once its match is no longer on screen.
    fn sync_poller(&mut self) {
        let wanted = self.store.app.current_view == View::Detail && self.store.detail.auto_refresh;
        if !wanted && self.poller.stop() {
            self.store.detail.auto_refresh = false;
        }
    }

    /// Periodic housekeeping between events.
    pub fn tick(&mut self, now: Instant) {
        self.store.expire_notification(now);
    }
}

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// State, requests and timer.
    controller: Controller,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Renderer.
    ui: Ui,
}

impl App {
    /// Create a new application.
    pub fn new(config: Config) -> Result<Self> {
        let api: Arc<dyn MatchApi> = Arc::new(ApiClient::new(config.api.clone())?);
        tracing::info!(base_url = %config.api.base_url, "Using analysis API");

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.ui.mouse_support {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            controller: Controller::new(&config, api, action_tx),
            event_handler: EventHandler::new(
                config.keybindings.clone(),
                EventConfig::from(&config.ui),
            ),
            action_rx,
            ui: Ui::new(&config),
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.controller.start()?;

        loop {
            self.controller.tick(Instant::now());
            self.event_handler
                .update_store_snapshot(self.controller.store());

            let ui = &self.ui;
            let store = self.controller.store();
            self.terminal.draw(|frame| ui.render(frame, store))?;

            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.controller.handle_action(action);
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.controller.handle_action(action);
                }
            }

            if self.controller.store().app.should_quit {
                tracing::info!("Quit requested");
                break;
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
