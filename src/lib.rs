//! # matchdesk - football match analysis in the terminal
//!
//! A terminal client for the match-analysis HTTP service: it lists the
//! latest match links collected from SofaScore, triggers screenshot and data
//! analyses, and renders the returned text and statistics.
//!
//! ## Architecture
//!
//! - **App**: terminal lifecycle, event loop and the auto-refresh timer
//! - **UI**: layout and rendering logic
//! - **API**: typed HTTP client for the analysis service
//! - **Dispatcher**: runs requests as tasks and reports results as actions
//! - **State**: centralized state management
//! - **Analysis**: grouping, search, paging and text formatting
//! - **Events**: input handling and key bindings
//! - **Config**: configuration management

pub mod analysis;
pub mod api;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
