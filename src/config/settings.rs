//! Configuration settings for matchdesk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment prefix for overrides, e.g. `MATCHDESK_API__BASE_URL`.
const ENV_PREFIX: &str = "MATCHDESK";

/// Shorthand variable for the API base URL.
const ENV_API_URL: &str = "MATCHDESK_API_URL";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
    /// Theme configuration.
    pub theme: ThemeConfig,
}

impl Config {
    /// Load configuration from the default file and the process environment.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file, then apply environment overrides.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(super::default_config_path);
        Self::load_from(&config_path, None)
    }

    /// Load configuration from `path`, overlaying either the given variables
    /// or, when `env` is `None`, the process environment.
    pub fn load_from(path: &Path, env: Option<HashMap<String, String>>) -> crate::Result<Self> {
        let api_url = match &env {
            Some(vars) => vars.get(ENV_API_URL).cloned(),
            None => std::env::var(ENV_API_URL).ok(),
        };

        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env);

        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml).required(false))
            .add_source(environment)
            .set_override_option("api.base_url", api_url)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        tracing::debug!(path = %path.display(), base_url = %config.api.base_url, "Configuration loaded");
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(super::default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

/// API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Analysis API base URL.
    pub base_url: String,
    /// Timeout for ordinary requests, in seconds.
    pub timeout_secs: u64,
    /// Timeout for collection and analysis generation, in seconds.
    pub long_timeout_secs: u64,
    /// Page size when listing all analyses.
    pub analyses_limit: u32,
    /// Page size when listing the analyses of one match.
    pub match_analyses_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            long_timeout_secs: 180,
            analyses_limit: 50,
            match_analyses_limit: 10,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Number of analyses to display per page on the history screen.
    pub analyses_per_page: usize,
    /// Characters of analysis text shown before "...".
    pub preview_chars: usize,
    /// Auto-refresh period of the detail screen, in seconds.
    pub auto_refresh_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            analyses_per_page: 10,
            preview_chars: 200,
            auto_refresh_secs: 60,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Previous page.
    pub prev_page: String,
    /// Next page.
    pub next_page: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Reload the current view.
    pub refresh: String,
    /// Switch to matches view.
    pub matches: String,
    /// Switch to history view.
    pub history: String,
    /// Open search.
    pub search: String,
    /// Trigger a fresh link collection.
    pub collect: String,
    /// Cycle sort order.
    pub sort: String,
    /// Toggle grouping by match.
    pub group: String,
    /// Generate a screenshot analysis.
    pub screenshot_analysis: String,
    /// Capture a raw screenshot.
    pub screenshot: String,
    /// Generate a data analysis.
    pub data_analysis: String,
    /// Toggle automatic refresh.
    pub auto_refresh: String,
    /// Expand/collapse analysis text.
    pub expand: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            prev_page: "h".to_string(),
            next_page: "l".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            matches: "1".to_string(),
            history: "2".to_string(),
            search: "/".to_string(),
            collect: "c".to_string(),
            sort: "s".to_string(),
            group: "g".to_string(),
            screenshot_analysis: "a".to_string(),
            screenshot: "p".to_string(),
            data_analysis: "d".to_string(),
            auto_refresh: "t".to_string(),
            expand: "e".to_string(),
        }
    }
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Primary color (hex).
    pub primary: String,
    /// Accent color (hex).
    pub accent: String,
    /// Success color (hex).
    pub success: String,
    /// Warning color (hex).
    pub warning: String,
    /// Error color (hex).
    pub error: String,
    /// Muted text color (hex).
    pub muted: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            accent: "#16a34a".to_string(),
            success: "#66bb6a".to_string(),
            warning: "#ffa726".to_string(),
            error: "#ef5350".to_string(),
            muted: "#6b7280".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Parse a `#rrggbb` color into a ratatui color, falling back to `fallback`.
    pub fn color(hex: &str, fallback: ratatui::style::Color) -> ratatui::style::Color {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return fallback;
        }
        match u32::from_str_radix(digits, 16) {
            Ok(value) => ratatui::style::Color::Rgb(
                ((value >> 16) & 0xff) as u8,
                ((value >> 8) & 0xff) as u8,
                (value & 0xff) as u8,
            ),
            Err(_) => fallback,
        }
    }
}
