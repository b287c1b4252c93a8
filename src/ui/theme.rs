//! Resolved terminal colors.

use crate::config::ThemeConfig;
use ratatui::style::{Color, Modifier, Style};

/// Colors parsed once from the configured hex values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for Theme {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            primary: ThemeConfig::color(&config.primary, Color::Cyan),
            accent: ThemeConfig::color(&config.accent, Color::Green),
            success: ThemeConfig::color(&config.success, Color::Green),
            warning: ThemeConfig::color(&config.warning, Color::Yellow),
            error: ThemeConfig::color(&config.error, Color::Red),
            muted: ThemeConfig::color(&config.muted, Color::DarkGray),
        }
    }
}

impl Theme {
    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn selected(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_hex_falls_back() {
        let config = ThemeConfig {
            error: "not-a-color".to_string(),
            ..Default::default()
        };
        let theme = Theme::from(&config);
        assert_eq!(theme.error, Color::Red);
        assert_eq!(theme.primary, Color::Rgb(0x25, 0x63, 0xeb));
    }
}
