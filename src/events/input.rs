//! Input event types and key binding matching.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Check if this matches a key binding string (e.g., "Ctrl+r", "Enter", "?").
    ///
    /// Shift is not compared for symbols, since terminals disagree on
    /// whether `?` arrives with it.
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected = Modifiers::default();
        let mut expected_key = "";

        // A bare "+" is a key, not a separator.
        let parts: Vec<&str> = if binding == "+" {
            vec!["+"]
        } else {
            binding.split('+').collect()
        };
        for part in parts {
            match part.to_lowercase().as_str() {
                "ctrl" => expected.ctrl = true,
                "alt" => expected.alt = true,
                "shift" => expected.shift = true,
                _ => expected_key = part,
            }
        }

        let symbol = matches!(self.key, Key::Char(c) if !c.is_alphanumeric());
        if self.modifiers.ctrl != expected.ctrl
            || self.modifiers.alt != expected.alt
            || (!symbol && self.modifiers.shift != expected.shift)
        {
            return false;
        }

        match expected_key.to_lowercase().as_str() {
            "enter" => self.key == Key::Enter,
            "esc" | "escape" => self.key == Key::Escape,
            "backspace" => self.key == Key::Backspace,
            "delete" | "del" => self.key == Key::Delete,
            "tab" => self.key == Key::Tab,
            "space" => self.key == Key::Char(' '),
            "up" => self.key == Key::Up,
            "down" => self.key == Key::Down,
            "left" => self.key == Key::Left,
            "right" => self.key == Key::Right,
            "home" => self.key == Key::Home,
            "end" => self.key == Key::End,
            "pageup" => self.key == Key::PageUp,
            "pagedown" => self.key == Key::PageDown,
            s if s.starts_with('f') && s.len() > 1 && s.len() <= 3 => s[1..]
                .parse::<u8>()
                .is_ok_and(|n| self.key == Key::F(n)),
            s if s.chars().count() == 1 => s.chars().next().is_some_and(|c| {
                self.key == Key::Char(c) || self.key == Key::Char(c.to_ascii_uppercase())
            }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> InputEvent {
        InputEvent::new(Key::Char(c), Modifiers::default())
    }

    #[test]
    fn test_plain_and_named_keys() {
        assert!(key('q').matches("q"));
        assert!(!key('q').matches("r"));
        assert!(InputEvent::new(Key::Enter, Modifiers::default()).matches("Enter"));
        assert!(InputEvent::new(Key::Escape, Modifiers::default()).matches("Esc"));
        assert!(InputEvent::new(Key::F(5), Modifiers::default()).matches("F5"));
        assert!(!key('f').matches("F5"));
    }

    #[test]
    fn test_modifiers() {
        let ctrl_r = InputEvent::new(
            Key::Char('r'),
            Modifiers {
                ctrl: true,
                ..Default::default()
            },
        );
        assert!(ctrl_r.matches("Ctrl+r"));
        assert!(!ctrl_r.matches("r"));
        assert!(!key('r').matches("Ctrl+r"));
    }

    #[test]
    fn test_shifted_symbols() {
        let question = InputEvent::new(
            Key::Char('?'),
            Modifiers {
                shift: true,
                ..Default::default()
            },
        );
        assert!(question.matches("?"));
        assert!(key('/').matches("/"));
        assert!(key('+').matches("+"));
    }

    #[test]
    fn test_non_ascii_single_char_binding() {
        assert!(key('ç').matches("ç"));
    }
}
