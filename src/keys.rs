//! Host key codes
//!
//! The symbolic keys the dispatcher reacts to, plus a parser for the textual
//! key tokens typed into the terminal front end.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Symbolic key code delivered by the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    Up,
    Down,
    Left,
    Right,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    /// Numeric keypad digit (0-9)
    Numpad(u8),
    Space,
    Escape,
    Enter,
    /// Any printable key
    Char(char),
}

/// A single key press: the key code and the text it would type, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub text: Option<char>,
}

/// Token that does not name a key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key token")]
    Empty,
    #[error("unknown key token: {0}")]
    Unknown(String),
}

impl KeyPress {
    /// Key press without text (function, navigation and keypad keys)
    pub fn new(code: KeyCode) -> Self {
        Self { code, text: None }
    }

    /// Printable key press carrying its own character as text
    pub fn from_char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            text: Some(c),
        }
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => KeyPress::from_char(c),
            KeyCode::Space => KeyPress {
                code,
                text: Some(' '),
            },
            other => KeyPress::new(other),
        }
    }
}

impl FromStr for KeyPress {
    type Err = KeyParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let mut chars = token.chars();
        let first = chars.next().ok_or(KeyParseError::Empty)?;
        if chars.next().is_none() {
            return Ok(KeyPress::from_char(first));
        }

        let lower = token.to_lowercase();
        let code = match lower.as_str() {
            "f1" => KeyCode::F1,
            "f2" => KeyCode::F2,
            "f3" => KeyCode::F3,
            "f4" => KeyCode::F4,
            "f5" => KeyCode::F5,
            "f6" => KeyCode::F6,
            "f7" => KeyCode::F7,
            "f8" => KeyCode::F8,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "ins" | "insert" => KeyCode::Insert,
            "home" => KeyCode::Home,
            "pgup" | "pageup" => KeyCode::PageUp,
            "del" | "delete" => KeyCode::Delete,
            "end" => KeyCode::End,
            "pgdn" | "pagedown" => KeyCode::PageDown,
            "space" => KeyCode::Space,
            "esc" | "escape" => KeyCode::Escape,
            "enter" => KeyCode::Enter,
            other => {
                let digit = other
                    .strip_prefix("num")
                    .or_else(|| other.strip_prefix("kp"))
                    .and_then(|rest| rest.parse::<u8>().ok())
                    .filter(|d| *d <= 9);
                match digit {
                    Some(d) => KeyCode::Numpad(d),
                    None => return Err(KeyParseError::Unknown(token.to_string())),
                }
            }
        };
        Ok(KeyPress::from(code))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Numpad(d) => write!(f, "num{}", d),
            KeyCode::Char(c) => write!(f, "{}", c),
            other => write!(f, "{:?}", other),
        }
    }
}
