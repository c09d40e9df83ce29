use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Level and edge state of one logical button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Button {
    /// Held right now.
    pub down: bool,
    /// Went from released to held during the current tick.
    pub just_pressed: bool,
}

impl Button {
    /// Apply a raw press/release. Re-pressing a held button keeps the edge
    /// flag as it is, so key auto-repeat never re-triggers it.
    pub(crate) fn set(&mut self, pressed: bool) {
        if pressed && !self.down {
            self.just_pressed = true;
        }
        self.down = pressed;
    }
}

/// Named abstract input, decoupled from the key or touch region feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalButton {
    Left,
    Right,
    Up,
    Down,
    A,
    B,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 6] = [
        LogicalButton::Left,
        LogicalButton::Right,
        LogicalButton::Up,
        LogicalButton::Down,
        LogicalButton::A,
        LogicalButton::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::A => "a",
            Self::B => "b",
        }
    }
}

impl std::fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalButton {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::UnknownButton(s.to_string()))
    }
}

/// Errors from building input tables.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown button name: {0}")]
    UnknownButton(String),
    #[error("key code {code} is bound to both {first} and {second}")]
    DuplicateCode {
        code: u32,
        first: LogicalButton,
        second: LogicalButton,
    },
}

/// One row of the key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub code: u32,
    pub button: LogicalButton,
}

/// Raw key code to logical button table, fixed when an `InputState` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(Vec<KeyBinding>);

impl Default for KeyBindings {
    /// Arrow keys plus Z/X, as DOM key codes.
    fn default() -> Self {
        Self(vec![
            KeyBinding {
                code: 37,
                button: LogicalButton::Left,
            },
            KeyBinding {
                code: 39,
                button: LogicalButton::Right,
            },
            KeyBinding {
                code: 38,
                button: LogicalButton::Up,
            },
            KeyBinding {
                code: 40,
                button: LogicalButton::Down,
            },
            KeyBinding {
                code: 90,
                button: LogicalButton::A,
            },
            KeyBinding {
                code: 88,
                button: LogicalButton::B,
            },
        ])
    }
}

impl KeyBindings {
    /// Build a table, rejecting a code bound to two different buttons.
    pub fn new(bindings: Vec<KeyBinding>) -> Result<Self, InputError> {
        let table = Self(bindings);
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        for (i, a) in self.0.iter().enumerate() {
            if let Some(b) = self.0[i + 1..]
                .iter()
                .find(|b| b.code == a.code && b.button != a.button)
            {
                return Err(InputError::DuplicateCode {
                    code: a.code,
                    first: a.button,
                    second: b.button,
                });
            }
        }
        Ok(())
    }

    pub fn button_for(&self, code: u32) -> Option<LogicalButton> {
        self.0.iter().find(|b| b.code == code).map(|b| b.button)
    }

    /// First code bound to `button`.
    pub fn code_for(&self, button: LogicalButton) -> Option<u32> {
        self.0.iter().find(|b| b.button == button).map(|b| b.code)
    }

    /// Distinct buttons in table order.
    pub fn buttons(&self) -> Vec<LogicalButton> {
        let mut seen = HashSet::new();
        self.0
            .iter()
            .map(|b| b.button)
            .filter(|b| seen.insert(*b))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.0.iter()
    }
}
