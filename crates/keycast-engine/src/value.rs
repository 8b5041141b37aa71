//! Transition payload values

use std::fmt;

/// The logical value carried by a switch transition.
///
/// The regular-key slot carries the held label, `None` meaning nothing is
/// held. Modifier and mouse switches carry their logical pressed state.
/// Keeping the two categories in one tagged union lets a single dispatcher
/// fan out both without encoding booleans as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchValue {
    /// Display label held on the regular-key slot
    Key(Option<String>),
    /// Logical pressed state of a modifier or mouse switch
    Pressed(bool),
}

impl SwitchValue {
    pub fn key(label: impl Into<String>) -> Self {
        SwitchValue::Key(Some(label.into()))
    }

    pub fn no_key() -> Self {
        SwitchValue::Key(None)
    }
}

impl fmt::Display for SwitchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchValue::Key(Some(label)) => f.write_str(label),
            SwitchValue::Key(None) => f.write_str(""),
            SwitchValue::Pressed(true) => f.write_str("down"),
            SwitchValue::Pressed(false) => f.write_str("up"),
        }
    }
}
