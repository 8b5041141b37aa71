//! The catalog of logical hardware switches

use std::fmt;

/// One on-screen representable input element.
///
/// The set is closed and fixed at startup: a single slot for whichever
/// regular key is held, one switch per modifier family, and one per mouse
/// button. Multiple physical raw codes collapse into one switch (left and
/// right Shift are both [`Switch::Shift`]) so the overlay shows a single
/// button per family regardless of which physical key was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Switch {
    /// The most recently pressed non-modifier key
    Key,
    /// Shift family (left or right)
    Shift,
    /// Control family (left or right)
    Ctrl,
    /// Alt family (left, right, or shifted variants)
    Alt,
    /// Super/Meta family (left or right)
    Super,
    /// Left mouse button
    MouseLeft,
    /// Middle mouse button
    MouseMiddle,
    /// Right mouse button
    MouseRight,
}

impl Switch {
    /// The modifier switches, in display order.
    pub const MODIFIERS: [Switch; 4] = [Switch::Shift, Switch::Ctrl, Switch::Alt, Switch::Super];

    /// The mouse button switches, in display order.
    pub const MOUSE_BUTTONS: [Switch; 3] =
        [Switch::MouseLeft, Switch::MouseMiddle, Switch::MouseRight];

    /// The label drawn on the switch itself.
    ///
    /// For modifiers this doubles as the name the regular-key path compares
    /// event labels against: a key whose label equals a modifier name is a
    /// modifier constituent, never a regular key.
    pub fn name(self) -> &'static str {
        match self {
            Switch::Key => "Key",
            Switch::Shift => "Shift",
            Switch::Ctrl => "Ctrl",
            Switch::Alt => "Alt",
            Switch::Super => "Super",
            Switch::MouseLeft => "Mouse L",
            Switch::MouseMiddle => "Mouse M",
            Switch::MouseRight => "Mouse R",
        }
    }

    /// Check whether a display label names this switch.
    pub fn matches_name(self, label: &str) -> bool {
        self.name() == label
    }

    pub fn is_modifier(self) -> bool {
        Self::MODIFIERS.contains(&self)
    }

    pub fn is_mouse_button(self) -> bool {
        Self::MOUSE_BUTTONS.contains(&self)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
