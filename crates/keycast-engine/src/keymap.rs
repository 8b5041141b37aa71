//! Raw-code tables and label resolution
//!
//! Raw codes are X11-style keysyms as delivered by the capture layer.
//! Three lookups live here: the explicit keysym → display-label table, the
//! keysym → modifier-switch collapse table, and the mouse button-code →
//! switch table. Label resolution is total: anything absent from the
//! explicit table is rendered by a platform-supplied fallback.

use crate::switch::Switch;

/// Explicit display label for a raw keysym, if one is defined.
///
/// Covers the printable ASCII range, named keys (Space, Tab, Enter,
/// Backspace), arrows, navigation keys, and the numeric keypad. Everything
/// else falls through to the platform lookup in [`KeyTranslator`].
pub fn label_for(keysym: u32) -> Option<&'static str> {
    let label = match keysym {
        32 => "Space",
        33 => "!",
        34 => "\"",
        35 => "#",
        36 => "$",
        37 => "%",
        38 => "&",
        39 => "'",
        40 => "(",
        41 => ")",
        42 => "*",
        43 => "+",
        44 => ",",
        45 => "-",
        46 => ".",
        47 => "/",
        48 => "0",
        49 => "1",
        50 => "2",
        51 => "3",
        52 => "4",
        53 => "5",
        54 => "6",
        55 => "7",
        56 => "8",
        57 => "9",
        58 => ":",
        59 => ";",
        60 => "<",
        61 => "=",
        62 => ">",
        63 => "?",
        64 => "@",
        91 => "[",
        92 => "\\",
        93 => "]",
        94 => "^",
        95 => "_",
        96 => "`",
        97 => "a",
        98 => "b",
        99 => "c",
        100 => "d",
        101 => "e",
        102 => "f",
        103 => "g",
        104 => "h",
        105 => "i",
        106 => "j",
        107 => "k",
        108 => "l",
        109 => "m",
        110 => "n",
        111 => "o",
        112 => "p",
        113 => "q",
        114 => "r",
        115 => "s",
        116 => "t",
        117 => "u",
        118 => "v",
        119 => "w",
        120 => "x",
        121 => "y",
        122 => "z",
        123 => "{",
        124 => "|",
        125 => "}",
        126 => "~",
        // 65056 is ISO left tab (shifted Tab)
        65056 | 65289 => "Tab ↹",
        65288 => "Back ⌫",
        65293 => "Enter ⏎",
        65300 => "Scrl",
        65301 => "SysRq",
        65307 => "Esc",
        65361 => "←",
        65362 => "↑",
        65363 => "→",
        65364 => "↓",
        65365 => "PgUp",
        65366 => "PgDn",
        65377 => "Print",
        65379 => "Ins",
        65407 => "Num",
        65421 => "Num ⏎",
        65429 => "Num Home",
        65430 => "Num ←",
        65431 => "Num ↑",
        65432 => "Num →",
        65433 => "Num ↓",
        65434 => "Num PgUp",
        65435 => "Num PgDn",
        65436 => "Num End",
        65437 => "Num Clear",
        65438 => "Num Ins",
        65439 => "Num Del",
        65450 => "Num *",
        65451 => "Num +",
        65452 => "Num Sep",
        65453 => "Num -",
        65454 => "Num .",
        65455 => "Num /",
        65456 => "Num 0",
        65457 => "Num 1",
        65458 => "Num 2",
        65459 => "Num 3",
        65460 => "Num 4",
        65461 => "Num 5",
        65462 => "Num 6",
        65463 => "Num 7",
        65464 => "Num 8",
        65465 => "Num 9",
        65505 | 65506 => "Shift",
        65507 | 65508 => "Ctrl",
        65509 => "Caps",
        65511 | 65512 | 65513 | 65514 => "Alt",
        65515 | 65516 => "Super",
        65535 => "Del",
        _ => return None,
    };

    Some(label)
}

/// Collapse a raw keysym to its modifier switch, if it is a modifier
/// constituent.
///
/// Left and right variants map to the same switch so the physical state of
/// several keys can be represented by a single on-screen button. 65511 and
/// 65512 are the shifted Alt keysyms.
pub fn modifier_for(keysym: u32) -> Option<Switch> {
    match keysym {
        65505 | 65506 => Some(Switch::Shift),
        65507 | 65508 => Some(Switch::Ctrl),
        65511 | 65512 | 65513 | 65514 => Some(Switch::Alt),
        65515 | 65516 => Some(Switch::Super),
        _ => None,
    }
}

/// Map a raw mouse button code (kernel BTN_* values) to its switch.
pub fn button_for(code: u32) -> Option<Switch> {
    match code {
        272 => Some(Switch::MouseLeft),
        273 => Some(Switch::MouseRight),
        274 => Some(Switch::MouseMiddle),
        _ => None,
    }
}

/// Resolves raw keysyms to human-readable display labels.
///
/// Two-tier lookup: the explicit table in [`label_for`] first, then a
/// platform-supplied fallback. The fallback makes resolution total: every
/// keysym yields some label, so an unmapped code is never an error.
pub struct KeyTranslator {
    fallback: Box<dyn Fn(u32) -> String + Send>,
}

impl KeyTranslator {
    /// Create a translator with the given platform fallback lookup.
    pub fn new(fallback: impl Fn(u32) -> String + Send + 'static) -> Self {
        Self {
            fallback: Box::new(fallback),
        }
    }

    /// Resolve the display label for a raw keysym.
    pub fn display_label(&self, keysym: u32) -> String {
        match label_for(keysym) {
            Some(label) => label.to_string(),
            None => (self.fallback)(keysym),
        }
    }
}

impl std::fmt::Debug for KeyTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTranslator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> KeyTranslator {
        KeyTranslator::new(|keysym| format!("0x{keysym:X}"))
    }

    #[test]
    fn test_label_for_letters_and_symbols() {
        assert_eq!(label_for(97), Some("a"));
        assert_eq!(label_for(122), Some("z"));
        assert_eq!(label_for(32), Some("Space"));
        assert_eq!(label_for(64), Some("@"));
    }

    #[test]
    fn test_label_for_named_keys() {
        assert_eq!(label_for(65293), Some("Enter ⏎"));
        assert_eq!(label_for(65288), Some("Back ⌫"));
        assert_eq!(label_for(65289), Some("Tab ↹"));
        assert_eq!(label_for(65056), Some("Tab ↹"), "shifted tab shares the label");
    }

    #[test]
    fn test_label_for_numpad() {
        assert_eq!(label_for(65456), Some("Num 0"));
        assert_eq!(label_for(65465), Some("Num 9"));
        assert_eq!(label_for(65421), Some("Num ⏎"));
    }

    #[test]
    fn test_modifier_collapse_left_right() {
        assert_eq!(modifier_for(65505), Some(Switch::Shift));
        assert_eq!(modifier_for(65506), Some(Switch::Shift));
        assert_eq!(modifier_for(65507), Some(Switch::Ctrl));
        assert_eq!(modifier_for(65508), Some(Switch::Ctrl));
        assert_eq!(modifier_for(65515), Some(Switch::Super));
        assert_eq!(modifier_for(65516), Some(Switch::Super));
    }

    #[test]
    fn test_modifier_collapse_alt_variants() {
        // All four Alt keysyms, including the two shifted ones
        for keysym in [65511, 65512, 65513, 65514] {
            assert_eq!(modifier_for(keysym), Some(Switch::Alt));
        }
    }

    #[test]
    fn test_regular_keys_are_not_modifiers() {
        assert_eq!(modifier_for(97), None);
        assert_eq!(modifier_for(65293), None);
        assert_eq!(modifier_for(65509), None, "Caps is a regular key");
    }

    #[test]
    fn test_button_for_mouse_codes() {
        assert_eq!(button_for(272), Some(Switch::MouseLeft));
        assert_eq!(button_for(273), Some(Switch::MouseRight));
        assert_eq!(button_for(274), Some(Switch::MouseMiddle));
        assert_eq!(button_for(275), None);
    }

    #[test]
    fn test_display_label_prefers_explicit_table() {
        let t = translator();
        assert_eq!(t.display_label(97), "a");
        assert_eq!(t.display_label(65293), "Enter ⏎");
    }

    #[test]
    fn test_display_label_is_total() {
        let t = translator();
        // Not in the explicit table, resolved by the fallback
        assert_eq!(t.display_label(65470), "0xFFBE");
        assert!(!t.display_label(0xDEADBEEF).is_empty());
    }
}
