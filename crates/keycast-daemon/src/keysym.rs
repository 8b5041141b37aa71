//! evdev key code to keysym translation
//!
//! The engine's raw-code domain is X11-style keysyms; the kernel gives us
//! evdev codes. The mapping is total: codes without a keysym land in a
//! private range so label resolution downstream never fails.

use evdev::Key;

/// Marker bit for evdev codes that have no keysym equivalent.
pub const PRIVATE_BASE: u32 = 0x1000_0000;

/// Translate an evdev key to its keysym.
///
/// Letters map to their lowercase ASCII keysym; the label table and the
/// platform fallback take care of presentation.
pub fn keysym_for(key: Key) -> u32 {
    match key {
        // Letters
        Key::KEY_A => 97,
        Key::KEY_B => 98,
        Key::KEY_C => 99,
        Key::KEY_D => 100,
        Key::KEY_E => 101,
        Key::KEY_F => 102,
        Key::KEY_G => 103,
        Key::KEY_H => 104,
        Key::KEY_I => 105,
        Key::KEY_J => 106,
        Key::KEY_K => 107,
        Key::KEY_L => 108,
        Key::KEY_M => 109,
        Key::KEY_N => 110,
        Key::KEY_O => 111,
        Key::KEY_P => 112,
        Key::KEY_Q => 113,
        Key::KEY_R => 114,
        Key::KEY_S => 115,
        Key::KEY_T => 116,
        Key::KEY_U => 117,
        Key::KEY_V => 118,
        Key::KEY_W => 119,
        Key::KEY_X => 120,
        Key::KEY_Y => 121,
        Key::KEY_Z => 122,

        // Number row
        Key::KEY_0 => 48,
        Key::KEY_1 => 49,
        Key::KEY_2 => 50,
        Key::KEY_3 => 51,
        Key::KEY_4 => 52,
        Key::KEY_5 => 53,
        Key::KEY_6 => 54,
        Key::KEY_7 => 55,
        Key::KEY_8 => 56,
        Key::KEY_9 => 57,

        // Symbol keys
        Key::KEY_SPACE => 32,
        Key::KEY_APOSTROPHE => 39,
        Key::KEY_COMMA => 44,
        Key::KEY_MINUS => 45,
        Key::KEY_DOT => 46,
        Key::KEY_SLASH => 47,
        Key::KEY_SEMICOLON => 59,
        Key::KEY_EQUAL => 61,
        Key::KEY_LEFTBRACE => 91,
        Key::KEY_BACKSLASH => 92,
        Key::KEY_RIGHTBRACE => 93,
        Key::KEY_GRAVE => 96,

        // Named keys
        Key::KEY_BACKSPACE => 65288,
        Key::KEY_TAB => 65289,
        Key::KEY_ENTER => 65293,
        Key::KEY_SCROLLLOCK => 65300,
        Key::KEY_ESC => 65307,
        Key::KEY_SYSRQ => 65377,

        // Navigation
        Key::KEY_HOME => 65360,
        Key::KEY_LEFT => 65361,
        Key::KEY_UP => 65362,
        Key::KEY_RIGHT => 65363,
        Key::KEY_DOWN => 65364,
        Key::KEY_PAGEUP => 65365,
        Key::KEY_PAGEDOWN => 65366,
        Key::KEY_END => 65367,
        Key::KEY_INSERT => 65379,
        Key::KEY_DELETE => 65535,

        // Locks
        Key::KEY_NUMLOCK => 65407,
        Key::KEY_CAPSLOCK => 65509,

        // Numeric keypad
        Key::KEY_KPENTER => 65421,
        Key::KEY_KPASTERISK => 65450,
        Key::KEY_KPPLUS => 65451,
        Key::KEY_KPMINUS => 65453,
        Key::KEY_KPDOT => 65454,
        Key::KEY_KPSLASH => 65455,
        Key::KEY_KP0 => 65456,
        Key::KEY_KP1 => 65457,
        Key::KEY_KP2 => 65458,
        Key::KEY_KP3 => 65459,
        Key::KEY_KP4 => 65460,
        Key::KEY_KP5 => 65461,
        Key::KEY_KP6 => 65462,
        Key::KEY_KP7 => 65463,
        Key::KEY_KP8 => 65464,
        Key::KEY_KP9 => 65465,

        // Function keys
        Key::KEY_F1 => 65470,
        Key::KEY_F2 => 65471,
        Key::KEY_F3 => 65472,
        Key::KEY_F4 => 65473,
        Key::KEY_F5 => 65474,
        Key::KEY_F6 => 65475,
        Key::KEY_F7 => 65476,
        Key::KEY_F8 => 65477,
        Key::KEY_F9 => 65478,
        Key::KEY_F10 => 65479,
        Key::KEY_F11 => 65480,
        Key::KEY_F12 => 65481,

        // Modifiers (left/right pairs collapse in the engine)
        Key::KEY_LEFTSHIFT => 65505,
        Key::KEY_RIGHTSHIFT => 65506,
        Key::KEY_LEFTCTRL => 65507,
        Key::KEY_RIGHTCTRL => 65508,
        Key::KEY_LEFTALT => 65513,
        Key::KEY_RIGHTALT => 65514,
        Key::KEY_LEFTMETA => 65515,
        Key::KEY_RIGHTMETA => 65516,

        // No keysym equivalent; keep the code in a private range so the
        // fallback can still name it
        other => PRIVATE_BASE | u32::from(other.code()),
    }
}

/// Platform fallback label for a keysym absent from the explicit table.
///
/// This is the lookup handed to the engine's `KeyTranslator`; together
/// they make label resolution total.
pub fn keysym_name(keysym: u32) -> String {
    if keysym & PRIVATE_BASE != 0 {
        return kernel_key_name((keysym & 0xFFFF) as u16);
    }

    // F1..F12
    if (65470..=65481).contains(&keysym) {
        return format!("F{}", keysym - 65469);
    }

    match keysym {
        65360 => "Home".to_string(),
        65367 => "End".to_string(),
        // Printable ASCII renders as itself
        33..=126 => char::from_u32(keysym).unwrap_or('?').to_string(),
        _ => format!("0x{keysym:X}"),
    }
}

/// Name an evdev code after its kernel constant, without the KEY_ prefix.
fn kernel_key_name(code: u16) -> String {
    let name = format!("{:?}", Key::new(code));
    name.strip_prefix("KEY_")
        .or_else(|| name.strip_prefix("BTN_"))
        .unwrap_or(&name)
        .to_string()
}
