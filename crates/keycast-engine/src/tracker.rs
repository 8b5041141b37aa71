//! Logical switch state tracking
//!
//! The trackers are the only writers of switch state. Each raw event is
//! processed synchronously, one at a time, and fires a transition through
//! the owned [`Dispatcher`] only when the logical state actually changed,
//! so downstream renderers never see flicker from duplicate or spurious
//! native events.

use std::collections::HashMap;

use crate::dispatch::{Dispatcher, Subscriber};
use crate::keymap::{button_for, modifier_for, KeyTranslator};
use crate::switch::Switch;
use crate::value::SwitchValue;

/// Tracks keyboard state: the held regular key and a press-depth counter
/// per modifier switch.
///
/// A modifier's logical pressed state is `depth > 0`; with left and right
/// Shift both down the depth is 2 and the switch reads as released only
/// once both are up.
///
/// Known limitation inherited from native hooks: certain chorded modifier
/// sequences (both Ctrl keys held, then a Shift press, and the mirror case)
/// are never delivered by some sources. There is no signal to detect the
/// omission, so no workaround is attempted; the zero floor on release keeps
/// the depth self-correcting instead of locking a switch pressed.
pub struct KeyStateTracker {
    dispatcher: Dispatcher,
    translator: KeyTranslator,
    depths: HashMap<Switch, u32>,
    held: Option<String>,
}

impl KeyStateTracker {
    pub fn new(translator: KeyTranslator) -> Self {
        let mut depths = HashMap::new();
        for switch in Switch::MODIFIERS {
            depths.insert(switch, 0);
        }

        Self {
            dispatcher: Dispatcher::new(),
            translator,
            depths,
            held: None,
        }
    }

    /// Register an observer for one switch. Process-lifetime.
    pub fn subscribe(&mut self, switch: Switch, subscriber: Box<dyn Subscriber>) {
        self.dispatcher.subscribe(switch, subscriber);
    }

    /// Synthesize one `false → false` self-transition per modifier switch.
    ///
    /// Runs every subscriber's released-state path once so cached visuals
    /// are primed before the overlay becomes visible. Must be called
    /// exactly once, before any real input event is processed. The
    /// regular-key slot gets nothing.
    pub fn init_modifiers(&mut self) {
        for switch in Switch::MODIFIERS {
            self.dispatcher.notify(
                switch,
                &SwitchValue::Pressed(false),
                &SwitchValue::Pressed(false),
            );
        }
    }

    /// Process a raw key press.
    pub fn key_pressed(&mut self, keysym: u32) {
        let label = self.translator.display_label(keysym);
        self.update_regular(self.held.clone(), Some(label));
        self.update_modifier(keysym, 1);
    }

    /// Process a raw key release.
    pub fn key_released(&mut self, keysym: u32) {
        let label = self.translator.display_label(keysym);

        // Only the key that is actually held clears the regular slot;
        // unrelated releases must not blank a key the user still holds.
        if self.held.as_deref() == Some(label.as_str()) {
            self.update_regular(Some(label), None);
        }

        self.update_modifier(keysym, -1);
    }

    /// Typed/composed events are ignored. Press and release are tracked
    /// separately from composition, and counting both would double-fire.
    pub fn key_typed(&mut self, _keysym: u32) {}

    /// Current logical pressed state of a modifier switch.
    pub fn pressed(&self, switch: Switch) -> bool {
        self.depths.get(&switch).map_or(false, |depth| *depth > 0)
    }

    /// Label currently held on the regular-key slot.
    pub fn held_key(&self) -> Option<&str> {
        self.held.as_deref()
    }

    /// State change for the regular (non-modifier) slot.
    fn update_regular(&mut self, old: Option<String>, new: Option<String>) {
        debug_assert!(old.as_deref().map_or(true, |l| !l.is_empty()));
        debug_assert!(new.as_deref().map_or(true, |l| !l.is_empty()));

        // A key whose label matches a modifier name is a modifier
        // constituent; it must not also show up as a regular key.
        let is_modifier = Switch::MODIFIERS.iter().any(|switch| {
            old.as_deref().is_some_and(|l| switch.matches_name(l))
                || new.as_deref().is_some_and(|l| switch.matches_name(l))
        });

        if is_modifier || old == new {
            return;
        }

        let old = SwitchValue::Key(old);
        let new_value = SwitchValue::Key(new.clone());
        self.dispatcher.notify(Switch::Key, &old, &new_value);
        self.held = new;
    }

    /// Depth update for a modifier switch; `increment` is +1 on press and
    /// -1 on release.
    ///
    /// The new depth is floored at zero: native sources can misreport and
    /// deliver more releases than presses, and a negative depth would lock
    /// the switch. A transition fires only when the logical pressed state
    /// crosses the zero edge; depth 1 to 2 and 2 to 1 are silent.
    fn update_modifier(&mut self, keysym: u32, increment: i32) {
        let Some(switch) = modifier_for(keysym) else {
            return;
        };

        let old_depth = self.depths[&switch];
        let new_depth = (i64::from(old_depth) + i64::from(increment)).max(0) as u32;

        let old_pressed = old_depth > 0;
        let new_pressed = new_depth > 0;

        if old_pressed != new_pressed {
            self.dispatcher.notify(
                switch,
                &SwitchValue::Pressed(old_pressed),
                &SwitchValue::Pressed(new_pressed),
            );
        }

        self.depths.insert(switch, new_depth);
    }
}

/// Tracks mouse button state, one pressed flag per button switch.
///
/// Mirrors the keyboard tracker's contract: duplicate native events fire
/// nothing, and each tracker owns its own dispatcher.
pub struct MouseStateTracker {
    dispatcher: Dispatcher,
    pressed: HashMap<Switch, bool>,
}

impl Default for MouseStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseStateTracker {
    pub fn new() -> Self {
        let mut pressed = HashMap::new();
        for switch in Switch::MOUSE_BUTTONS {
            pressed.insert(switch, false);
        }

        Self {
            dispatcher: Dispatcher::new(),
            pressed,
        }
    }

    /// Register an observer for one switch. Process-lifetime.
    pub fn subscribe(&mut self, switch: Switch, subscriber: Box<dyn Subscriber>) {
        self.dispatcher.subscribe(switch, subscriber);
    }

    /// Process a raw button press.
    pub fn button_pressed(&mut self, code: u32) {
        self.update(code, true);
    }

    /// Process a raw button release.
    pub fn button_released(&mut self, code: u32) {
        self.update(code, false);
    }

    /// Current logical pressed state of a button switch.
    pub fn pressed(&self, switch: Switch) -> bool {
        self.pressed.get(&switch).copied().unwrap_or(false)
    }

    fn update(&mut self, code: u32, pressed: bool) {
        let Some(switch) = button_for(code) else {
            return;
        };

        let old = self.pressed[&switch];

        if old != pressed {
            self.dispatcher.notify(
                switch,
                &SwitchValue::Pressed(old),
                &SwitchValue::Pressed(pressed),
            );
            self.pressed.insert(switch, pressed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(Switch, SwitchValue, SwitchValue)>>>;

    fn recorder(log: Log) -> Box<dyn Subscriber> {
        Box::new(move |switch: Switch, old: &SwitchValue, new: &SwitchValue| {
            log.lock().unwrap().push((switch, old.clone(), new.clone()));
        })
    }

    fn tracker() -> KeyStateTracker {
        KeyStateTracker::new(KeyTranslator::new(|keysym| format!("0x{keysym:X}")))
    }

    fn tracker_with_log(switches: &[Switch]) -> (KeyStateTracker, Log) {
        let log: Log = Arc::default();
        let mut tracker = tracker();
        for &switch in switches {
            tracker.subscribe(switch, recorder(log.clone()));
        }
        (tracker, log)
    }

    // Raw keysyms used throughout: 97 = "a", 98 = "b", 65293 = Enter,
    // 65505/65506 = left/right Shift, 65507 = left Ctrl.

    #[test]
    fn test_regular_press_and_release() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(97);
        assert_eq!(tracker.held_key(), Some("a"));

        tracker.key_released(97);
        assert_eq!(tracker.held_key(), None);

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                (Switch::Key, SwitchValue::no_key(), SwitchValue::key("a")),
                (Switch::Key, SwitchValue::key("a"), SwitchValue::no_key()),
            ]
        );
    }

    #[test]
    fn test_unrelated_release_does_not_clear_held_key() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(97);
        tracker.key_released(98);

        assert_eq!(tracker.held_key(), Some("a"), "releasing b must not clear a");
        assert_eq!(log.lock().unwrap().len(), 1, "no transition for the unrelated release");
    }

    #[test]
    fn test_release_without_press_is_silent() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_released(97);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(tracker.held_key(), None);
    }

    #[test]
    fn test_second_press_replaces_held_key() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(97);
        tracker.key_pressed(98);
        tracker.key_released(97);
        tracker.key_released(98);

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                (Switch::Key, SwitchValue::no_key(), SwitchValue::key("a")),
                (Switch::Key, SwitchValue::key("a"), SwitchValue::key("b")),
                (Switch::Key, SwitchValue::key("b"), SwitchValue::no_key()),
            ]
        );
    }

    #[test]
    fn test_autorepeat_press_fires_once() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(97);
        tracker.key_pressed(97);
        tracker.key_pressed(97);

        assert_eq!(log.lock().unwrap().len(), 1, "identical state must not re-fire");
    }

    #[test]
    fn test_enter_label_used_verbatim() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(65293);

        let log = log.lock().unwrap();
        assert_eq!(log[0].2, SwitchValue::key("Enter ⏎"));
    }

    #[test]
    fn test_fallback_label_flows_through_transition() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        // 65470 (F1) has no explicit label; the platform fallback names it
        tracker.key_pressed(65470);

        let log = log.lock().unwrap();
        assert_eq!(log[0].2, SwitchValue::key("0xFFBE"));
    }

    #[test]
    fn test_modifier_press_is_not_a_regular_key() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(65505);
        tracker.key_released(65505);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(tracker.held_key(), None);
    }

    #[test]
    fn test_modifier_chord_leaves_held_key_alone() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(97);
        tracker.key_pressed(65507);
        tracker.key_released(65507);

        assert_eq!(tracker.held_key(), Some("a"));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_modifier_edge_notifications() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Shift]);

        tracker.key_pressed(65505);
        tracker.key_released(65505);

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                (Switch::Shift, SwitchValue::Pressed(false), SwitchValue::Pressed(true)),
                (Switch::Shift, SwitchValue::Pressed(true), SwitchValue::Pressed(false)),
            ]
        );
    }

    #[test]
    fn test_left_right_shift_collapse() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Shift]);

        // Left then right: one press edge
        tracker.key_pressed(65505);
        tracker.key_pressed(65506);
        assert_eq!(log.lock().unwrap().len(), 1);
        assert!(tracker.pressed(Switch::Shift));

        // Releasing one of the two is silent, depth stays above zero
        tracker.key_released(65505);
        assert_eq!(log.lock().unwrap().len(), 1);
        assert!(tracker.pressed(Switch::Shift));

        // Releasing the last one fires the release edge
        tracker.key_released(65506);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(
            log[1],
            (Switch::Shift, SwitchValue::Pressed(true), SwitchValue::Pressed(false))
        );
        assert!(!tracker.pressed(Switch::Shift));
    }

    #[test]
    fn test_depth_floors_at_zero() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Ctrl]);

        // Spurious releases must not drive the depth negative or fire
        tracker.key_released(65507);
        tracker.key_released(65508);
        assert!(log.lock().unwrap().is_empty());
        assert!(!tracker.pressed(Switch::Ctrl));

        // State self-corrects: the next press fires a clean press edge
        tracker.key_pressed(65507);
        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![(Switch::Ctrl, SwitchValue::Pressed(false), SwitchValue::Pressed(true))]
        );
    }

    #[test]
    fn test_extra_release_does_not_lock_the_switch() {
        let mut tracker = tracker();

        tracker.key_pressed(65505);
        tracker.key_pressed(65506);
        tracker.key_released(65505);
        tracker.key_released(65506);
        // Spurious third release clamps at zero instead of going negative
        tracker.key_released(65505);
        tracker.key_pressed(65505);

        assert!(tracker.pressed(Switch::Shift));
        tracker.key_released(65505);
        assert!(!tracker.pressed(Switch::Shift));
    }

    #[test]
    fn test_init_modifiers_fires_one_self_transition_each() {
        let log: Log = Arc::default();
        let mut tracker = tracker();
        for switch in Switch::MODIFIERS {
            tracker.subscribe(switch, recorder(log.clone()));
        }
        tracker.subscribe(Switch::Key, recorder(log.clone()));

        tracker.init_modifiers();

        let log = log.lock().unwrap();
        assert_eq!(log.len(), Switch::MODIFIERS.len());
        for (i, &switch) in Switch::MODIFIERS.iter().enumerate() {
            assert_eq!(
                log[i],
                (switch, SwitchValue::Pressed(false), SwitchValue::Pressed(false))
            );
        }
    }

    #[test]
    fn test_key_typed_is_ignored() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key, Switch::Shift]);

        tracker.key_typed(97);
        tracker.key_typed(65505);

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(tracker.held_key(), None);
    }

    #[test]
    fn test_caps_is_a_regular_key() {
        let (mut tracker, log) = tracker_with_log(&[Switch::Key]);

        tracker.key_pressed(65509);

        let log = log.lock().unwrap();
        assert_eq!(log[0].2, SwitchValue::key("Caps"));
    }

    #[test]
    fn test_mouse_button_press_and_release() {
        let log: Log = Arc::default();
        let mut mouse = MouseStateTracker::new();
        mouse.subscribe(Switch::MouseLeft, recorder(log.clone()));

        mouse.button_pressed(272);
        assert!(mouse.pressed(Switch::MouseLeft));
        mouse.button_released(272);
        assert!(!mouse.pressed(Switch::MouseLeft));

        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![
                (Switch::MouseLeft, SwitchValue::Pressed(false), SwitchValue::Pressed(true)),
                (Switch::MouseLeft, SwitchValue::Pressed(true), SwitchValue::Pressed(false)),
            ]
        );
    }

    #[test]
    fn test_mouse_duplicate_events_are_silent() {
        let log: Log = Arc::default();
        let mut mouse = MouseStateTracker::new();
        mouse.subscribe(Switch::MouseRight, recorder(log.clone()));

        mouse.button_pressed(273);
        mouse.button_pressed(273);
        assert_eq!(log.lock().unwrap().len(), 1);

        mouse.button_released(273);
        mouse.button_released(273);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_mouse_unknown_button_is_ignored() {
        let log: Log = Arc::default();
        let mut mouse = MouseStateTracker::new();
        for switch in Switch::MOUSE_BUTTONS {
            mouse.subscribe(switch, recorder(log.clone()));
        }

        // BTN_SIDE has no switch in the catalog
        mouse.button_pressed(275);

        assert!(log.lock().unwrap().is_empty());
    }
}
