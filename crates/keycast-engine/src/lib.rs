//! Input normalization and state-dispatch engine
//!
//! Takes raw hardware key/button events (keysym-style raw codes plus a
//! press/release direction) and turns them into de-duplicated logical
//! state transitions that a renderer can consume:
//!
//! - [`Switch`] is the fixed catalog of on-screen switches. Left and right
//!   variants of a modifier collapse into one switch.
//! - [`KeyTranslator`] resolves a raw code to a display label, falling back
//!   to a platform-supplied lookup so the result is always total.
//! - [`KeyStateTracker`] and [`MouseStateTracker`] hold the logical state
//!   and decide whether a raw event is an actual transition.
//! - [`Dispatcher`] fans transitions out to registered [`Subscriber`]s in
//!   registration order, with no filtering of its own.
//!
//! The engine performs no I/O and never blocks; callers must feed it events
//! one at a time from a single writer.

mod dispatch;
mod keymap;
mod switch;
mod tracker;
mod value;

pub use dispatch::{Dispatcher, Subscriber};
pub use keymap::{button_for, label_for, modifier_for, KeyTranslator};
pub use switch::Switch;
pub use tracker::{KeyStateTracker, MouseStateTracker};
pub use value::SwitchValue;
