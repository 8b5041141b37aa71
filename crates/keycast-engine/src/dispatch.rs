//! Transition fan-out
//!
//! A pure publish/subscribe hub. All transition-suppression logic lives in
//! the trackers; the dispatcher delivers whatever it is told to, in
//! registration order, synchronously. Registration is process-lifetime;
//! there is no unsubscribe.

use std::collections::HashMap;

use crate::switch::Switch;
use crate::value::SwitchValue;

/// A downstream observer of one switch.
///
/// Receives every transition fired for the switch it subscribed to, in
/// fire-order, with both the old and the new value so renderers can decide
/// highlight direction.
pub trait Subscriber: Send {
    fn on_transition(&mut self, switch: Switch, old: &SwitchValue, new: &SwitchValue);
}

impl<F> Subscriber for F
where
    F: FnMut(Switch, &SwitchValue, &SwitchValue) + Send,
{
    fn on_transition(&mut self, switch: Switch, old: &SwitchValue, new: &SwitchValue) {
        self(switch, old, new)
    }
}

/// Maps each switch to the ordered list of subscribers interested in it.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: HashMap<Switch, Vec<Box<dyn Subscriber>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for a switch.
    pub fn subscribe(&mut self, switch: Switch, subscriber: Box<dyn Subscriber>) {
        self.subscribers.entry(switch).or_default().push(subscriber);
    }

    /// Deliver a transition to every subscriber of the switch.
    ///
    /// Calls run synchronously in registration order. No filtering or
    /// coalescing happens here; identical old/new pairs are delivered
    /// exactly as given.
    pub fn notify(&mut self, switch: Switch, old: &SwitchValue, new: &SwitchValue) {
        tracing::trace!(%switch, %old, %new, "transition");

        if let Some(subscribers) = self.subscribers.get_mut(&switch) {
            for subscriber in subscribers.iter_mut() {
                subscriber.on_transition(switch, old, new);
            }
        }
    }
}
