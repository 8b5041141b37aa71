//! Terminal overlay rendering
//!
//! The caster is the renderer collaborator of the engine: a subscriber
//! forwards every transition over a channel onto this single-threaded
//! display loop, which repaints one status line and applies the visual
//! decay delays. Decay is presentation only; tracker state is never
//! touched from here.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use keycast_config::OverlayConfig;
use keycast_engine::{Subscriber, Switch, SwitchValue};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// One state change, as forwarded from the engine thread.
#[derive(Debug, Clone)]
pub struct Transition {
    pub switch: Switch,
    pub old: SwitchValue,
    pub new: SwitchValue,
}

/// Build a subscriber that forwards transitions into the display loop.
pub fn forwarder(tx: mpsc::UnboundedSender<Transition>) -> Box<dyn Subscriber> {
    Box::new(move |switch: Switch, old: &SwitchValue, new: &SwitchValue| {
        let transition = Transition {
            switch,
            old: old.clone(),
            new: new.clone(),
        };

        if tx.send(transition).is_err() {
            tracing::debug!("display loop gone, dropping transition");
        }
    })
}

/// Displayed overlay state, decoupled from the logical tracker state by
/// the decay delays: a released switch stays lit until its delay expires
/// so fast taps remain visible.
pub struct Overlay {
    config: OverlayConfig,
    regular: Option<String>,
    lit: HashMap<Switch, bool>,
    expiries: HashMap<Switch, Instant>,
}

impl Overlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            regular: None,
            lit: HashMap::new(),
            expiries: HashMap::new(),
        }
    }

    /// Apply one transition at the given time.
    pub fn apply(&mut self, transition: &Transition, now: Instant) {
        match &transition.new {
            SwitchValue::Key(Some(label)) => {
                self.regular = Some(label.clone());
                self.expiries.remove(&transition.switch);
            }
            SwitchValue::Key(None) => {
                self.expiries.insert(
                    transition.switch,
                    now + Duration::from_millis(self.config.regular_decay_ms),
                );
            }
            SwitchValue::Pressed(true) => {
                self.lit.insert(transition.switch, true);
                self.expiries.remove(&transition.switch);
            }
            SwitchValue::Pressed(false) => {
                // Self-transitions from initialization land here too and
                // prime the released rendering path
                if self.lit.get(&transition.switch).copied().unwrap_or(false) {
                    self.expiries.insert(
                        transition.switch,
                        now + Duration::from_millis(self.config.modifier_decay_ms),
                    );
                } else {
                    self.lit.insert(transition.switch, false);
                }
            }
        }
    }

    /// Clear every switch whose decay delay has elapsed.
    pub fn expire(&mut self, now: Instant) {
        let due: Vec<Switch> = self
            .expiries
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(switch, _)| *switch)
            .collect();

        for switch in due {
            self.expiries.remove(&switch);
            if switch == Switch::Key {
                self.regular = None;
            } else {
                self.lit.insert(switch, false);
            }
        }
    }

    /// The next pending decay deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiries.values().min().copied()
    }

    /// Render the overlay as a single line.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();

        for switch in Switch::MODIFIERS {
            if self.lit.get(&switch).copied().unwrap_or(false) {
                parts.push(format!("[{}]", switch.name()));
            }
        }

        if self.config.show_mouse {
            for switch in Switch::MOUSE_BUTTONS {
                if self.lit.get(&switch).copied().unwrap_or(false) {
                    parts.push(format!("[{}]", switch.name()));
                }
            }
        }

        if let Some(label) = &self.regular {
            parts.push(label.clone());
        }

        parts.join(" ")
    }
}

/// Display loop: repaint on every transition and on decay expiry.
pub async fn run(mut rx: mpsc::UnboundedReceiver<Transition>, config: OverlayConfig) {
    let mut overlay = Overlay::new(config);

    loop {
        let deadline = overlay.next_deadline();

        tokio::select! {
            transition = rx.recv() => {
                match transition {
                    Some(transition) => overlay.apply(&transition, Instant::now()),
                    None => break,
                }
            }
            _ = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    // No pending decay; wait for the next transition
                    None => std::future::pending().await,
                }
            } => {
                overlay.expire(Instant::now());
            }
        }

        paint(&overlay.render());
    }
}

fn paint(line: &str) {
    print!("\r\x1b[2K{}", line);
    let _ = std::io::stdout().flush();
}
