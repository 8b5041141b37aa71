//! keycast daemon
//!
//! Watches keyboard and mouse devices and casts their logical state to a
//! terminal overlay and an IPC status socket. All state decisions live in
//! keycast-engine; this binary is capture and presentation glue.

mod caster;
mod device;
mod ipc;
mod keysym;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use keycast_config::Config;
use keycast_engine::{button_for, KeyStateTracker, KeyTranslator, MouseStateTracker, Switch};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keycastd")]
#[command(about = "On-screen input overlay daemon")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/keycast/config.kdl")]
    config: String,

    /// Disable the IPC status socket
    #[arg(long)]
    no_ipc: bool,
}

/// A raw key event as read off an evdev device.
#[derive(Debug, Clone, Copy)]
struct RawEvent {
    code: u16,
    value: i32,
}

// evdev event values; 2 (autorepeat) is deliberately unhandled
const RELEASE: i32 = 0;
const PRESS: i32 = 1;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path: PathBuf = shellexpand::tilde(&args.config).into_owned().into();
    let config = load_config(&config_path)?;

    // Overlay painting owns stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.global.log_level.as_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Loaded configuration from {}", config_path.display());

    let watched = device::discover(&config)?;
    anyhow::ensure!(
        !watched.is_empty(),
        "no watchable input devices found (is this user in the `input` group?)"
    );

    let (event_tx, event_rx) = mpsc::channel::<RawEvent>(1024);

    for entry in watched {
        tracing::info!(
            "Watching {} [{}]",
            entry.info.name,
            entry.info.vendor_product()
        );
        tokio::spawn(read_device(entry.device, event_tx.clone()));
    }
    drop(event_tx);

    let (transition_tx, transition_rx) = mpsc::unbounded_channel();
    tokio::spawn(caster::run(transition_rx, config.overlay.clone()));

    let (status_tx, status_rx) = watch::channel(Vec::new());
    if !args.no_ipc {
        let socket = ipc::StatusSocket::bind(status_rx)?;
        tokio::spawn(socket.serve());
    }

    let engine = tokio::spawn(run_engine(
        event_rx,
        config.overlay.show_mouse,
        transition_tx,
        status_tx,
    ));

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down...");
    engine.abort();

    Ok(())
}

/// Load the configuration, falling back to defaults when no file exists.
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        keycast_config::parse_config(path)
            .with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

/// Forward KEY events from one device into the engine channel.
///
/// The channel serializes events from every device into a single consumer,
/// so switch state only ever has one writer.
async fn read_device(device: evdev::Device, tx: mpsc::Sender<RawEvent>) {
    let name = device.name().unwrap_or("Unknown").to_string();

    let mut stream = match device.into_event_stream() {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Could not stream events from {}: {}", name, e);
            return;
        }
    };

    loop {
        match stream.next_event().await {
            Ok(event) => {
                if event.event_type() != evdev::EventType::KEY {
                    continue;
                }

                let raw = RawEvent {
                    code: event.code(),
                    value: event.value(),
                };

                if tx.send(raw).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!("Lost device {}: {}", name, e);
                return;
            }
        }
    }
}

/// The engine loop: sole writer of all switch state.
async fn run_engine(
    mut rx: mpsc::Receiver<RawEvent>,
    show_mouse: bool,
    transition_tx: mpsc::UnboundedSender<caster::Transition>,
    status_tx: watch::Sender<Vec<ipc::SwitchState>>,
) {
    let translator = KeyTranslator::new(keysym::keysym_name);
    let mut keyboard = KeyStateTracker::new(translator);
    let mut mouse = MouseStateTracker::new();

    keyboard.subscribe(Switch::Key, caster::forwarder(transition_tx.clone()));
    for switch in Switch::MODIFIERS {
        keyboard.subscribe(switch, caster::forwarder(transition_tx.clone()));
    }
    if show_mouse {
        for switch in Switch::MOUSE_BUTTONS {
            mouse.subscribe(switch, caster::forwarder(transition_tx.clone()));
        }
    }

    // Primes every subscriber's released rendering path, once, before any
    // real event is processed
    keyboard.init_modifiers();

    while let Some(event) = rx.recv().await {
        let code = u32::from(event.code);

        if button_for(code).is_some() {
            match event.value {
                PRESS => mouse.button_pressed(code),
                RELEASE => mouse.button_released(code),
                _ => {}
            }
        } else {
            let keysym = keysym::keysym_for(evdev::Key::new(event.code));
            match event.value {
                PRESS => keyboard.key_pressed(keysym),
                RELEASE => keyboard.key_released(keysym),
                // Autorepeat mirrors the ignored "typed" event class:
                // counting it would double-fire held keys
                _ => {}
            }
        }

        let _ = status_tx.send(snapshot(&keyboard, &mouse));
    }
}

/// Current logical state of every switch, for the IPC status response.
fn snapshot(keyboard: &KeyStateTracker, mouse: &MouseStateTracker) -> Vec<ipc::SwitchState> {
    let mut switches = Vec::new();

    switches.push(ipc::SwitchState {
        switch: Switch::Key.name().to_string(),
        pressed: None,
        held: keyboard.held_key().map(str::to_string),
    });

    for switch in Switch::MODIFIERS {
        switches.push(ipc::SwitchState {
            switch: switch.name().to_string(),
            pressed: Some(keyboard.pressed(switch)),
            held: None,
        });
    }

    for switch in Switch::MOUSE_BUTTONS {
        switches.push(ipc::SwitchState {
            switch: switch.name().to_string(),
            pressed: Some(mouse.pressed(switch)),
            held: None,
        });
    }

    switches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.kdl")).unwrap();
        assert_eq!(config.overlay.regular_decay_ms, 250);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.kdl");
        std::fs::write(
            &path,
            r#"
            overlay {
                regular-decay-ms 500
            }
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.overlay.regular_decay_ms, 500);
    }

    #[test]
    fn test_load_config_surfaces_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.kdl");
        std::fs::write(&path, "overlay {").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_snapshot_covers_the_whole_catalog() {
        let keyboard = KeyStateTracker::new(KeyTranslator::new(keysym::keysym_name));
        let mouse = MouseStateTracker::new();

        let snapshot = snapshot(&keyboard, &mouse);

        // Regular slot + modifiers + mouse buttons
        assert_eq!(
            snapshot.len(),
            1 + Switch::MODIFIERS.len() + Switch::MOUSE_BUTTONS.len()
        );
        assert_eq!(snapshot[0].switch, "Key");
        assert_eq!(snapshot[0].held, None);
        assert!(snapshot[1..].iter().all(|s| s.pressed == Some(false)));
    }
}
