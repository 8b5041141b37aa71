//! keycast CLI
//!
//! Configuration and inspection tool for keycast.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

#[derive(Parser, Debug)]
#[command(name = "keycast")]
#[command(about = "On-screen input overlay tool")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/keycast/config.kdl")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration file
    Validate,

    /// List available input devices
    Devices,

    /// Show the running daemon's switch states
    Status,
}

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Expand tilde in config path
    let config_path: PathBuf = shellexpand::tilde(&cli.config).into_owned().into();

    match cli.command {
        Commands::Validate => cmd_validate(&config_path),
        Commands::Devices => cmd_devices(),
        Commands::Status => cmd_status(),
    }
}

fn cmd_validate(config_path: &PathBuf) -> miette::Result<()> {
    println!("Validating configuration: {}", config_path.display());

    match keycast_config::parse_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!("  Log level: {:?}", config.global.log_level);
            println!(
                "  Overlay: regular decay {}ms, modifier decay {}ms, mouse {}",
                config.overlay.regular_decay_ms,
                config.overlay.modifier_decay_ms,
                if config.overlay.show_mouse { "shown" } else { "hidden" },
            );
            if config.devices.is_empty() {
                println!("  Devices: all keyboards and mice");
            } else {
                println!("  Devices: {} filter(s)", config.devices.len());
                for filter in &config.devices {
                    println!(
                        "    - {} [{}]",
                        filter.name.as_deref().unwrap_or("<any name>"),
                        filter.vendor_product.as_deref().unwrap_or("any id"),
                    );
                }
            }
            Ok(())
        }
        // ConfigError is a Diagnostic; let miette render spans and help
        Err(e) => Err(e.into()),
    }
}

fn cmd_devices() -> miette::Result<()> {
    println!("Available input devices:\n");

    for entry in std::fs::read_dir("/dev/input").into_diagnostic()? {
        let entry = entry.into_diagnostic()?;
        let path = entry.path();

        if !path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("event"))
            .unwrap_or(false)
        {
            continue;
        }

        match evdev::Device::open(&path) {
            Ok(device) => {
                let name = device.name().unwrap_or("Unknown");
                let id = device.input_id();
                let vendor_product = format!("{:04x}:{:04x}", id.vendor(), id.product());

                let has_key_events = device.supported_events().contains(evdev::EventType::KEY);
                let is_keyboard = has_key_events
                    && device
                        .supported_keys()
                        .map(|keys| keys.contains(evdev::Key::KEY_A))
                        .unwrap_or(false);
                let is_mouse = has_key_events
                    && device
                        .supported_keys()
                        .map(|keys| keys.contains(evdev::Key::BTN_LEFT))
                        .unwrap_or(false);

                let device_type = match (is_keyboard, is_mouse) {
                    (true, true) => "keyboard+mouse",
                    (true, false) => "keyboard",
                    (false, true) => "mouse",
                    (false, false) => "other",
                };

                println!("  {} [{}]", name, device_type);
                println!("    Path: {}", path.display());
                println!("    ID: {}", vendor_product);
                println!();
            }
            Err(_) => {
                // Skip devices we can't open
            }
        }
    }

    Ok(())
}

fn cmd_status() -> miette::Result<()> {
    let socket_path = socket_path();

    let mut stream = UnixStream::connect(&socket_path).map_err(|e| {
        miette::miette!(
            "Could not connect to daemon at {} ({}). Is keycastd running?",
            socket_path.display(),
            e
        )
    })?;

    stream
        .write_all(b"{\"type\":\"status\"}\n")
        .into_diagnostic()?;

    let mut reader = BufReader::new(&stream);
    let mut line = String::new();
    reader.read_line(&mut line).into_diagnostic()?;

    let response: serde_json::Value = serde_json::from_str(line.trim()).into_diagnostic()?;
    println!("{}", serde_json::to_string_pretty(&response).into_diagnostic()?);

    Ok(())
}

/// Daemon socket path; must mirror the daemon's resolution rules.
fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("keycast.sock")
    } else {
        let uid = nix::unistd::Uid::current();
        PathBuf::from(format!("/tmp/keycast-{}.sock", uid))
    }
}
