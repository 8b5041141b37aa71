//! Device discovery and classification

use std::path::PathBuf;

use anyhow::Result;
use evdev::Device;
use keycast_config::Config;

/// Identity of an input device
#[derive(Debug)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub vendor: u16,
    pub product: u16,
}

impl DeviceInfo {
    /// Get vendor:product string (e.g., "3434:0361")
    pub fn vendor_product(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor, self.product)
    }
}

/// A device selected for watching, opened and ready to stream
pub struct WatchedDevice {
    pub info: DeviceInfo,
    pub device: Device,
}

/// Check if a device is a keyboard
pub fn is_keyboard(device: &Device) -> bool {
    device.supported_events().contains(evdev::EventType::KEY)
        && device
            .supported_keys()
            .map(|keys| keys.contains(evdev::Key::KEY_A))
            .unwrap_or(false)
}

/// Check if a device is a mouse
pub fn is_mouse(device: &Device) -> bool {
    device.supported_events().contains(evdev::EventType::KEY)
        && device
            .supported_keys()
            .map(|keys| keys.contains(evdev::Key::BTN_LEFT))
            .unwrap_or(false)
}

/// Discover every keyboard and mouse the configuration selects.
///
/// Devices are only observed, never grabbed; events keep flowing to their
/// normal consumers.
pub fn discover(config: &Config) -> Result<Vec<WatchedDevice>> {
    let mut watched = Vec::new();

    for entry in std::fs::read_dir("/dev/input")? {
        let entry = entry?;
        let path = entry.path();

        // Only look at event* devices
        if !path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("event"))
            .unwrap_or(false)
        {
            continue;
        }

        let device = match Device::open(&path) {
            Ok(device) => device,
            Err(e) => {
                tracing::debug!("Could not open {}: {}", path.display(), e);
                continue;
            }
        };

        if !(is_keyboard(&device) || is_mouse(&device)) {
            continue;
        }

        let name = device.name().unwrap_or("Unknown").to_string();
        let id = device.input_id();
        let info = DeviceInfo {
            path,
            name,
            vendor: id.vendor(),
            product: id.product(),
        };

        if !config.watches(&info.name, &info.vendor_product()) {
            tracing::debug!("Skipping {} (filtered by config)", info.name);
            continue;
        }

        watched.push(WatchedDevice { info, device });
    }

    Ok(watched)
}
