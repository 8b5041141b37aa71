//! Configuration data model

/// Root configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
    pub overlay: OverlayConfig,
    pub devices: Vec<DeviceFilter>,
}

impl Config {
    /// Whether a device with the given identity should be watched.
    ///
    /// An empty filter list means every keyboard and mouse is watched.
    pub fn watches(&self, name: &str, vendor_product: &str) -> bool {
        self.devices.is_empty()
            || self
                .devices
                .iter()
                .any(|filter| filter.matches(name, vendor_product))
    }
}

/// Global settings
#[derive(Debug, Clone, Default)]
pub struct GlobalConfig {
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by tracing's EnvFilter.
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Overlay presentation settings
///
/// The decay delays control how long a released switch stays visible
/// before the caster clears it. Presentation only; the state trackers
/// never see these values.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Milliseconds to wait before clearing the regular key
    pub regular_decay_ms: u64,
    /// Milliseconds to wait before clearing a modifier key
    pub modifier_decay_ms: u64,
    /// Whether mouse buttons appear in the overlay
    pub show_mouse: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            regular_decay_ms: 250,
            modifier_decay_ms: 150,
            show_mouse: true,
        }
    }
}

/// Selects which input devices to watch
///
/// A filter with both fields set requires both to match.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    /// Device name to match (from evdev)
    pub name: Option<String>,
    /// Vendor:Product ID to match (e.g., "3434:0361")
    pub vendor_product: Option<String>,
}

impl DeviceFilter {
    pub fn matches(&self, name: &str, vendor_product: &str) -> bool {
        let name_ok = self.name.as_deref().map_or(true, |n| n == name);
        let id_ok = self
            .vendor_product
            .as_deref()
            .map_or(true, |id| id.eq_ignore_ascii_case(vendor_product));

        name_ok && id_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_list_watches_everything() {
        let config = Config::default();
        assert!(config.watches("Any Keyboard", "1234:abcd"));
    }

    #[test]
    fn test_name_filter() {
        let filter = DeviceFilter {
            name: Some("Keychron K3 Pro".to_string()),
            vendor_product: None,
        };
        assert!(filter.matches("Keychron K3 Pro", "3434:0361"));
        assert!(!filter.matches("Other Keyboard", "3434:0361"));
    }

    #[test]
    fn test_vendor_product_filter_case_insensitive() {
        let filter = DeviceFilter {
            name: None,
            vendor_product: Some("3434:ABCD".to_string()),
        };
        assert!(filter.matches("whatever", "3434:abcd"));
        assert!(!filter.matches("whatever", "3434:0361"));
    }

    #[test]
    fn test_both_fields_must_match() {
        let filter = DeviceFilter {
            name: Some("Keychron K3 Pro".to_string()),
            vendor_product: Some("3434:0361".to_string()),
        };
        assert!(filter.matches("Keychron K3 Pro", "3434:0361"));
        assert!(!filter.matches("Keychron K3 Pro", "ffff:ffff"));
        assert!(!filter.matches("Other", "3434:0361"));
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_overlay_defaults() {
        let overlay = OverlayConfig::default();
        assert_eq!(overlay.regular_decay_ms, 250);
        assert_eq!(overlay.modifier_decay_ms, 150);
        assert!(overlay.show_mouse);
    }
}
