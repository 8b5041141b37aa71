//! KDL configuration parser

use std::path::Path;

use crate::error::ConfigError;
use crate::model::*;

/// Parse a configuration file from the given path
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string
pub fn parse_config_str(content: &str) -> Result<Config, ConfigError> {
    let doc: kdl::KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        // Convert span from kdl's miette version to our miette version
        let offset = e.span.offset();
        let len = e.span.len();
        let span = miette::SourceSpan::from((offset, len));
        ConfigError::Syntax {
            src: content.to_string(),
            span,
            source: e,
        }
    })?;

    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "global" => {
                config.global = parse_global(node)?;
            }
            "overlay" => {
                config.overlay = parse_overlay(node)?;
            }
            "device" => {
                config.devices.push(parse_device(node)?);
            }
            name => {
                tracing::warn!("Unknown top-level node: {}", name);
            }
        }
    }

    Ok(config)
}

fn first_string(node: &kdl::KdlNode) -> Option<&str> {
    node.entries().first().and_then(|e| e.value().as_string())
}

fn first_i64(node: &kdl::KdlNode) -> Option<i64> {
    node.entries().first().and_then(|e| e.value().as_i64())
}

fn first_bool(node: &kdl::KdlNode) -> Option<bool> {
    node.entries().first().and_then(|e| e.value().as_bool())
}

fn parse_global(node: &kdl::KdlNode) -> Result<GlobalConfig, ConfigError> {
    let mut global = GlobalConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "log-level" => {
                    if let Some(val) = first_string(child) {
                        global.log_level =
                            val.parse().map_err(|_| ConfigError::UnknownLogLevel {
                                value: val.to_string(),
                            })?;
                    }
                }
                name => {
                    tracing::warn!("Unknown global config option: {}", name);
                }
            }
        }
    }

    Ok(global)
}

fn parse_overlay(node: &kdl::KdlNode) -> Result<OverlayConfig, ConfigError> {
    let mut overlay = OverlayConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "regular-decay-ms" => {
                    overlay.regular_decay_ms = parse_decay(child, "regular-decay-ms")?;
                }
                "modifier-decay-ms" => {
                    overlay.modifier_decay_ms = parse_decay(child, "modifier-decay-ms")?;
                }
                "show-mouse" => {
                    if let Some(val) = first_bool(child) {
                        overlay.show_mouse = val;
                    }
                }
                name => {
                    tracing::warn!("Unknown overlay option: {}", name);
                }
            }
        }
    }

    Ok(overlay)
}

fn parse_decay(node: &kdl::KdlNode, field: &'static str) -> Result<u64, ConfigError> {
    let value = first_i64(node).ok_or(ConfigError::MissingDecay { field })?;

    if value <= 0 {
        return Err(ConfigError::InvalidDecay { field, value });
    }

    Ok(value as u64)
}

fn parse_device(node: &kdl::KdlNode) -> Result<DeviceFilter, ConfigError> {
    let name = first_string(node).map(|s| s.to_string());

    let mut device = DeviceFilter {
        name,
        vendor_product: None,
    };

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "vendor-product" => {
                    device.vendor_product = first_string(child).map(|s| s.to_string());
                }
                name => {
                    tracing::warn!("Unknown device config option: {}", name);
                }
            }
        }
    }

    // A filter that matches everything is a configuration mistake
    if device.name.is_none() && device.vendor_product.is_none() {
        return Err(ConfigError::EmptyDeviceFilter);
    }

    Ok(device)
}
