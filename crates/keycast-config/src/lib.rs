//! Configuration parsing for keycast
//!
//! This crate handles parsing the KDL configuration file: overlay timing,
//! logging, and which input devices to watch.

mod error;
mod model;
mod parser;

pub use error::ConfigError;
pub use model::*;
pub use parser::{parse_config, parse_config_str};
