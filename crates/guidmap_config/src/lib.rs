//! Parsing and validation of `guidmap.toml` configuration files.
//!
//! This crate reads the optional tool configuration and produces a
//! strongly-typed [`GuidmapConfig`] with defaults for every missing section.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
