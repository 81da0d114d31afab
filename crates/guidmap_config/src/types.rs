//! Configuration types deserialized from `guidmap.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `guidmap.toml`.
///
/// Every section is optional; an empty file yields [`GuidmapConfig::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuidmapConfig {
    /// Cache file settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the cache lives and how a missing file is treated.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Path to the cache file, relative to the working directory.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Start from an empty store when the cache file does not exist yet.
    #[serde(default = "default_true")]
    pub create_missing: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            create_missing: true,
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("guidmap.bin")
}

fn default_true() -> bool {
    true
}

/// Logging settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Normal progress output.
    #[default]
    Info,
    /// Layout and I/O detail.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The directive string understood by log filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
