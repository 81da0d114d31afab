//! Shared setup for commands: configuration lookup and opening the cache.

use std::path::{Path, PathBuf};

use guidmap_cache::CacheStore;
use guidmap_config::GuidmapConfig;
use tracing::info;

use crate::GlobalArgs;

/// Loads `--config` if given, otherwise `guidmap.toml` from the working
/// directory (falling back to defaults when absent).
pub fn resolve_config(global: &GlobalArgs) -> Result<GuidmapConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => guidmap_config::load_config_file(path)?,
        None => guidmap_config::load_config(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// The cache file to operate on: `--cache` wins over `cache.path`.
pub fn cache_path(global: &GlobalArgs, config: &GuidmapConfig) -> PathBuf {
    global
        .cache
        .clone()
        .unwrap_or_else(|| config.cache.path.clone())
}

/// Opens the cache at `path`.
///
/// A missing file yields an empty store when `create_missing` is set; any
/// other load failure is returned as is.
pub fn open_store(
    path: &Path,
    create_missing: bool,
) -> Result<CacheStore, Box<dyn std::error::Error>> {
    let store = CacheStore::new();
    if !path.exists() {
        if create_missing {
            info!(path = %path.display(), "no cache file yet, starting empty");
            return Ok(store);
        }
        return Err(format!("cache file not found: {}", path.display()).into());
    }
    store.load_from_file(path)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::globals;

    #[test]
    fn cli_cache_overrides_config() {
        let global = globals(Path::new("cli.bin"));
        let config = GuidmapConfig::default();
        assert_eq!(cache_path(&global, &config), PathBuf::from("cli.bin"));
    }

    #[test]
    fn config_cache_is_fallback() {
        let mut global = globals(Path::new("unused"));
        global.cache = None;
        let config = guidmap_config::load_config_from_str("[cache]\npath = \"cfg.bin\"\n").unwrap();
        assert_eq!(cache_path(&global, &config), PathBuf::from("cfg.bin"));
    }

    #[test]
    fn missing_cache_starts_empty_when_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir.path().join("none.bin"), true).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn missing_cache_errors_when_required() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_store(&dir.path().join("none.bin"), false).unwrap_err();
        assert!(err.to_string().contains("cache file not found"));
    }

    #[test]
    fn corrupt_cache_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"garbage data").unwrap();
        assert!(open_store(&path, true).is_err());
    }

    #[test]
    fn explicit_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("alt.toml");
        std::fs::write(&cfg, "[log]\nlevel = \"warn\"\n").unwrap();
        let mut global = globals(Path::new("c.bin"));
        global.config = Some(cfg);
        let config = resolve_config(&global).unwrap();
        assert_eq!(config.log.level, guidmap_config::LogLevel::Warn);
    }
}
