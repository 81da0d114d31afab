//! `guidmap upgrade` and `guidmap clear`.

use guidmap_cache::{codec, file, layout, CacheStore};
use guidmap_config::GuidmapConfig;

use crate::session::cache_path;
use crate::GlobalArgs;

/// Runs the `guidmap upgrade` command.
///
/// Decodes the cache (legacy files are migrated in memory) and writes it back
/// in the current format. A file already in the current format is left alone.
/// The version check and the migration both work from a single read.
pub fn run(global: &GlobalArgs, config: &GuidmapConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let bytes = file::read_cache_file(&path)?;
    let decoded = codec::decode(&bytes)?;
    let version = decoded.source_version;
    if !decoded.was_migrated() {
        if !global.quiet {
            println!("{} is already version {version}", path.display());
        }
        return Ok(0);
    }

    let store = CacheStore::new();
    store.replace_with(decoded);
    let count = store.save_to_file(&path)?;
    if !global.quiet {
        println!(
            "upgraded {} from version {version} to version {} ({count} entries)",
            path.display(),
            layout::CURRENT_VERSION
        );
    }
    Ok(0)
}

/// Runs the `guidmap clear` command.
///
/// Writes an empty cache without reading the old one, so it also resets a
/// corrupt file.
pub fn run_clear(
    global: &GlobalArgs,
    config: &GuidmapConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    CacheStore::new().save_to_file(&path)?;
    if !global.quiet {
        println!("cleared {}", path.display());
    }
    Ok(0)
}
