//! `guidmap import`: bulk registration from text lists.
//!
//! Each list holds one name per line; blank lines and surrounding whitespace
//! are ignored. Lines are split into chunks that rayon workers hash and
//! insert into the shared store, one lock acquisition per chunk.

use std::path::Path;

use guidmap_cache::CacheStore;
use guidmap_config::GuidmapConfig;
use rayon::prelude::*;
use tracing::info;

use crate::session::{cache_path, open_store};
use crate::{GlobalArgs, ImportArgs};

/// Reads `path` and returns its non-empty, trimmed lines.
pub fn read_name_list(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read name list {}: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

const IMPORT_CHUNK: usize = 256;

/// Adds every name to `store` in parallel. Returns the number of names added.
pub fn import_parallel(store: &CacheStore, names: &[String]) -> usize {
    names
        .par_chunks(IMPORT_CHUNK)
        .map(|chunk| store.import_names(chunk))
        .sum()
}

/// Runs the `guidmap import` command.
pub fn run(
    args: &ImportArgs,
    global: &GlobalArgs,
    config: &GuidmapConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let store = open_store(&path, config.cache.create_missing)?;
    let before = store.len();

    let mut total = 0;
    for list in &args.lists {
        let names = read_name_list(list)?;
        let added = import_parallel(&store, &names);
        info!(list = %list.display(), names = added, "imported name list");
        total += added;
    }

    store.save_to_file(&path)?;
    if !global.quiet {
        println!(
            "imported {total} names from {} list(s); cache now holds {} entries ({} new)",
            args.lists.len(),
            store.len(),
            store.len().saturating_sub(before)
        );
    }
    Ok(0)
}
