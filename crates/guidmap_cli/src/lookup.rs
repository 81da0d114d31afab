//! `guidmap lookup`: resolve GUIDs back to names.

use guidmap_cache::CacheEntry;
use guidmap_config::GuidmapConfig;

use crate::session::{cache_path, open_store};
use crate::{GlobalArgs, LookupArgs};

/// Formats one resolved entry as `<guid>  <name>[  (<file>)]`.
pub fn format_entry(entry: &CacheEntry) -> String {
    match entry.file_name() {
        Some(file) => format!("{}  {}  ({file})", entry.guid, entry.original_string),
        None => format!("{}  {}", entry.guid, entry.original_string),
    }
}

/// Runs the `guidmap lookup` command.
///
/// Returns exit code 1 if any GUID is not in the cache.
pub fn run(
    args: &LookupArgs,
    global: &GlobalArgs,
    config: &GuidmapConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let store = open_store(&path, false)?;

    let mut missing = 0;
    for guid in &args.guids {
        match store.lookup_guid(*guid) {
            Some(entry) => println!("{}", format_entry(&entry)),
            None => {
                missing += 1;
                eprintln!("{guid}  <not found>");
            }
        }
    }
    Ok(if missing == 0 { 0 } else { 1 })
}
