//! `guidmap dump`: list every cached entry.

use guidmap_cache::CacheEntry;
use guidmap_config::GuidmapConfig;

use crate::lookup::format_entry;
use crate::session::{cache_path, open_store};
use crate::{DumpArgs, GlobalArgs, ReportFormat};

/// Renders `entries` (already sorted) in the requested format.
pub fn render(entries: &[CacheEntry], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(entries
            .iter()
            .map(format_entry)
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Json => serde_json::to_string_pretty(entries),
    }
}

/// Runs the `guidmap dump` command. Entries are ordered by GUID.
pub fn run(
    args: &DumpArgs,
    global: &GlobalArgs,
    config: &GuidmapConfig,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let store = open_store(&path, false)?;

    let mut entries = store.snapshot();
    entries.sort_by_key(|e| e.guid);
    let out = render(&entries, args.format)?;
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(0)
}
