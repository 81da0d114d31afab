//! `guidmap inspect`: report on the cache file without loading it into a store.

use std::fmt::Write as _;
use std::path::Path;

use guidmap_cache::layout::{self, HeaderInfo, CURRENT_VERSION};
use guidmap_cache::{codec, file};
use guidmap_config::GuidmapConfig;

use crate::session::cache_path;
use crate::GlobalArgs;

/// What `inspect` found in a cache file.
#[derive(Debug)]
pub struct Inspection {
    /// File size in bytes.
    pub size: usize,
    /// Decoded header.
    pub header: HeaderInfo,
    /// CRC computed over the payload (current format only).
    pub computed_crc: Option<u32>,
    /// Entry count if the whole file decodes, otherwise the reason it does not.
    pub decoded: Result<usize, String>,
}

impl Inspection {
    /// Renders a human-readable report.
    pub fn render(&self, path: &Path) -> String {
        let mut out = String::new();
        let h = &self.header;
        let _ = writeln!(out, "file:                {}", path.display());
        let _ = writeln!(out, "size:                {} bytes", self.size);
        let _ = writeln!(out, "version:             {}", h.version);
        let _ = writeln!(out, "mappings:            {}", h.num_mappings);
        let _ = writeln!(out, "string table offset: {}", h.string_table_offset);
        let _ = writeln!(
            out,
            "reserved:            {:#x} {:#x} {:#x}",
            h.reserved.a, h.reserved.b[0], h.reserved.b[1]
        );
        match (h.crc, self.computed_crc) {
            (Some(stored), Some(computed)) => {
                let verdict = if stored == computed { "ok" } else { "MISMATCH" };
                let _ = writeln!(
                    out,
                    "crc:                 stored {stored:#010x}, computed {computed:#010x} ({verdict})"
                );
            }
            _ => {
                let _ = writeln!(out, "crc:                 none (legacy format)");
            }
        }
        match &self.decoded {
            Ok(count) => {
                let _ = write!(out, "status:              valid, {count} entries");
            }
            Err(reason) => {
                let _ = write!(out, "status:              invalid: {reason}");
            }
        }
        out
    }
}

/// Reads and analyses the cache file at `path`.
pub fn inspect_file(path: &Path) -> Result<Inspection, Box<dyn std::error::Error>> {
    let bytes = file::read_cache_file(path)?;
    let header = layout::read_header(&bytes)?;
    let computed_crc = if header.version == CURRENT_VERSION {
        layout::payload_crc(&bytes).ok()
    } else {
        None
    };
    let decoded = codec::decode(&bytes)
        .map(|d| d.entries.len())
        .map_err(|e| e.to_string());
    Ok(Inspection {
        size: bytes.len(),
        header,
        computed_crc,
        decoded,
    })
}

/// Runs the `guidmap inspect` command.
///
/// Returns exit code 1 if the file does not fully validate.
pub fn run(global: &GlobalArgs, config: &GuidmapConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let path = cache_path(global, config);
    let inspection = inspect_file(&path)?;
    println!("{}", inspection.render(&path));
    Ok(if inspection.decoded.is_ok() { 0 } else { 1 })
}
