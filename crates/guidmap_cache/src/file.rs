//! Bounded reads and atomic writes of cache files.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CacheError;
use crate::layout::MAX_CACHE_FILE_SIZE;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CacheError + '_ {
    move |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a whole cache file into memory.
///
/// Files over [`MAX_CACHE_FILE_SIZE`] are rejected from their metadata before
/// any buffer is allocated, and the read itself is capped in case the file
/// grows in the meantime.
pub fn read_cache_file(path: &Path) -> Result<Vec<u8>, CacheError> {
    let file = File::open(path).map_err(io_error(path))?;
    let size = file.metadata().map_err(io_error(path))?.len();
    if size > MAX_CACHE_FILE_SIZE {
        return Err(CacheError::TooLarge {
            size,
            max: MAX_CACHE_FILE_SIZE,
        });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.take(MAX_CACHE_FILE_SIZE + 1)
        .read_to_end(&mut bytes)
        .map_err(io_error(path))?;
    if bytes.len() as u64 > MAX_CACHE_FILE_SIZE {
        return Err(CacheError::TooLarge {
            size: bytes.len() as u64,
            max: MAX_CACHE_FILE_SIZE,
        });
    }
    Ok(bytes)
}

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Suffix that marks a staging file.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Returns a fresh staging path beside `path`.
///
/// The name carries the process id and a per-process sequence number, so
/// concurrent writers to the same destination never share a staging file.
pub fn staging_path(path: &Path) -> PathBuf {
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("guidmap"));
    name.push(format!(".{}.{seq}{STAGING_SUFFIX}", process::id()));
    path.with_file_name(name)
}

/// Writes `bytes` to `path` without ever exposing a partial file.
///
/// The data goes to a staging file beside the destination, is synced, and
/// then renamed over it. On failure the staging file is removed and any
/// previous file at `path` is left untouched.
pub fn write_cache_file(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    if bytes.len() as u64 > MAX_CACHE_FILE_SIZE {
        return Err(CacheError::TooLarge {
            size: bytes.len() as u64,
            max: MAX_CACHE_FILE_SIZE,
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let staging = staging_path(path);
    let staged = File::options()
        .write(true)
        .create_new(true)
        .open(&staging)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
    if let Err(source) = staged {
        let _ = fs::remove_file(&staging);
        return Err(CacheError::Io {
            path: staging,
            source,
        });
    }

    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
