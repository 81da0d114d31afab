//! Error types for cache operations.

use std::path::PathBuf;

use guidmap_common::{CrcError, Guid};

/// Broad classification of a [`CacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Opening, reading, or writing a file failed.
    Io,
    /// The file is not something this version can interpret.
    Format,
    /// The file claims a known format but its contents do not hold together.
    Corruption,
    /// The caller asked for something the format cannot express.
    Usage,
}

/// Errors that can occur during cache operations.
///
/// None of these are fatal to the process. A failed load leaves the store
/// exactly as it was, and a failed save leaves any previous file in place.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing a cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The version tag is neither the legacy nor the current layout.
    #[error("unsupported cache file version {version}")]
    UnsupportedVersion {
        /// The version found in the file.
        version: u32,
    },

    /// The file (or the buffer about to be written) exceeds the size ceiling.
    #[error("cache file is {size} bytes, exceeding the {max} byte limit")]
    TooLarge {
        /// Actual or projected size in bytes.
        size: u64,
        /// The ceiling.
        max: u64,
    },

    /// The buffer ends before a fixed-size structure does.
    #[error("cache file truncated: {len} bytes, need at least {needed}")]
    Truncated {
        /// Buffer length.
        len: usize,
        /// Bytes required to continue decoding.
        needed: usize,
    },

    /// The stored CRC does not match the CRC computed over the payload.
    #[error("checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        /// The CRC stored in the header.
        expected: u32,
        /// The CRC computed from the payload.
        actual: u32,
    },

    /// The string table offset points past the end of the file.
    #[error("string table offset {offset} lies beyond the end of the {len} byte file")]
    StringTableOutOfBounds {
        /// Offset from the header.
        offset: u64,
        /// File length.
        len: usize,
    },

    /// The declared mapping count disagrees with the space before the string table.
    #[error("header declares {declared} mappings but {available} are present")]
    RecordCountMismatch {
        /// `numMappings` from the header.
        declared: u32,
        /// Whole records that fit between the header and the string table.
        available: u64,
    },

    /// A mapping record points outside the string table.
    #[error("mapping {record} references string offset {offset}, outside the {table_len} byte string table")]
    OffsetOutOfBounds {
        /// Index of the offending record.
        record: usize,
        /// The offset stored in the record.
        offset: u32,
        /// Length of the string table.
        table_len: usize,
    },

    /// A string runs to the end of the file without a NUL terminator.
    #[error("mapping {record} references an unterminated string at offset {offset}")]
    UnterminatedString {
        /// Index of the offending record.
        record: usize,
        /// The offset stored in the record.
        offset: u32,
    },

    /// A referenced string is not valid UTF-8.
    #[error("mapping {record} references invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Index of the offending record.
        record: usize,
        /// The offset stored in the record.
        offset: u32,
    },

    /// A name contains a NUL byte and cannot be stored NUL-terminated.
    #[error("entry {guid} contains an interior NUL byte")]
    InteriorNul {
        /// GUID of the offending entry.
        guid: Guid,
    },

    /// The integrity primitive rejected its input.
    #[error("checksum error: {0}")]
    Checksum(#[from] CrcError),
}

impl CacheError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::UnsupportedVersion { .. } | Self::TooLarge { .. } | Self::Truncated { .. } => {
                ErrorKind::Format
            }
            Self::ChecksumMismatch { .. }
            | Self::StringTableOutOfBounds { .. }
            | Self::RecordCountMismatch { .. }
            | Self::OffsetOutOfBounds { .. }
            | Self::UnterminatedString { .. }
            | Self::InvalidUtf8 { .. } => ErrorKind::Corruption,
            Self::InteriorNul { .. } | Self::Checksum(_) => ErrorKind::Usage,
        }
    }
}
