//! On-disk layout of cache files.
//!
//! All integers are little-endian and there is no padding. The current
//! (version 2) file is:
//!
//! ```text
//! offset  size  field
//!      0     4  version              = 2
//!      4     4  crc                  CRC-32 of bytes [8, EOF)
//!      8     4  num_mappings
//!     12     4  reserved_a
//!     16     8  reserved_b           two u32 words
//!     24     8  string_table_offset  = 32 + num_mappings * 16
//!     32  16*n  mapping records      { guid u64, str_offset u32, file_name_offset u32 }
//!      …     …  string table         NUL-terminated UTF-8 strings
//! ```
//!
//! The legacy (version 1) header is `{ version u32, num_mappings u32,
//! string_table_offset u64 }` with identical records and string table.
//!
//! Headers are never aliased as structs: each version has an explicit decoder
//! that reads fields by offset into the version-independent [`HeaderInfo`].

use guidmap_common::crc32;

use crate::error::CacheError;

/// Version tag of the current layout.
pub const CURRENT_VERSION: u32 = 2;

/// Version tag of the legacy layout without a checksum.
pub const LEGACY_VERSION: u32 = 1;

/// Size of the current header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Size of the legacy header in bytes.
pub const LEGACY_HEADER_SIZE: usize = 16;

/// Size of one mapping record in bytes.
pub const MAPPING_SIZE: usize = 16;

/// First byte covered by the CRC (immediately after the CRC field).
pub const CRC_START: usize = 8;

/// String offset meaning "no file name".
pub const NO_FILE_NAME: u32 = u32::MAX;

/// Upper bound on the size of a cache file, read or written.
pub const MAX_CACHE_FILE_SIZE: u64 = 32 * 1024 * 1024;

/// Reserved header words. Carried through load and save unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reserved {
    /// The `u32` at offset 12.
    pub a: u32,
    /// The two `u32` words at offset 16.
    pub b: [u32; 2],
}

/// A decoded header, independent of the version it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Version tag found in the file.
    pub version: u32,
    /// Stored CRC; `None` for legacy files.
    pub crc: Option<u32>,
    /// Declared number of mapping records.
    pub num_mappings: u32,
    /// Reserved words; zero for legacy files.
    pub reserved: Reserved,
    /// Offset of the string table from the start of the file.
    pub string_table_offset: u64,
}

impl HeaderInfo {
    /// Size of the header for this version.
    pub fn header_size(&self) -> usize {
        if self.version == LEGACY_VERSION {
            LEGACY_HEADER_SIZE
        } else {
            HEADER_SIZE
        }
    }

    /// Appends the version 2 encoding of this header. The CRC field is
    /// written as stored, or zero if absent.
    pub fn write_current(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
        out.extend_from_slice(&self.crc.unwrap_or(0).to_le_bytes());
        out.extend_from_slice(&self.num_mappings.to_le_bytes());
        out.extend_from_slice(&self.reserved.a.to_le_bytes());
        out.extend_from_slice(&self.reserved.b[0].to_le_bytes());
        out.extend_from_slice(&self.reserved.b[1].to_le_bytes());
        out.extend_from_slice(&self.string_table_offset.to_le_bytes());
    }
}

/// A single mapping record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingRecord {
    /// Raw GUID.
    pub guid: u64,
    /// Offset of the original string within the string table.
    pub str_offset: u32,
    /// Offset of the file name within the string table, or [`NO_FILE_NAME`].
    pub file_name_offset: u32,
}

impl MappingRecord {
    /// Decodes the record starting at `at`.
    pub fn read(bytes: &[u8], at: usize) -> Result<Self, CacheError> {
        Ok(Self {
            guid: read_u64(bytes, at)?,
            str_offset: read_u32(bytes, at + 8)?,
            file_name_offset: read_u32(bytes, at + 12)?,
        })
    }

    /// Appends the encoded record.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.guid.to_le_bytes());
        out.extend_from_slice(&self.str_offset.to_le_bytes());
        out.extend_from_slice(&self.file_name_offset.to_le_bytes());
    }
}

pub(crate) fn read_u32(bytes: &[u8], at: usize) -> Result<u32, CacheError> {
    let field = bytes
        .get(at..at + 4)
        .and_then(|s| <[u8; 4]>::try_from(s).ok())
        .ok_or(CacheError::Truncated {
            len: bytes.len(),
            needed: at + 4,
        })?;
    Ok(u32::from_le_bytes(field))
}

pub(crate) fn read_u64(bytes: &[u8], at: usize) -> Result<u64, CacheError> {
    let field = bytes
        .get(at..at + 8)
        .and_then(|s| <[u8; 8]>::try_from(s).ok())
        .ok_or(CacheError::Truncated {
            len: bytes.len(),
            needed: at + 8,
        })?;
    Ok(u64::from_le_bytes(field))
}

/// Decodes a version 2 header.
fn decode_current_header(bytes: &[u8]) -> Result<HeaderInfo, CacheError> {
    if bytes.len() < HEADER_SIZE {
        return Err(CacheError::Truncated {
            len: bytes.len(),
            needed: HEADER_SIZE,
        });
    }
    Ok(HeaderInfo {
        version: read_u32(bytes, 0)?,
        crc: Some(read_u32(bytes, 4)?),
        num_mappings: read_u32(bytes, 8)?,
        reserved: Reserved {
            a: read_u32(bytes, 12)?,
            b: [read_u32(bytes, 16)?, read_u32(bytes, 20)?],
        },
        string_table_offset: read_u64(bytes, 24)?,
    })
}

/// Decodes a version 1 header.
fn decode_legacy_header(bytes: &[u8]) -> Result<HeaderInfo, CacheError> {
    if bytes.len() < LEGACY_HEADER_SIZE {
        return Err(CacheError::Truncated {
            len: bytes.len(),
            needed: LEGACY_HEADER_SIZE,
        });
    }
    Ok(HeaderInfo {
        version: read_u32(bytes, 0)?,
        crc: None,
        num_mappings: read_u32(bytes, 4)?,
        reserved: Reserved::default(),
        string_table_offset: read_u64(bytes, 8)?,
    })
}

/// Reads the header of a cache file of either supported version.
pub fn read_header(bytes: &[u8]) -> Result<HeaderInfo, CacheError> {
    match read_u32(bytes, 0)? {
        LEGACY_VERSION => decode_legacy_header(bytes),
        CURRENT_VERSION => decode_current_header(bytes),
        version => Err(CacheError::UnsupportedVersion { version }),
    }
}

/// Computes the CRC over the region of a version 2 image that it protects.
pub fn payload_crc(image: &[u8]) -> Result<u32, CacheError> {
    let payload = image.get(CRC_START..).ok_or(CacheError::Truncated {
        len: image.len(),
        needed: CRC_START,
    })?;
    Ok(crc32(payload)?)
}

/// Writes `crc` into the CRC field of a version 2 image.
pub(crate) fn store_crc(image: &mut [u8], crc: u32) {
    image[4..CRC_START].copy_from_slice(&crc.to_le_bytes());
}

/// Synthesizes a version 2 image from a version 1 file.
///
/// The string table offset moves by the header size delta, records and the
/// string table are copied unchanged behind the new header, and a fresh CRC
/// is computed. The legacy input itself is never checksum-validated; it had
/// no checksum to validate.
pub fn upgrade_legacy(bytes: &[u8]) -> Result<Vec<u8>, CacheError> {
    let legacy = decode_legacy_header(bytes)?;
    if legacy.version != LEGACY_VERSION {
        return Err(CacheError::UnsupportedVersion {
            version: legacy.version,
        });
    }

    let delta = (HEADER_SIZE - LEGACY_HEADER_SIZE) as u64;
    let string_table_offset =
        legacy
            .string_table_offset
            .checked_add(delta)
            .ok_or(CacheError::StringTableOutOfBounds {
                offset: legacy.string_table_offset,
                len: bytes.len(),
            })?;

    let body = &bytes[LEGACY_HEADER_SIZE..];
    let mut image = Vec::with_capacity(HEADER_SIZE + body.len());
    HeaderInfo {
        version: CURRENT_VERSION,
        crc: None,
        num_mappings: legacy.num_mappings,
        reserved: Reserved::default(),
        string_table_offset,
    }
    .write_current(&mut image);
    image.extend_from_slice(body);

    let crc = payload_crc(&image)?;
    store_crc(&mut image, crc);
    Ok(image)
}
