//! Encoding and decoding of whole cache images.
//!
//! [`encode`] lays out header, mapping records, and string table and seals the
//! image with a CRC. [`decode`] accepts either layout version, validates the
//! checksum and every offset, and only then hands back the entries.

use std::collections::HashMap;

use guidmap_common::Guid;
use tracing::debug;

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::layout::{
    self, HeaderInfo, MappingRecord, Reserved, CURRENT_VERSION, HEADER_SIZE, LEGACY_VERSION,
    MAPPING_SIZE, MAX_CACHE_FILE_SIZE, NO_FILE_NAME,
};

/// Result of decoding a cache image.
#[derive(Debug, Clone)]
pub struct DecodedCache {
    /// Version of the image as it was read, before any upgrade.
    pub source_version: u32,
    /// Reserved header words.
    pub reserved: Reserved,
    /// Decoded entries in record order.
    pub entries: Vec<CacheEntry>,
}

impl DecodedCache {
    /// Returns `true` if the image was upgraded from the legacy layout.
    pub fn was_migrated(&self) -> bool {
        self.source_version == LEGACY_VERSION
    }
}

/// Append-only string table that reuses the offset of repeated strings.
#[derive(Default)]
struct StringTableBuilder {
    bytes: Vec<u8>,
    offsets: HashMap<String, usize>,
}

impl StringTableBuilder {
    fn intern(&mut self, s: &str) -> usize {
        if let Some(&offset) = self.offsets.get(s) {
            return offset;
        }
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(s.as_bytes());
        self.bytes.push(0);
        self.offsets.insert(s.to_string(), offset);
        offset
    }
}

/// Bounds-checked view over the string table of a decoded image.
struct StringTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StringTable<'a> {
    /// Resolves `offset` to the NUL-terminated string that starts there.
    fn get(&self, record: usize, offset: u32) -> Result<&'a str, CacheError> {
        let start = offset as usize;
        let tail = self
            .bytes
            .get(start..)
            .filter(|tail| !tail.is_empty())
            .ok_or(CacheError::OffsetOutOfBounds {
                record,
                offset,
                table_len: self.bytes.len(),
            })?;
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(CacheError::UnterminatedString { record, offset })?;
        std::str::from_utf8(&tail[..end]).map_err(|_| CacheError::InvalidUtf8 { record, offset })
    }
}

/// Serializes `entries` into a version 2 image.
///
/// Records are written in the order given. Fails if any string contains a NUL
/// byte or the image would exceed [`MAX_CACHE_FILE_SIZE`].
pub fn encode(entries: &[CacheEntry], reserved: Reserved) -> Result<Vec<u8>, CacheError> {
    let mut table = StringTableBuilder::default();
    let mut offsets = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.original_string.contains('\0') || entry.file_name.contains('\0') {
            return Err(CacheError::InteriorNul { guid: entry.guid });
        }
        let str_offset = table.intern(&entry.original_string);
        let file_name_offset = entry.file_name().map(|name| table.intern(name));
        offsets.push((str_offset, file_name_offset));
    }

    let string_table_offset = HEADER_SIZE + entries.len() * MAPPING_SIZE;
    let total = string_table_offset + table.bytes.len();
    if total as u64 > MAX_CACHE_FILE_SIZE {
        return Err(CacheError::TooLarge {
            size: total as u64,
            max: MAX_CACHE_FILE_SIZE,
        });
    }

    // Under the ceiling every count and offset fits in a u32.
    let mut image = Vec::with_capacity(total);
    HeaderInfo {
        version: CURRENT_VERSION,
        crc: None,
        num_mappings: entries.len() as u32,
        reserved,
        string_table_offset: string_table_offset as u64,
    }
    .write_current(&mut image);
    for (entry, (str_offset, file_name_offset)) in entries.iter().zip(&offsets) {
        MappingRecord {
            guid: entry.guid.as_raw(),
            str_offset: *str_offset as u32,
            file_name_offset: file_name_offset.map_or(NO_FILE_NAME, |o| o as u32),
        }
        .write(&mut image);
    }
    image.extend_from_slice(&table.bytes);

    let crc = layout::payload_crc(&image)?;
    layout::store_crc(&mut image, crc);

    debug!(
        entries = entries.len(),
        strings = table.offsets.len(),
        bytes = image.len(),
        crc,
        "encoded cache image"
    );
    Ok(image)
}

/// Decodes a cache image of either supported version.
///
/// Legacy images are upgraded in memory first and are not checksum-validated.
/// Current images must carry a matching CRC. Every record is validated before
/// anything is returned.
pub fn decode(bytes: &[u8]) -> Result<DecodedCache, CacheError> {
    if bytes.len() as u64 > MAX_CACHE_FILE_SIZE {
        return Err(CacheError::TooLarge {
            size: bytes.len() as u64,
            max: MAX_CACHE_FILE_SIZE,
        });
    }

    let header = layout::read_header(bytes)?;
    match header.version {
        LEGACY_VERSION => {
            debug!(
                mappings = header.num_mappings,
                "upgrading legacy cache image"
            );
            let upgraded = layout::upgrade_legacy(bytes)?;
            decode_current(&upgraded, LEGACY_VERSION, false)
        }
        _ => decode_current(bytes, CURRENT_VERSION, true),
    }
}

fn decode_current(
    image: &[u8],
    source_version: u32,
    verify_crc: bool,
) -> Result<DecodedCache, CacheError> {
    let header = layout::read_header(image)?;

    if verify_crc {
        let expected = header.crc.unwrap_or(0);
        let actual = layout::payload_crc(image)?;
        if expected != actual {
            return Err(CacheError::ChecksumMismatch { expected, actual });
        }
    }

    let table_start = header.string_table_offset;
    if table_start > image.len() as u64 {
        return Err(CacheError::StringTableOutOfBounds {
            offset: table_start,
            len: image.len(),
        });
    }
    let expected_start = HEADER_SIZE as u64 + u64::from(header.num_mappings) * MAPPING_SIZE as u64;
    if table_start != expected_start {
        return Err(CacheError::RecordCountMismatch {
            declared: header.num_mappings,
            available: table_start.saturating_sub(HEADER_SIZE as u64) / MAPPING_SIZE as u64,
        });
    }

    let table = StringTable {
        bytes: &image[table_start as usize..],
    };
    let count = header.num_mappings as usize;
    let mut entries = Vec::with_capacity(count);
    for record in 0..count {
        let mapping = MappingRecord::read(image, HEADER_SIZE + record * MAPPING_SIZE)?;
        let original_string = table.get(record, mapping.str_offset)?;
        let file_name = if mapping.file_name_offset == NO_FILE_NAME {
            ""
        } else {
            table.get(record, mapping.file_name_offset)?
        };
        entries.push(
            CacheEntry::new(Guid::from_raw(mapping.guid), original_string)
                .with_file_name(file_name),
        );
    }

    Ok(DecodedCache {
        source_version,
        reserved: header.reserved,
        entries,
    })
}
