//! CRC-32 integrity checksums for cache files.
//!
//! Standard reflected CRC-32 (polynomial 0xEDB88320, the zlib/PNG/IEEE 802.3
//! variant), driven by a 16-entry half-byte lookup table. Results match the
//! CRC-32 produced by common external tools, so files written elsewhere can be
//! verified here and vice versa.

/// Reflected CRC-32 polynomial.
const CRC32_POLY: u32 = 0xEDB8_8320;

/// Initial register value. The final register is bitwise-complemented.
const CRC32_INIT: u32 = 0xFFFF_FFFF;

/// Precomputed CRC-32 lookup table for one nibble (16 entries).
const CRC32_NIBBLE_TABLE: [u32; 16] = {
    let mut table = [0u32; 16];
    let mut i = 0;
    while i < 16 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 4 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Misuse of the checksum entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrcError {
    /// The input was empty; a checksum of nothing is never meaningful here.
    #[error("checksum input is empty")]
    EmptyInput,

    /// More bits were requested than the buffer holds.
    #[error("checksum bit length {bits} exceeds the {available} bits available")]
    BitLengthOutOfRange {
        /// Requested bit count.
        bits: usize,
        /// Bits actually present in the buffer.
        available: usize,
    },
}

/// Computes the CRC-32 of a byte slice.
///
/// Each byte is consumed as two nibble rounds, low nibble first.
pub fn crc32(data: &[u8]) -> Result<u32, CrcError> {
    if data.is_empty() {
        return Err(CrcError::EmptyInput);
    }
    let mut crc = CRC32_INIT;
    for &byte in data {
        crc = (crc >> 4) ^ CRC32_NIBBLE_TABLE[((crc ^ byte as u32) & 0x0F) as usize];
        crc = (crc >> 4) ^ CRC32_NIBBLE_TABLE[((crc ^ (byte as u32 >> 4)) & 0x0F) as usize];
    }
    Ok(!crc)
}

/// Computes the CRC-32 of the first `bit_len` bits of `data`.
///
/// Bits are taken least-significant first within each byte, one bit per
/// iteration, so a whole number of bytes yields the same value as [`crc32`].
/// Used for payloads that do not end on a byte boundary.
pub fn crc32_bits(data: &[u8], bit_len: usize) -> Result<u32, CrcError> {
    if data.is_empty() || bit_len == 0 {
        return Err(CrcError::EmptyInput);
    }
    let available = data.len() * 8;
    if bit_len > available {
        return Err(CrcError::BitLengthOutOfRange {
            bits: bit_len,
            available,
        });
    }
    let mut crc = CRC32_INIT;
    for bit_index in 0..bit_len {
        let bit = (data[bit_index / 8] >> (bit_index % 8)) & 1;
        crc ^= bit as u32;
        if crc & 1 != 0 {
            crc = (crc >> 1) ^ CRC32_POLY;
        } else {
            crc >>= 1;
        }
    }
    Ok(!crc)
}
