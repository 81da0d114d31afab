//! Shared foundational types used across the guidmap tools.
//!
//! This crate provides the 64-bit asset [`Guid`], the [`GuidHasher`] seam that
//! turns asset names into GUIDs, and the CRC-32 primitive used to protect
//! cache files on disk.

#![warn(missing_docs)]

pub mod crc;
pub mod hash;

pub use crc::{crc32, crc32_bits, CrcError};
pub use hash::{Guid, GuidHasher, ParseGuidError, Xxh3GuidHasher};
