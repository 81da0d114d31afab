//! Asset GUIDs and the name hashing seam that produces them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 64-bit asset identifier.
///
/// Package files address every asset solely by this value; the name it was
/// hashed from is never stored at runtime. The cache exists to map a `Guid`
/// back to that name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(u64);

impl Guid {
    /// Creates a `Guid` from its raw 64-bit value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

impl From<u64> for Guid {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Error returned when a string cannot be parsed as a [`Guid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GUID '{input}': expected a decimal or 0x-prefixed hexadecimal u64")]
pub struct ParseGuidError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Guid {
    type Err = ParseGuidError;

    /// Parses either decimal (`1234`) or hexadecimal (`0x04D2`) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed.map(Guid).map_err(|_| ParseGuidError {
            input: s.to_string(),
        })
    }
}

/// Deterministic name to GUID hashing.
///
/// Every subsystem that registers or resolves names must share one
/// implementation, otherwise lookups land in different identifier spaces.
pub trait GuidHasher: Send + Sync {
    /// Hashes an asset name into its GUID.
    fn guid_of(&self, name: &str) -> Guid;
}

/// Default [`GuidHasher`] using XXH3-64 over the UTF-8 bytes of the name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3GuidHasher;

impl GuidHasher for Xxh3GuidHasher {
    fn guid_of(&self, name: &str) -> Guid {
        Guid(xxhash_rust::xxh3::xxh3_64(name.as_bytes()))
    }
}
