//! Persistent reverse-lookup cache from asset GUIDs to their original names.
//!
//! Package files only carry 64-bit GUIDs. This crate keeps a thread-safe
//! in-memory index from GUID to the name it was hashed from (and, for
//! dependencies, the container file that holds it), and persists that index
//! in a compact binary file protected by a CRC-32.
//!
//! Files written by the older version 1 layout are upgraded in memory on
//! load; saving always produces the current layout.

#![warn(missing_docs)]

pub mod codec;
pub mod entry;
pub mod error;
pub mod file;
pub mod layout;
pub mod store;

pub use codec::{decode, encode, DecodedCache};
pub use entry::CacheEntry;
pub use error::{CacheError, ErrorKind};
pub use layout::{HeaderInfo, Reserved, MAX_CACHE_FILE_SIZE};
pub use store::CacheStore;
