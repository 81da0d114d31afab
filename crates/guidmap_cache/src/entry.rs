//! The record stored for each GUID.

use guidmap_common::Guid;
use serde::{Deserialize, Serialize};

/// A single GUID to name association.
///
/// `file_name` names the container file holding a referenced dependency and
/// is empty when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheEntry {
    /// GUID hashed from `original_string`.
    pub guid: Guid,

    /// The human-readable name the GUID was derived from.
    pub original_string: String,

    /// Container file of a dependency, or empty.
    #[serde(default)]
    pub file_name: String,
}

impl CacheEntry {
    /// Creates an entry with no container file.
    pub fn new(guid: Guid, original_string: impl Into<String>) -> Self {
        Self {
            guid,
            original_string: original_string.into(),
            file_name: String::new(),
        }
    }

    /// Sets the container file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Returns the container file name, or `None` if it is empty.
    pub fn file_name(&self) -> Option<&str> {
        if self.file_name.is_empty() {
            None
        } else {
            Some(&self.file_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_file_name() {
        let e = CacheEntry::new(Guid::from_raw(1), "models/bar.rmdl");
        assert_eq!(e.original_string, "models/bar.rmdl");
        assert!(e.file_name().is_none());
    }

    #[test]
    fn with_file_name_sets_it() {
        let e = CacheEntry::new(Guid::from_raw(1), "materials/foo").with_file_name("common.rpak");
        assert_eq!(e.file_name(), Some("common.rpak"));
    }
}
