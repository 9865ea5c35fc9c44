//! Metadata index for CloudVault.
//!
//! A flat map from file name to its descriptive record, independent of
//! directory nesting. File names are unique across the whole drive, so the
//! leaf name is a sufficient key.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::namespace::EntityId;

/// Descriptive record of a live file.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRecord {
    /// File name.
    pub name: String,
    /// Declared type tag (usually the extension).
    pub type_tag: String,
    /// Content size in bytes.
    pub size: u64,
    /// Owner user id.
    pub owner: String,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the content or name last changed.
    pub modified_at: DateTime<Utc>,
    /// Entity in the namespace tree.
    #[serde(skip)]
    pub entity: EntityId,
}

impl MetadataRecord {
    /// Create a record for a freshly created file.
    pub fn new(
        name: impl Into<String>,
        type_tag: impl Into<String>,
        size: u64,
        owner: impl Into<String>,
        entity: EntityId,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            size,
            owner: owner.into(),
            created_at: now,
            modified_at: now,
            entity,
        }
    }

    /// Record a content change.
    pub fn touch(&mut self, size: u64) {
        self.size = size;
        self.modified_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }
}

/// Secondary index from file name to metadata.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    records: HashMap<String, MetadataRecord>,
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record stored under `name`.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, name: impl Into<String>, record: MetadataRecord) -> Option<MetadataRecord> {
        self.records.insert(name.into(), record)
    }

    pub fn search(&self, name: &str) -> Option<&MetadataRecord> {
        self.records.get(name)
    }

    pub fn search_mut(&mut self, name: &str) -> Option<&mut MetadataRecord> {
        self.records.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MetadataRecord> {
        self.records.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Move a record to a new key, updating its name.
    ///
    /// Returns `false` if `old` is absent or `new` is taken.
    pub fn rekey(&mut self, old: &str, new: &str) -> bool {
        if self.records.contains_key(new) {
            return false;
        }
        let Some(mut record) = self.records.remove(old) else {
            return false;
        };
        record.name = new.to_string();
        record.modified_at = Utc::now();
        self.records.insert(new.to_string(), record);
        true
    }

    /// Records owned by a user, sorted by name.
    pub fn owned_by(&self, user_id: &str) -> Vec<&MetadataRecord> {
        let mut records: Vec<_> = self
            .records
            .values()
            .filter(|r| r.is_owned_by(user_id))
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
