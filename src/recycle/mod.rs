//! Recycle bin for CloudVault.
//!
//! Soft-deleted files are kept in LIFO order together with everything needed
//! to put them back: their entity, their last metadata record and their
//! version chain.

use chrono::{DateTime, Utc};

use crate::metadata::MetadataRecord;
use crate::namespace::Entity;
use crate::version::VersionChain;

/// A file removed from the namespace.
#[derive(Debug, Clone)]
pub struct RecycleEntry {
    entity: Entity,
    record: MetadataRecord,
    versions: VersionChain,
    deleted_by: String,
    deleted_at: DateTime<Utc>,
}

impl RecycleEntry {
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Metadata as it was at deletion time.
    pub fn record(&self) -> &MetadataRecord {
        &self.record
    }

    pub fn versions(&self) -> &VersionChain {
        &self.versions
    }

    /// User id that deleted the file.
    pub fn deleted_by(&self) -> &str {
        &self.deleted_by
    }

    pub fn deleted_at(&self) -> DateTime<Utc> {
        self.deleted_at
    }

    /// Split into entity, metadata and version chain.
    pub fn into_parts(self) -> (Entity, MetadataRecord, VersionChain) {
        (self.entity, self.record, self.versions)
    }
}

/// LIFO store of soft-deleted files.
#[derive(Debug, Default)]
pub struct RecycleBin {
    /// Oldest first; the last element is the most recent deletion.
    entries: Vec<RecycleEntry>,
}

impl RecycleBin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a soft-deleted file stamped with the current time.
    pub fn push(
        &mut self,
        entity: Entity,
        record: MetadataRecord,
        versions: VersionChain,
        deleted_by: impl Into<String>,
    ) {
        self.entries.push(RecycleEntry {
            entity,
            record,
            versions,
            deleted_by: deleted_by.into(),
            deleted_at: Utc::now(),
        });
    }

    /// Remove and return the most recently deleted entry.
    pub fn pop(&mut self) -> Option<RecycleEntry> {
        self.entries.pop()
    }

    /// Most recently deleted entry, left in place.
    pub fn peek(&self) -> Option<&RecycleEntry> {
        self.entries.last()
    }

    /// Entries from newest to oldest.
    pub fn peek_all(&self) -> impl Iterator<Item = &RecycleEntry> {
        self.entries.iter().rev()
    }

    /// Destroy every entry and return how many were purged.
    pub fn purge_all(&mut self) -> usize {
        let purged = self.entries.len();
        self.entries.clear();
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
