//! Display-ready records returned by [`DriveService`](super::DriveService).
//!
//! Formatting is left to the caller; timestamps stay in UTC.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::Permission;
use crate::metadata::MetadataRecord;
use crate::namespace::EntityKind;

/// One row of a directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntityKind,
    /// Size in bytes, files only.
    pub size: Option<u64>,
    pub owner: String,
    pub modified_at: DateTime<Utc>,
}

/// A downloaded file: its metadata and content.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub metadata: MetadataRecord,
    pub content: String,
    /// Absolute path in the namespace.
    pub path: String,
}

/// One row of the recycle-bin listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecycleListing {
    pub name: String,
    pub size: u64,
    pub owner: String,
    pub deleted_by: String,
    pub deleted_at: DateTime<Utc>,
}

/// One row of the recent-files listing.
#[derive(Debug, Clone, Serialize)]
pub struct RecentListing {
    pub name: String,
    pub kind: EntityKind,
    pub path: String,
}

/// A file shared with the acting user.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingShare {
    pub owner: String,
    pub file_name: String,
    pub permission: Permission,
    pub shared_at: DateTime<Utc>,
}
