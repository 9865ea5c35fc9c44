//! CloudVault - a personal cloud drive in memory.
//!
//! A hierarchical namespace of directories and files with per-file
//! metadata, a recycle bin, recent-access history, version chains and a
//! user directory with file sharing.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod drive;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod namespace;
pub mod recent;
pub mod recycle;
pub mod version;

pub use auth::{
    generate_password, hash_password, validate_password, verify_password, HashCost,
    PasswordError, Permission, Session, SessionState, ShareEdge, UserAccount, UserDirectory,
    ValidationError,
};
pub use config::Config;
pub use drive::{DriveService, FileView, IncomingShare, ListingEntry, RecentListing, RecycleListing};
pub use error::{DriveError, Result};
pub use metadata::{MetadataIndex, MetadataRecord};
pub use namespace::{Cursor, DirEntry, Entity, EntityId, EntityKind, NamespaceTree};
pub use recent::RecentHistory;
pub use recycle::{RecycleBin, RecycleEntry};
pub use version::{VersionChain, VersionRecord, VersionStore};
