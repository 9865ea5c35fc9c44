//! Drive facade for CloudVault.
//!
//! This module ties the namespace tree, metadata index, recycle bin, recent
//! history, version chains and user directory together:
//! - Multi-structure operations validated up front, then applied as a whole
//! - Ownership checks on edit, delete and share
//! - Display-ready listings for the presentation layer

mod listing;
mod service;

pub use listing::{FileView, IncomingShare, ListingEntry, RecentListing, RecycleListing};
pub use service::DriveService;
