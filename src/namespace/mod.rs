//! Hierarchical namespace for CloudVault.
//!
//! This module provides the directory structure of a drive:
//! - An arena of entities addressed by generation-checked handles
//! - Per-directory binary search trees of children ordered by name
//! - A caller-owned navigation cursor
//! - Name validation shared by every component that accepts raw names

mod arena;
mod tree;

pub use arena::{Entity, EntityArena, EntityId, EntityKind};
pub use tree::{Cursor, DirEntry, NamespaceTree, PARENT_SELECTOR};

use crate::{DriveError, Result};

/// Maximum length for entry names (in characters).
pub const MAX_NAME_LENGTH: usize = 100;

/// Validate a directory or file name.
///
/// Requirements:
/// - Not empty or whitespace only
/// - At most `max_len` characters
/// - Not `.` or `..`
/// - No `/` and no control characters
pub fn validate_name(name: &str, max_len: usize) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DriveError::InvalidName("name cannot be empty".to_string()));
    }
    if name.chars().count() > max_len {
        return Err(DriveError::InvalidName(format!(
            "name must be at most {max_len} characters"
        )));
    }
    if name == "." || name == PARENT_SELECTOR {
        return Err(DriveError::InvalidName(format!("'{name}' is reserved")));
    }
    if name.chars().any(|c| c == '/' || c.is_control()) {
        return Err(DriveError::InvalidName(format!(
            "'{name}' contains invalid characters"
        )));
    }
    Ok(())
}

/// Extract the type tag of a file from its extension.
///
/// Returns `None` when there is no usable extension.
pub fn extract_type_tag(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
