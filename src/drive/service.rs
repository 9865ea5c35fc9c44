//! Drive service for CloudVault.
//!
//! This module provides the high-level drive operations:
//! - Directory navigation and listing
//! - File create/read/edit/rename/delete with ownership checks
//! - Recycle bin restore and purge
//! - Version history, recent files and sharing
//!
//! Every operation that touches more than one structure checks all of its
//! preconditions before the first mutation, so a refused operation leaves
//! the drive exactly as it was.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::auth::{Permission, Session, ShareEdge, UserDirectory};
use crate::config::{Config, DisplayConfig};
use crate::datetime::format_for_display;
use crate::metadata::{MetadataIndex, MetadataRecord};
use crate::namespace::{extract_type_tag, Cursor, EntityId, NamespaceTree};
use crate::recent::RecentHistory;
use crate::recycle::RecycleBin;
use crate::version::{VersionChain, VersionRecord, VersionStore};
use crate::{DriveError, Result};

use super::listing::{FileView, IncomingShare, ListingEntry, RecentListing, RecycleListing};

/// One personal drive: namespace, indexes and users.
#[derive(Debug)]
pub struct DriveService {
    tree: NamespaceTree,
    index: MetadataIndex,
    bin: RecycleBin,
    recent: RecentHistory,
    versions: VersionStore,
    users: UserDirectory,
    admin_id: String,
    default_type_tag: String,
    display: DisplayConfig,
}

impl DriveService {
    /// Create an empty drive with the configured administrator account.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut users = UserDirectory::with_cost(config.auth.hash_cost());
        let admin = &config.admin;
        users.add_user(
            &admin.user_id,
            &admin.password,
            &admin.security_question,
            &admin.security_answer,
        )?;

        let drive = &config.drive;
        info!(
            root = %drive.root_name,
            admin = %admin.user_id,
            recent_capacity = drive.recent_capacity,
            "Drive initialized"
        );

        Ok(Self {
            tree: NamespaceTree::with_max_name_length(&drive.root_name, drive.max_name_length),
            index: MetadataIndex::new(),
            bin: RecycleBin::new(),
            recent: RecentHistory::with_capacity(drive.recent_capacity),
            versions: VersionStore::new(),
            users,
            admin_id: admin.user_id.clone(),
            default_type_tag: drive.default_type_tag.clone(),
            display: config.display.clone(),
        })
    }

    /// A new logged-out session positioned at the root.
    pub fn session(&self) -> Session {
        Session::new(self.tree.cursor())
    }

    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    pub fn metadata(&self) -> &MetadataIndex {
        &self.index
    }

    pub fn recycle_bin(&self) -> &RecycleBin {
        &self.bin
    }

    pub fn recent(&self) -> &RecentHistory {
        &self.recent
    }

    pub fn versions(&self) -> &VersionStore {
        &self.versions
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    /// Format a timestamp with the configured timezone and format.
    pub fn format_time(&self, dt: &DateTime<Utc>) -> String {
        format_for_display(dt, &self.display)
    }

    // ------------------------------------------------------------------
    // Sessions and accounts
    // ------------------------------------------------------------------

    /// Log a session in.
    pub fn login(&mut self, session: &mut Session, user_id: &str, password: &str) -> Result<()> {
        session.login(&mut self.users, user_id, password)
    }

    /// Log a session out, stamping last-logout.
    pub fn logout(&mut self, session: &mut Session) -> Result<String> {
        session.logout(&mut self.users)
    }

    /// Register a new account. Only the administrator may do this.
    pub fn add_user(
        &mut self,
        actor: &str,
        user_id: &str,
        password: &str,
        question: &str,
        answer: &str,
    ) -> Result<()> {
        self.require_account(actor)?;
        if actor != self.admin_id {
            warn!(actor, user = user_id, "Non-admin attempted to add a user");
            return Err(DriveError::PermissionDenied(
                "only the administrator can add users".to_string(),
            ));
        }
        self.users.add_user(user_id, password, question, answer)?;
        Ok(())
    }

    /// Security question for password recovery.
    pub fn security_question(&self, user_id: &str) -> Result<&str> {
        self.users.security_question(user_id)
    }

    /// Recover access with the security answer; returns a temporary password.
    pub fn recover_password(&mut self, user_id: &str, answer: &str) -> Result<String> {
        self.users.recover_password(user_id, answer)
    }

    fn require_account(&self, actor: &str) -> Result<()> {
        if self.users.contains(actor) {
            Ok(())
        } else {
            Err(DriveError::UserNotFound(actor.to_string()))
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move the cursor to a child directory, or `..` for the parent.
    pub fn change_directory(&self, cursor: &mut Cursor, name: &str) -> Result<()> {
        self.tree.change_directory(cursor, name)
    }

    /// Absolute path of the cursor's directory.
    pub fn current_path(&self, cursor: &Cursor) -> String {
        self.tree.path_of(cursor.directory())
    }

    /// Immediate children of the cursor's directory in name order.
    pub fn list_contents(&self, cursor: &Cursor) -> Result<Vec<ListingEntry>> {
        let entries = self.tree.list_contents(cursor)?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let entity = self.tree.get(entry.id)?;
                let size = entity.is_file().then(|| {
                    self.index
                        .search(&entry.name)
                        .map_or(entity.size(), |r| r.size)
                });
                Some(ListingEntry {
                    name: entry.name,
                    kind: entry.kind,
                    size,
                    owner: entity.owner().to_string(),
                    modified_at: entity.modified_at(),
                })
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Directories and files
    // ------------------------------------------------------------------

    /// Create a subdirectory under the cursor.
    pub fn make_directory(&mut self, actor: &str, cursor: &Cursor, name: &str) -> Result<EntityId> {
        self.require_account(actor)?;
        let id = self.tree.make_directory(cursor, name, actor)?;
        self.recent.record_access(id);
        info!(user = actor, path = %self.tree.path_of(id), "Directory created");
        Ok(id)
    }

    /// Create a file under the cursor.
    ///
    /// File names are unique across the whole drive, not only among siblings.
    pub fn create_file(
        &mut self,
        actor: &str,
        cursor: &Cursor,
        name: &str,
        content: &str,
    ) -> Result<EntityId> {
        self.require_account(actor)?;
        self.tree.check_insertable(cursor, name)?;
        if self.index.contains(name) {
            warn!(user = actor, file = name, "File name already used elsewhere in the drive");
            return Err(DriveError::NameConflict(name.to_string()));
        }

        let id = self.tree.create_file(cursor, name, content, actor)?;
        let type_tag = extract_type_tag(name).unwrap_or_else(|| self.default_type_tag.clone());
        let record = MetadataRecord::new(name, type_tag, content.len() as u64, actor, id);
        self.index.insert(name, record);
        self.versions.attach(id, VersionChain::with_initial(content));
        self.recent.record_access(id);

        info!(
            user = actor,
            path = %self.tree.path_of(id),
            size = content.len(),
            "File created"
        );
        Ok(id)
    }

    /// Metadata of a file in the cursor's directory.
    pub fn find_file(&self, cursor: &Cursor, name: &str) -> Option<&MetadataRecord> {
        let id = self.tree.find_file(cursor, name)?;
        self.index.search(name).filter(|r| r.entity == id)
    }

    /// Download a file by name from anywhere in the drive.
    pub fn read_file(&mut self, actor: &str, name: &str) -> Result<FileView> {
        self.require_account(actor)?;
        let record = self
            .index
            .search(name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        let entity = self
            .tree
            .get(record.entity)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;

        let view = FileView {
            metadata: record.clone(),
            content: entity.content().to_string(),
            path: self.tree.path_of(record.entity),
        };
        self.recent.record_access(record.entity);
        debug!(user = actor, path = %view.path, "File read");
        Ok(view)
    }

    /// Replace a file's content. Only the owner may edit.
    ///
    /// Returns the number of the version recorded for the new content.
    pub fn edit_file(&mut self, actor: &str, name: &str, content: &str) -> Result<u32> {
        self.require_account(actor)?;
        let record = self
            .index
            .search(name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        if !record.is_owned_by(actor) {
            warn!(user = actor, owner = %record.owner, file = name, "Edit refused: not the owner");
            return Err(DriveError::PermissionDenied(format!(
                "you don't have permission to edit '{name}'"
            )));
        }
        let id = record.entity;

        self.tree.set_content(id, content)?;
        if let Some(record) = self.index.search_mut(name) {
            record.touch(content.len() as u64);
        }
        let version = self.versions.chain_mut(id).add_version(content);
        self.recent.record_access(id);

        info!(user = actor, file = name, version, "File updated");
        Ok(version)
    }

    /// Rename a file or directory in the cursor's directory.
    ///
    /// Renaming a file requires ownership and keeps the drive-wide name
    /// uniqueness.
    pub fn rename_entry(&mut self, actor: &str, cursor: &Cursor, old: &str, new: &str) -> Result<()> {
        self.require_account(actor)?;
        let id = self
            .tree
            .find_entry(cursor, old)
            .ok_or_else(|| DriveError::NotFound(format!("entry '{old}'")))?;
        let is_file = self.tree.get(id).is_some_and(|e| e.is_file());

        if is_file {
            let record = self
                .index
                .search(old)
                .filter(|r| r.entity == id)
                .ok_or_else(|| DriveError::NotFound(format!("metadata for '{old}'")))?;
            if !record.is_owned_by(actor) {
                warn!(user = actor, file = old, "Rename refused: not the owner");
                return Err(DriveError::PermissionDenied(format!(
                    "you don't have permission to rename '{old}'"
                )));
            }
            if old != new && self.index.contains(new) {
                return Err(DriveError::NameConflict(new.to_string()));
            }
        }

        self.tree.rename_entry(cursor, old, new)?;
        if is_file && old != new && self.index.rekey(old, new) {
            let type_tag = extract_type_tag(new).unwrap_or_else(|| self.default_type_tag.clone());
            if let Some(record) = self.index.search_mut(new) {
                record.type_tag = type_tag;
            }
        }
        self.recent.record_access(id);

        info!(user = actor, from = old, to = new, "Entry renamed");
        Ok(())
    }

    /// Soft-delete a file in the cursor's directory. Only the owner may delete.
    ///
    /// The file leaves the tree and the metadata index and moves, with its
    /// version chain, into the recycle bin.
    pub fn remove_file(&mut self, actor: &str, cursor: &Cursor, name: &str) -> Result<()> {
        self.require_account(actor)?;
        let id = self
            .tree
            .find_file(cursor, name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        let record = self
            .index
            .search(name)
            .filter(|r| r.entity == id)
            .ok_or_else(|| DriveError::NotFound(format!("metadata for '{name}'")))?;
        if !record.is_owned_by(actor) {
            warn!(user = actor, owner = %record.owner, file = name, "Delete refused: not the owner");
            return Err(DriveError::PermissionDenied(format!(
                "you don't have permission to delete '{name}'"
            )));
        }
        let record = record.clone();
        let path = self.tree.path_of(id);

        let (id, entity) = self.tree.remove_file(cursor, name)?;
        self.index.remove(name);
        let versions = self.versions.detach(id);
        self.bin.push(entity, record, versions, actor);
        self.recent.record_access(id);

        info!(user = actor, path = %path, "File moved to recycle bin");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Recycle bin
    // ------------------------------------------------------------------

    /// Recycle-bin entries, most recently deleted first.
    pub fn recycle_bin_contents(&self) -> Vec<RecycleListing> {
        self.bin
            .peek_all()
            .map(|entry| RecycleListing {
                name: entry.name().to_string(),
                size: entry.record().size,
                owner: entry.record().owner.clone(),
                deleted_by: entry.deleted_by().to_string(),
                deleted_at: entry.deleted_at(),
            })
            .collect()
    }

    /// Restore the most recently deleted file into the cursor's directory.
    ///
    /// The file keeps its content, owner and version history and gets a
    /// fresh creation timestamp. On a name conflict the entry stays in the
    /// bin.
    pub fn restore(&mut self, actor: &str, cursor: &Cursor) -> Result<EntityId> {
        self.require_account(actor)?;
        let entry = self
            .bin
            .peek()
            .ok_or(DriveError::EmptyCollection("recycle bin"))?;
        let name = entry.name().to_string();
        if self.index.contains(&name) {
            warn!(user = actor, file = %name, "Restore refused: name in use");
            return Err(DriveError::NameConflict(name));
        }

        let id = self.tree.reattach(cursor, entry.entity().clone())?;
        let Some(entry) = self.bin.pop() else {
            return Err(DriveError::EmptyCollection("recycle bin"));
        };
        let (_, mut record, versions) = entry.into_parts();

        if let Some(entity) = self.tree.get(id) {
            record.created_at = entity.created_at();
            record.modified_at = entity.modified_at();
        }
        record.entity = id;
        self.index.insert(name.as_str(), record);
        self.versions.attach(id, versions);
        self.recent.record_access(id);

        info!(user = actor, path = %self.tree.path_of(id), "File restored");
        Ok(id)
    }

    /// Irrecoverably destroy everything in the recycle bin.
    pub fn purge_recycle_bin(&mut self, actor: &str) -> Result<usize> {
        self.require_account(actor)?;
        let purged = self.bin.purge_all();
        info!(user = actor, purged, "Recycle bin emptied");
        Ok(purged)
    }

    // ------------------------------------------------------------------
    // Recent files and versions
    // ------------------------------------------------------------------

    /// Recently accessed entries still in the drive, oldest first.
    pub fn recent_files(&self) -> Vec<RecentListing> {
        self.recent
            .list_recent(&self.tree)
            .into_iter()
            .filter_map(|id| {
                let entity = self.tree.get(id)?;
                Some(RecentListing {
                    name: entity.name().to_string(),
                    kind: entity.kind(),
                    path: self.tree.path_of(id),
                })
            })
            .collect()
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    /// Version history of a file, oldest first.
    pub fn version_history(&self, name: &str) -> Result<&[VersionRecord]> {
        let record = self
            .index
            .search(name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        Ok(self
            .versions
            .chain(record.entity)
            .map_or(&[][..], |chain| chain.list_versions()))
    }

    /// Content of one version of a file.
    pub fn get_version(&self, name: &str, number: u32) -> Result<&str> {
        let record = self
            .index
            .search(name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        self.versions
            .chain(record.entity)
            .and_then(|chain| chain.get_version(number))
            .ok_or_else(|| DriveError::NotFound(format!("version {number} of '{name}'")))
    }

    // ------------------------------------------------------------------
    // Sharing
    // ------------------------------------------------------------------

    /// Share a file from the cursor's directory with another user.
    ///
    /// `permission` is raw input and must be `view` or `edit`.
    pub fn share_file(
        &mut self,
        actor: &str,
        cursor: &Cursor,
        file_name: &str,
        target: &str,
        permission: &str,
    ) -> Result<()> {
        self.require_account(actor)?;
        let permission: Permission = permission.parse()?;
        let record = self
            .find_file(cursor, file_name)
            .ok_or_else(|| DriveError::NotFound(format!("file '{file_name}'")))?;
        if !record.is_owned_by(actor) {
            warn!(user = actor, file = file_name, "Share refused: not the owner");
            return Err(DriveError::PermissionDenied(format!(
                "you don't have permission to share '{file_name}'"
            )));
        }
        self.users.share_file(actor, target, file_name, permission)
    }

    /// Files shared by `actor`, in the order they were shared.
    pub fn list_shares(&self, actor: &str) -> Result<&[ShareEdge]> {
        self.users.list_shares(actor)
    }

    /// Files other users shared with `actor`.
    pub fn shared_with_me(&self, actor: &str) -> Vec<IncomingShare> {
        self.users
            .shared_with(actor)
            .into_iter()
            .map(|(owner, edge)| IncomingShare {
                owner: owner.to_string(),
                file_name: edge.file_name.clone(),
                permission: edge.permission,
                shared_at: edge.shared_at,
            })
            .collect()
    }
}
