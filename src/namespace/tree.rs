//! Namespace tree: directories whose children are kept in a binary search
//! tree ordered by name.
//!
//! The sibling trees are not rebalanced. Fan-out per directory is expected to
//! be small, so the degenerate O(k) case is accepted.

use std::cmp::Ordering;

use tracing::debug;

use super::arena::{Entity, EntityArena, EntityId, EntityKind, Links};
use super::{validate_name, MAX_NAME_LENGTH};
use crate::{DriveError, Result};

/// Name that selects the parent directory in [`NamespaceTree::change_directory`].
pub const PARENT_SELECTOR: &str = "..";

/// Navigation cursor owned by the caller's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    dir: EntityId,
}

impl Cursor {
    /// Directory the cursor points at.
    pub fn directory(&self) -> EntityId {
        self.dir
    }
}

/// An immediate child of a directory, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
}

/// The directory hierarchy of one drive.
#[derive(Debug)]
pub struct NamespaceTree {
    arena: EntityArena,
    root: EntityId,
    max_name_length: usize,
}

impl NamespaceTree {
    /// Create a namespace containing only the root directory.
    pub fn new(root_name: &str) -> Self {
        Self::with_max_name_length(root_name, MAX_NAME_LENGTH)
    }

    /// Create a namespace with a custom name length limit.
    pub fn with_max_name_length(root_name: &str, max_name_length: usize) -> Self {
        let mut arena = EntityArena::new();
        let root = arena.insert(Entity::directory(root_name, ""));
        Self {
            arena,
            root,
            max_name_length,
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    /// A fresh cursor positioned at the root directory.
    pub fn cursor(&self) -> Cursor {
        Cursor { dir: self.root }
    }

    /// Resolve a handle; `None` once the entity left the namespace.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.arena.contains(id)
    }

    /// Number of live entities, the root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn max_name_length(&self) -> usize {
        self.max_name_length
    }

    /// Move the cursor to a child directory, or to the parent for `..`.
    ///
    /// Reports [`DriveError::AtRoot`] without moving when asked for the
    /// parent of the root.
    pub fn change_directory(&self, cursor: &mut Cursor, name: &str) -> Result<()> {
        let dir = self.directory(cursor)?;

        if name == PARENT_SELECTOR {
            let parent = self.links(dir).parent.ok_or(DriveError::AtRoot)?;
            cursor.dir = parent;
            debug!(directory = %self.path_of(parent), "Changed to parent directory");
            return Ok(());
        }

        match self.find_child(dir, name) {
            Some(id) if self.arena[id].is_directory() => {
                cursor.dir = id;
                debug!(directory = %self.path_of(id), "Changed directory");
                Ok(())
            }
            _ => Err(DriveError::NotFound(format!("directory '{name}'"))),
        }
    }

    /// Create a subdirectory under the cursor's directory.
    pub fn make_directory(&mut self, cursor: &Cursor, name: &str, owner: &str) -> Result<EntityId> {
        self.insert_new(cursor, Entity::directory(name, owner))
    }

    /// Create a file under the cursor's directory.
    pub fn create_file(
        &mut self,
        cursor: &Cursor,
        name: &str,
        content: &str,
        owner: &str,
    ) -> Result<EntityId> {
        self.insert_new(cursor, Entity::file(name, content, owner))
    }

    /// Check that `name` could be inserted under the cursor's directory.
    pub fn check_insertable(&self, cursor: &Cursor, name: &str) -> Result<()> {
        validate_name(name, self.max_name_length)?;
        let dir = self.directory(cursor)?;
        if self.find_child(dir, name).is_some() {
            return Err(DriveError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    fn insert_new(&mut self, cursor: &Cursor, entity: Entity) -> Result<EntityId> {
        self.check_insertable(cursor, entity.name())?;
        let dir = cursor.dir;
        let id = self.arena.insert(entity);
        self.link_child(dir, id);
        Ok(id)
    }

    /// Find an immediate child of any kind.
    pub fn find_entry(&self, cursor: &Cursor, name: &str) -> Option<EntityId> {
        let dir = self.directory(cursor).ok()?;
        self.find_child(dir, name)
    }

    /// Find an immediate child file.
    pub fn find_file(&self, cursor: &Cursor, name: &str) -> Option<EntityId> {
        self.find_entry(cursor, name)
            .filter(|id| self.arena[*id].is_file())
    }

    /// Detach a file from the cursor's directory and hand its entity to the caller.
    ///
    /// The returned handle no longer resolves.
    pub fn remove_file(&mut self, cursor: &Cursor, name: &str) -> Result<(EntityId, Entity)> {
        let dir = self.directory(cursor)?;
        let id = self
            .find_child(dir, name)
            .filter(|id| self.arena[*id].is_file())
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;

        self.unlink_child(dir, id);
        let mut entity = self
            .arena
            .remove(id)
            .ok_or_else(|| DriveError::NotFound(format!("file '{name}'")))?;
        entity.links = Links::default();
        Ok((id, entity))
    }

    /// Put a previously removed entity back under the cursor's directory.
    ///
    /// The entity receives a fresh handle and fresh timestamps.
    pub fn reattach(&mut self, cursor: &Cursor, mut entity: Entity) -> Result<EntityId> {
        self.check_insertable(cursor, entity.name())?;
        entity.refresh();
        let id = self.arena.insert(entity);
        self.link_child(cursor.dir, id);
        Ok(id)
    }

    /// Rename an immediate child of the cursor's directory.
    ///
    /// The child is re-positioned in its sibling tree since its key changed.
    pub fn rename_entry(&mut self, cursor: &Cursor, old: &str, new: &str) -> Result<EntityId> {
        let dir = self.directory(cursor)?;
        let id = self
            .find_child(dir, old)
            .ok_or_else(|| DriveError::NotFound(format!("entry '{old}'")))?;
        if old == new {
            return Ok(id);
        }
        self.check_insertable(cursor, new)?;

        self.unlink_child(dir, id);
        self.arena[id].set_name(new.to_string());
        self.link_child(dir, id);
        Ok(id)
    }

    /// Replace the content of a live file.
    pub fn set_content(&mut self, id: EntityId, content: &str) -> Result<()> {
        match self.arena.get_mut(id) {
            Some(entity) if entity.is_file() => {
                entity.set_content(content.to_string());
                Ok(())
            }
            _ => Err(DriveError::NotFound("file".to_string())),
        }
    }

    /// Immediate children of the cursor's directory in name order.
    pub fn list_contents(&self, cursor: &Cursor) -> Result<Vec<DirEntry>> {
        let dir = self.directory(cursor)?;
        Ok(self
            .children_in_order(dir)
            .into_iter()
            .map(|id| {
                let entity = &self.arena[id];
                DirEntry {
                    id,
                    name: entity.name().to_string(),
                    kind: entity.kind(),
                }
            })
            .collect())
    }

    /// Absolute path of a live entity, e.g. `/Photos/2024`.
    pub fn path_of(&self, id: EntityId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(entity) = self.arena.get(node) else {
                break;
            };
            if node != self.root {
                names.push(entity.name());
            }
            current = entity.links.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Name of the cursor's directory.
    pub fn current_directory_name(&self, cursor: &Cursor) -> Result<&str> {
        let dir = self.directory(cursor)?;
        Ok(self.arena[dir].name())
    }

    fn directory(&self, cursor: &Cursor) -> Result<EntityId> {
        match self.arena.get(cursor.dir) {
            Some(entity) if entity.is_directory() => Ok(cursor.dir),
            _ => Err(DriveError::NotFound("current directory".to_string())),
        }
    }

    fn links(&self, id: EntityId) -> &Links {
        &self.arena[id].links
    }

    fn links_mut(&mut self, id: EntityId) -> &mut Links {
        &mut self.arena[id].links
    }

    fn find_child(&self, dir: EntityId, name: &str) -> Option<EntityId> {
        let mut current = self.links(dir).children;
        while let Some(id) = current {
            current = match name.cmp(self.arena[id].name()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => self.links(id).left,
                Ordering::Greater => self.links(id).right,
            };
        }
        None
    }

    /// Insert `id` into `dir`'s child tree. The name must not be present.
    fn link_child(&mut self, dir: EntityId, id: EntityId) {
        self.links_mut(id).parent = Some(dir);

        let Some(mut current) = self.links(dir).children else {
            self.links_mut(dir).children = Some(id);
            return;
        };

        loop {
            let goes_left = self.arena[id].name() < self.arena[current].name();
            let next = if goes_left {
                self.links(current).left
            } else {
                self.links(current).right
            };
            match next {
                Some(next) => current = next,
                None => {
                    if goes_left {
                        self.links_mut(current).left = Some(id);
                    } else {
                        self.links_mut(current).right = Some(id);
                    }
                    self.links_mut(id).up = Some(current);
                    return;
                }
            }
        }
    }

    /// Remove `z` from `dir`'s child tree using successor replacement.
    fn unlink_child(&mut self, dir: EntityId, z: EntityId) {
        let Links { left, right, .. } = *self.links(z);
        match (left, right) {
            (None, _) => self.transplant(dir, z, right),
            (_, None) => self.transplant(dir, z, left),
            (Some(left), Some(right)) => {
                let successor = self.minimum(right);
                if self.links(successor).up != Some(z) {
                    let successor_right = self.links(successor).right;
                    self.transplant(dir, successor, successor_right);
                    self.links_mut(successor).right = Some(right);
                    self.links_mut(right).up = Some(successor);
                }
                self.transplant(dir, z, Some(successor));
                self.links_mut(successor).left = Some(left);
                self.links_mut(left).up = Some(successor);
            }
        }

        let links = self.links_mut(z);
        links.left = None;
        links.right = None;
        links.up = None;
        links.parent = None;
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    fn transplant(&mut self, dir: EntityId, u: EntityId, v: Option<EntityId>) {
        let up = self.links(u).up;
        match up {
            None => self.links_mut(dir).children = v,
            Some(p) if self.links(p).left == Some(u) => self.links_mut(p).left = v,
            Some(p) => self.links_mut(p).right = v,
        }
        if let Some(v) = v {
            self.links_mut(v).up = up;
        }
    }

    fn minimum(&self, mut id: EntityId) -> EntityId {
        while let Some(left) = self.links(id).left {
            id = left;
        }
        id
    }

    fn children_in_order(&self, dir: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        let mut current = self.links(dir).children;

        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.links(id).left;
            }
            if let Some(id) = stack.pop() {
                out.push(id);
                current = self.links(id).right;
            }
        }
        out
    }
}
