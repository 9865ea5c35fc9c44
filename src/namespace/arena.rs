//! Entity storage for the namespace.

use std::ops::{Index, IndexMut};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stable, generation-checked handle to an entity.
///
/// A handle stops resolving once its entity is removed from the arena, even
/// if the slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

/// Kind of a namespace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Directory,
    File,
}

impl EntityKind {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Directory => "Folder",
            EntityKind::File => "File",
        }
    }
}

/// Tree links of an entity, expressed as handles.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Links {
    /// Owning directory.
    pub(crate) parent: Option<EntityId>,
    /// Sibling-BST links within the parent's child tree.
    pub(crate) left: Option<EntityId>,
    pub(crate) right: Option<EntityId>,
    pub(crate) up: Option<EntityId>,
    /// Root of this directory's child tree.
    pub(crate) children: Option<EntityId>,
}

/// A directory or file.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    kind: EntityKind,
    content: String,
    owner: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    pub(crate) links: Links,
}

impl Entity {
    /// Create a new directory entity.
    pub fn directory(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::new(name.into(), EntityKind::Directory, String::new(), owner.into())
    }

    /// Create a new file entity.
    pub fn file(
        name: impl Into<String>,
        content: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self::new(name.into(), EntityKind::File, content.into(), owner.into())
    }

    fn new(name: String, kind: EntityKind, content: String, owner: String) -> Self {
        let now = Utc::now();
        Self {
            name,
            kind,
            content,
            owner,
            created_at: now,
            modified_at: now,
            links: Links::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntityKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntityKind::Directory
    }

    /// File content (always empty for directories).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content size in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// User id of the creator.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Owning directory, `None` for the root or a detached entity.
    pub fn parent(&self) -> Option<EntityId> {
        self.links.parent
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
        self.modified_at = Utc::now();
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
        self.modified_at = Utc::now();
    }

    /// Reset links and timestamps before the entity re-enters a tree.
    pub(crate) fn refresh(&mut self) {
        let now = Utc::now();
        self.created_at = now;
        self.modified_at = now;
        self.links = Links::default();
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Arena owning every live entity of a namespace.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity and return its handle.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Remove an entity, invalidating every handle to it.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entity.as_mut())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

/// Panics on a stale handle; use [`EntityArena::get`] for handles that may be stale.
impl Index<EntityId> for EntityArena {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        match self.get(id) {
            Some(entity) => entity,
            None => panic!("stale entity handle {id:?}"),
        }
    }
}

impl IndexMut<EntityId> for EntityArena {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        match self.get_mut(id) {
            Some(entity) => entity,
            None => panic!("stale entity handle {id:?}"),
        }
    }
}
