//! Recent-access history for CloudVault.

use std::collections::VecDeque;

use crate::namespace::{EntityId, NamespaceTree};
use crate::{DriveError, Result};

/// FIFO record of accessed entities.
///
/// Entries are weak: a handle whose entity has since been deleted or purged
/// is skipped when listing.
#[derive(Debug, Default)]
pub struct RecentHistory {
    entries: VecDeque<EntityId>,
    /// Maximum retained entries, 0 for unbounded.
    capacity: usize,
}

impl RecentHistory {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History that evicts the oldest entry beyond `capacity` (0 = unbounded).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append an access at the tail.
    pub fn record_access(&mut self, id: EntityId) {
        if self.capacity > 0 && self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(id);
    }

    /// Remove the oldest entry.
    pub fn dequeue(&mut self) -> Result<EntityId> {
        self.entries
            .pop_front()
            .ok_or(DriveError::EmptyCollection("recent history"))
    }

    /// Entries still present in the namespace, oldest first.
    pub fn list_recent(&self, tree: &NamespaceTree) -> Vec<EntityId> {
        self.entries
            .iter()
            .copied()
            .filter(|id| tree.contains(*id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
