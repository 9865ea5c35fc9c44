//! Per-file version history for CloudVault.
//!
//! Each file owns one append-only chain of content snapshots. Chains are
//! created when the file is created, with version 1 holding the initial
//! content, and grow by one version per successful edit.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::namespace::EntityId;

/// One snapshot in a version chain.
#[derive(Debug, Clone, Serialize)]
pub struct VersionRecord {
    /// 1-based version number.
    pub number: u32,
    /// Content at this version.
    pub content: String,
    /// When the version was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Append-only sequence of versions with contiguous numbers from 1.
#[derive(Debug, Clone, Default)]
pub struct VersionChain {
    versions: Vec<VersionRecord>,
}

impl VersionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain whose first version is `content`.
    pub fn with_initial(content: impl Into<String>) -> Self {
        let mut chain = Self::new();
        chain.add_version(content);
        chain
    }

    /// Append a version and return its number.
    pub fn add_version(&mut self, content: impl Into<String>) -> u32 {
        let number = self.versions.len() as u32 + 1;
        self.versions.push(VersionRecord {
            number,
            content: content.into(),
            recorded_at: Utc::now(),
        });
        number
    }

    /// Content of version `number`, or `None` if out of range.
    pub fn get_version(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.versions.get(index).map(|v| v.content.as_str())
    }

    /// All versions, oldest first.
    pub fn list_versions(&self) -> &[VersionRecord] {
        &self.versions
    }

    pub fn latest(&self) -> Option<&VersionRecord> {
        self.versions.last()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Version chains of all live files, keyed by entity.
#[derive(Debug, Default)]
pub struct VersionStore {
    chains: HashMap<EntityId, VersionChain>,
}

impl VersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&self, id: EntityId) -> Option<&VersionChain> {
        self.chains.get(&id)
    }

    /// Chain of `id`, created empty on first use.
    pub fn chain_mut(&mut self, id: EntityId) -> &mut VersionChain {
        self.chains.entry(id).or_default()
    }

    /// Attach a chain to an entity, replacing any previous one.
    pub fn attach(&mut self, id: EntityId, chain: VersionChain) {
        self.chains.insert(id, chain);
    }

    /// Take the chain away from an entity that leaves the namespace.
    pub fn detach(&mut self, id: EntityId) -> VersionChain {
        self.chains.remove(&id).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{Entity, EntityArena};

    #[test]
    fn test_versions_are_contiguous() {
        let mut chain = VersionChain::new();
        for k in 1..=5 {
            assert_eq!(chain.add_version(format!("v{k}")), k);
        }

        let numbers: Vec<_> = chain.list_versions().iter().map(|v| v.number).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
        assert_eq!(chain.get_version(5), Some("v5"));
        assert_eq!(chain.latest().unwrap().content, "v5");
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut chain = VersionChain::new();
        chain.add_version("a");
        chain.add_version("b");
        let versions = chain.list_versions();
        assert!(versions[0].recorded_at <= versions[1].recorded_at);
    }

    #[test]
    fn test_get_version_out_of_range() {
        let chain = VersionChain::with_initial("first");
        assert_eq!(chain.get_version(1), Some("first"));
        assert_eq!(chain.get_version(0), None);
        assert_eq!(chain.get_version(2), None);
    }

    #[test]
    fn test_empty_chain() {
        let chain = VersionChain::new();
        assert!(chain.is_empty());
        assert!(chain.latest().is_none());
        assert!(chain.list_versions().is_empty());
    }

    #[test]
    fn test_store_detach_and_attach() {
        let mut arena = EntityArena::new();
        let first = arena.insert(Entity::file("a", "", "alice"));
        let second = arena.insert(Entity::file("b", "", "alice"));

        let mut store = VersionStore::new();
        store.attach(first, VersionChain::with_initial("one"));
        store.chain_mut(first).add_version("two");

        let chain = store.detach(first);
        assert_eq!(chain.len(), 2);
        assert!(store.chain(first).is_none());

        store.attach(second, chain);
        assert_eq!(store.chain(second).unwrap().get_version(2), Some("two"));
        assert!(store.detach(first).is_empty());
    }
}
