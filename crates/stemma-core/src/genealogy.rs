//! The genealogy: a stem plus descendants, each with one or more parents
//!
//! Every mutating operation stages its change before touching live state.
//! Validation and all calls into user code (identifier comparison and
//! cloning) happen first; the commit that follows only performs arena
//! writes that cannot fail or call back into user code. A failed call,
//! whether it returns an error or unwinds from a panicking `Ord`
//! implementation, leaves the genealogy exactly as it was.

use crate::cache::MaterializationCache;
use crate::children::{ChildCursor, Children};
use crate::config::{EmptyParentsPolicy, GenealogyConfig, LinkPolicy};
use crate::entity::Entity;
use crate::error::{GenealogyError, GenealogyResult};
use crate::store::Store;
use petgraph::stable_graph::NodeIndex;
use std::sync::Arc;

/// A rooted DAG of entities with transactional mutation.
///
/// The stem is fixed at construction and can never be removed or given a
/// parent. Every other entity keeps at least one parent for as long as it
/// exists; removing its last parent removes it too.
///
/// A genealogy is not `Clone`: each instance is the only owner of its
/// graph. It is not `Sync` either, since lookups fill the materialization
/// cache through a shared reference; wrap it in a `Mutex` to share it
/// between threads.
pub struct Genealogy<E: Entity> {
    store: Store<E::Id>,
    stem: NodeIndex,
    config: GenealogyConfig,
    cache: MaterializationCache<E>,
}

impl<E: Entity> std::fmt::Debug for Genealogy<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Genealogy")
            .field("stem", self.stem_id())
            .field("store", &self.store)
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish()
    }
}

impl<E: Entity> Genealogy<E> {
    /// Create a genealogy holding only the stem, with the default
    /// configuration.
    pub fn new(stem_id: E::Id) -> Self {
        Self::with_config(stem_id, GenealogyConfig::default())
    }

    pub fn with_config(stem_id: E::Id, config: GenealogyConfig) -> Self {
        let (store, stem) = Store::new(stem_id);
        Genealogy {
            store,
            stem,
            config,
            cache: MaterializationCache::new(),
        }
    }

    pub fn config(&self) -> &GenealogyConfig {
        &self.config
    }

    // ==================== Reads ====================

    pub fn stem_id(&self) -> &E::Id {
        self.store.id_of(self.stem)
    }

    /// The stem's materialized value.
    pub fn stem(&self) -> GenealogyResult<Arc<E>, E::Id> {
        self.cache.materialize(self.stem_id())
    }

    pub fn exists(&self, id: &E::Id) -> bool {
        self.store.contains(id)
    }

    /// Number of entities, the stem included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Every identifier, ascending.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &E::Id> + ExactSizeIterator {
        self.store.ids()
    }

    /// The materialized value for `id`.
    pub fn lookup(&self, id: &E::Id) -> GenealogyResult<Arc<E>, E::Id> {
        let ix = self.handle(id)?;
        self.cache.materialize(self.store.id_of(ix))
    }

    /// Snapshot of the parents of `id`, ascending.
    pub fn get_parents(&self, id: &E::Id) -> GenealogyResult<Vec<E::Id>, E::Id> {
        let ix = self.handle(id)?;
        Ok(self.snapshot(self.store.parents(ix)))
    }

    /// Snapshot of the children of `id`, ascending.
    pub fn get_children(&self, id: &E::Id) -> GenealogyResult<Vec<E::Id>, E::Id> {
        let ix = self.handle(id)?;
        Ok(self.snapshot(self.store.children(ix)))
    }

    /// Lazily materialized children of `id`, ascending.
    pub fn children(&self, id: &E::Id) -> GenealogyResult<Children<'_, E>, E::Id> {
        let ix = self.handle(id)?;
        let ids = self.store.sorted_ids(self.store.children(ix));
        Ok(Children::new(ids, &self.cache))
    }

    /// Cursor at the first child of `id`.
    pub fn children_begin(&self, id: &E::Id) -> GenealogyResult<ChildCursor<'_, E>, E::Id> {
        self.cursor(id, false)
    }

    /// Cursor one past the last child of `id`.
    pub fn children_end(&self, id: &E::Id) -> GenealogyResult<ChildCursor<'_, E>, E::Id> {
        self.cursor(id, true)
    }

    /// Number of materialized values held by the cache.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Discard every materialized value. The graph is unaffected.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    // ==================== Creation ====================

    /// Create `id` as a child of `parent_id`.
    pub fn create(&mut self, id: E::Id, parent_id: &E::Id) -> GenealogyResult<(), E::Id> {
        if self.store.contains(&id) {
            return Err(GenealogyError::AlreadyExists(id));
        }
        let parent = self.handle(parent_id)?;
        self.commit_insert(id, &[parent])
    }

    /// Create `id` as a child of every entity in `parent_ids`.
    ///
    /// All parents are validated before anything changes; repeated parents
    /// collapse into one link. An empty list is handled per
    /// [`EmptyParentsPolicy`].
    pub fn create_with_parents(
        &mut self,
        id: E::Id,
        parent_ids: &[E::Id],
    ) -> GenealogyResult<(), E::Id> {
        if self.store.contains(&id) {
            return Err(GenealogyError::AlreadyExists(id));
        }

        let mut parents = parent_ids
            .iter()
            .map(|parent_id| self.handle(parent_id))
            .collect::<Result<Vec<_>, _>>()?;
        parents.sort_unstable();
        parents.dedup();

        if parents.is_empty() {
            return match self.config.empty_parents {
                EmptyParentsPolicy::Reject => Err(GenealogyError::EmptyParentList(id)),
                EmptyParentsPolicy::Ignore => {
                    tracing::trace!("Ignoring creation of {:?} without parents", id);
                    Ok(())
                }
            };
        }

        self.commit_insert(id, &parents)
    }

    fn commit_insert(&mut self, id: E::Id, parents: &[NodeIndex]) -> GenealogyResult<(), E::Id> {
        let ix = self
            .store
            .insert(id, parents)
            .map_err(GenealogyError::AlreadyExists)?;
        tracing::debug!(
            "Created {:?} with {} parent(s)",
            self.store.id_of(ix),
            parents.len()
        );
        Ok(())
    }

    // ==================== Linking ====================

    /// Add `parent_id` to the parents of `child_id`.
    ///
    /// Linking an existing pair again does nothing. The stem never gains a
    /// parent. Under [`LinkPolicy::RejectCycles`] the link is refused when
    /// `parent_id` is `child_id` or one of its descendants.
    pub fn connect(&mut self, child_id: &E::Id, parent_id: &E::Id) -> GenealogyResult<(), E::Id> {
        let child = self.handle(child_id)?;
        let parent = self.handle(parent_id)?;

        if self.store.is_linked(parent, child) {
            tracing::trace!("{:?} is already a parent of {:?}", parent_id, child_id);
            return Ok(());
        }

        let closes_cycle = child == self.stem
            || (self.config.link_policy == LinkPolicy::RejectCycles
                && self.store.reaches(child, parent));
        if closes_cycle {
            return Err(GenealogyError::WouldCreateCycle {
                child: child_id.clone(),
                parent: parent_id.clone(),
            });
        }

        self.store.link(parent, child);
        tracing::debug!("Connected {:?} beneath {:?}", child_id, parent_id);
        Ok(())
    }

    // ==================== Removal ====================

    /// Remove `id` and every descendant left without parents.
    ///
    /// The cascade runs on a copy of the store with an explicit work list;
    /// the copy replaces the live store only once it is complete. Returns
    /// the removed identifiers: `id` first, then orphaned descendants depth
    /// first in ascending order.
    pub fn remove(&mut self, id: &E::Id) -> GenealogyResult<Vec<E::Id>, E::Id> {
        let target = self.handle(id)?;
        if target == self.stem {
            return Err(GenealogyError::RemoveStemForbidden(id.clone()));
        }

        let mut scratch = self.store.clone();
        let mut pending = vec![target];
        let mut removed = Vec::new();

        while let Some(current) = pending.pop() {
            let children: Vec<NodeIndex> = scratch.children(current).collect();
            let Some(removed_id) = scratch.erase(current) else {
                continue;
            };
            removed.push(removed_id);

            let mut orphans: Vec<NodeIndex> = children
                .into_iter()
                .filter(|&child| !scratch.has_parents(child) && scratch.contains_handle(child))
                .collect();
            // Reverse order so the smallest orphan is popped first.
            orphans.sort_by(|a, b| scratch.id_of(*b).cmp(scratch.id_of(*a)));
            pending.extend(orphans);
        }

        self.store = scratch;
        tracing::debug!("Removed {:?} ({} entities in cascade)", id, removed.len());
        Ok(removed)
    }

    // ==================== Helpers ====================

    fn handle(&self, id: &E::Id) -> GenealogyResult<NodeIndex, E::Id> {
        self.store
            .locate(id)
            .ok_or_else(|| GenealogyError::NotFound(id.clone()))
    }

    fn snapshot(&self, handles: impl Iterator<Item = NodeIndex>) -> Vec<E::Id> {
        self.store
            .sorted_ids(handles)
            .into_iter()
            .cloned()
            .collect()
    }

    fn cursor(&self, id: &E::Id, at_end: bool) -> GenealogyResult<ChildCursor<'_, E>, E::Id> {
        let ix = self.handle(id)?;
        let ids = self.store.sorted_ids(self.store.children(ix));
        Ok(ChildCursor::new(ix, ids, at_end, &self.cache))
    }
}
