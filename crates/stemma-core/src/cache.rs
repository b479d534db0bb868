//! Materialization cache: payload values rebuilt from identifiers

use crate::entity::Entity;
use crate::error::{GenealogyError, GenealogyResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-genealogy store of materialized values.
///
/// Holds at most one value per identifier and the first value stored wins.
/// Entries are never pruned when an entity is removed; they only go away
/// through [`MaterializationCache::clear`].
pub struct MaterializationCache<E: Entity> {
    entries: RefCell<BTreeMap<E::Id, Arc<E>>>,
}

impl<E: Entity> MaterializationCache<E> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
        }
    }

    /// Get the value for `id`, building it on first access.
    ///
    /// A failed build is not cached, so a later call retries it.
    pub fn materialize(&self, id: &E::Id) -> GenealogyResult<Arc<E>, E::Id> {
        if let Some(value) = self.entries.borrow().get(id) {
            tracing::trace!("Cache hit for {:?}", id);
            return Ok(Arc::clone(value));
        }

        // Build outside of any borrow so a panicking constructor cannot
        // leave the map borrowed.
        let value = E::from_id(id).map_err(|e| GenealogyError::materialize(id.clone(), e))?;
        tracing::trace!("Materialized {:?}", id);

        let mut entries = self.entries.borrow_mut();
        let cached = entries.entry(id.clone()).or_insert_with(|| Arc::new(value));
        Ok(Arc::clone(cached))
    }

    /// Whether a value for `id` has been materialized.
    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.borrow().contains_key(id)
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every cached value. Values already handed out stay alive.
    pub fn clear(&mut self) {
        self.entries.get_mut().clear();
    }
}

impl<E: Entity> Default for MaterializationCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> std::fmt::Debug for MaterializationCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterializationCache")
            .field("len", &self.len())
            .finish()
    }
}
