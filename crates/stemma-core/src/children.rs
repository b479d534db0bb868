//! Ordered views over one entity's children

use crate::cache::MaterializationCache;
use crate::entity::Entity;
use crate::error::GenealogyResult;
use petgraph::stable_graph::NodeIndex;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Iterator over the children of one entity, in ascending identifier order.
///
/// Values are materialized lazily through the genealogy's shared cache, so a
/// value produced here is the same `Arc` that `lookup` returns. Iterate from
/// either end; call `Genealogy::children` again to restart.
pub struct Children<'g, E: Entity> {
    ids: std::vec::IntoIter<&'g E::Id>,
    cache: &'g MaterializationCache<E>,
}

impl<'g, E: Entity> Children<'g, E> {
    pub(crate) fn new(ids: Vec<&'g E::Id>, cache: &'g MaterializationCache<E>) -> Self {
        Self {
            ids: ids.into_iter(),
            cache,
        }
    }

    /// The remaining child identifiers, without materializing anything.
    pub fn ids(self) -> std::vec::IntoIter<&'g E::Id> {
        self.ids
    }
}

impl<E: Entity> Iterator for Children<'_, E> {
    type Item = GenealogyResult<Arc<E>, E::Id>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| self.cache.materialize(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<E: Entity> DoubleEndedIterator for Children<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|id| self.cache.materialize(id))
    }
}

impl<E: Entity> ExactSizeIterator for Children<'_, E> {}

impl<E: Entity> FusedIterator for Children<'_, E> {}

/// A bidirectional position in one entity's ordered child sequence.
///
/// Positions run from the first child (`children_begin`) to one past the
/// last (`children_end`). Two cursors are equal when they point at the same
/// offset of the same entity's children; payload values play no part.
pub struct ChildCursor<'g, E: Entity> {
    owner: NodeIndex,
    ids: Vec<&'g E::Id>,
    position: usize,
    cache: &'g MaterializationCache<E>,
}

impl<'g, E: Entity> ChildCursor<'g, E> {
    pub(crate) fn new(
        owner: NodeIndex,
        ids: Vec<&'g E::Id>,
        at_end: bool,
        cache: &'g MaterializationCache<E>,
    ) -> Self {
        let position = if at_end { ids.len() } else { 0 };
        Self {
            owner,
            ids,
            position,
            cache,
        }
    }

    /// Identifier at the cursor, `None` past the last child.
    pub fn id(&self) -> Option<&'g E::Id> {
        self.ids.get(self.position).copied()
    }

    /// Materialized value at the cursor, `None` past the last child.
    pub fn get(&self) -> Option<GenealogyResult<Arc<E>, E::Id>> {
        self.id().map(|id| self.cache.materialize(id))
    }

    pub fn is_end(&self) -> bool {
        self.position == self.ids.len()
    }

    /// Step forward. Returns `false` (and stays put) at the end.
    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Step back. Returns `false` (and stays put) at the first child.
    pub fn move_prev(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }
}

impl<E: Entity> Clone for ChildCursor<'_, E> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            ids: self.ids.clone(),
            position: self.position,
            cache: self.cache,
        }
    }
}

impl<E: Entity> PartialEq for ChildCursor<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.position == other.position
    }
}

impl<E: Entity> Eq for ChildCursor<'_, E> {}

impl<E: Entity> std::fmt::Debug for ChildCursor<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildCursor")
            .field("id", &self.id())
            .field("position", &self.position)
            .field("len", &self.ids.len())
            .finish()
    }
}
