//! Node storage: an arena of identifiers with parent → child edges

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Identity and shape of a genealogy.
///
/// Each entity is an arena node whose weight is its identifier. Edges run
/// from parent to child, so a node's parent set is its incoming neighbours
/// and its child set is its outgoing neighbours. `index` maps identifiers to
/// arena handles and is the only structure ordered by the identifier.
#[derive(Clone)]
pub(crate) struct Store<Id> {
    graph: StableDiGraph<Id, ()>,
    index: BTreeMap<Id, NodeIndex>,
}

impl<Id> std::fmt::Debug for Store<Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("node_count", &self.graph.node_count())
            .field("edge_count", &self.graph.edge_count())
            .finish()
    }
}

impl<Id: Ord + Clone> Store<Id> {
    /// Create a store holding only the stem. Returns the stem's handle.
    pub fn new(stem: Id) -> (Self, NodeIndex) {
        let mut graph = StableDiGraph::new();
        let stem_ix = graph.add_node(stem.clone());
        let index = BTreeMap::from([(stem, stem_ix)]);
        (Store { graph, index }, stem_ix)
    }

    /// Arena handle for an identifier.
    pub fn locate(&self, id: &Id) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    /// Whether a handle still names a live node.
    pub fn contains_handle(&self, ix: NodeIndex) -> bool {
        self.graph.contains_node(ix)
    }

    /// Identifier stored at a handle. Handles come from `locate` on the same
    /// store, so the slot is always occupied.
    pub fn id_of(&self, ix: NodeIndex) -> &Id {
        &self.graph[ix]
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// All identifiers in ascending order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &Id> + ExactSizeIterator {
        self.index.keys()
    }

    pub fn parents(&self, ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(ix, Direction::Incoming)
    }

    pub fn children(&self, ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(ix, Direction::Outgoing)
    }

    pub fn has_parents(&self, ix: NodeIndex) -> bool {
        self.parents(ix).next().is_some()
    }

    /// Identifiers of a handle set, sorted ascending.
    pub fn sorted_ids(&self, handles: impl Iterator<Item = NodeIndex>) -> Vec<&Id> {
        let mut ids: Vec<&Id> = handles.map(|ix| self.id_of(ix)).collect();
        ids.sort();
        ids
    }

    /// Whether `parent` already lists `child`.
    pub fn is_linked(&self, parent: NodeIndex, child: NodeIndex) -> bool {
        self.graph.find_edge(parent, child).is_some()
    }

    /// Whether `to` is reachable from `from` along parent → child edges.
    /// A node always reaches itself.
    pub fn reaches(&self, from: NodeIndex, to: NodeIndex) -> bool {
        has_path_connecting(&self.graph, from, to, None)
    }

    /// Insert a new node linked beneath every handle in `parents`.
    ///
    /// All identifier comparisons happen while locating the index slot,
    /// before anything is written; the writes that follow never call back
    /// into `Id`. Returns the identifier back if it is already present.
    pub fn insert(&mut self, id: Id, parents: &[NodeIndex]) -> Result<NodeIndex, Id> {
        let weight = id.clone();
        match self.index.entry(id) {
            Entry::Occupied(_) => Err(weight),
            Entry::Vacant(slot) => {
                let ix = self.graph.add_node(weight);
                for &parent in parents {
                    self.graph.add_edge(parent, ix, ());
                }
                slot.insert(ix);
                Ok(ix)
            }
        }
    }

    /// Add a parent → child edge between existing nodes.
    pub fn link(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_edge(parent, child, ());
    }

    /// Remove a node with all of its edges. Returns its identifier, or `None`
    /// if the handle was already vacant.
    pub fn erase(&mut self, ix: NodeIndex) -> Option<Id> {
        let id = self.graph.remove_node(ix)?;
        self.index.remove(&id);
        Some(id)
    }
}
