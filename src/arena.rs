use tracing::error;

use crate::error::{Error, Result};

/// Index of a node record inside a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub(crate) u32);

impl NodeIdx {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-shape node record: the flag word and the start of its child run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PackedNode {
    pub(crate) bits: u32,
    pub(crate) children: u32,
}

/// Default budget, enough for a full tournament word list.
pub const DEFAULT_ARENA_BYTES: usize = 5 << 20;

/// Backing store for a compact trie.
///
/// Nodes live in one growing buffer of records and their children in a
/// second buffer of dense index runs. Nothing is freed per node; the whole
/// arena goes away with its owner. The byte budget is fixed up front and
/// an allocation that does not fit fails with [`Error::ArenaExhausted`].
#[derive(Clone, Debug)]
pub struct NodeArena {
    pub(crate) nodes: Vec<PackedNode>,
    pub(crate) edges: Vec<NodeIdx>,
    capacity: usize,
    used: usize,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    /// Creates an arena with the default budget.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARENA_BYTES)
    }

    /// Creates an arena holding at most `capacity` bytes of nodes and edges.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity((capacity / 2) / size_of::<PackedNode>()),
            edges: Vec::with_capacity((capacity / 2) / size_of::<NodeIdx>()),
            capacity,
            used: 0,
        }
    }

    /// Bytes taken by one node with `num_children` children.
    #[inline(always)]
    pub fn record_size(num_children: usize) -> usize {
        size_of::<PackedNode>() + num_children * size_of::<NodeIdx>()
    }

    /// Reserves a node record and a run of `num_children` child slots.
    ///
    /// Child slots start out pointing at the node itself and must be
    /// filled with [`set_child`](Self::set_child).
    pub fn allocate(&mut self, num_children: usize) -> Result<NodeIdx> {
        let requested = Self::record_size(num_children);
        if self.used + requested > self.capacity {
            error!(
                requested,
                used = self.used,
                capacity = self.capacity,
                "node arena exhausted"
            );
            return Err(Error::ArenaExhausted {
                requested,
                used: self.used,
                capacity: self.capacity,
            });
        }
        self.used += requested;

        let idx = NodeIdx(self.nodes.len() as u32);
        let start = self.edges.len() as u32;
        self.nodes.push(PackedNode {
            bits: 0,
            children: start,
        });
        self.edges.extend(std::iter::repeat_n(idx, num_children));
        Ok(idx)
    }

    #[inline(always)]
    pub(crate) fn get_node(&self, idx: NodeIdx) -> &PackedNode {
        &self.nodes[idx.index()]
    }

    #[inline(always)]
    pub(crate) fn get_node_mut(&mut self, idx: NodeIdx) -> &mut PackedNode {
        &mut self.nodes[idx.index()]
    }

    /// Points slot `slot` of `node`'s child run at `child`.
    #[inline(always)]
    pub(crate) fn set_child(&mut self, node: NodeIdx, slot: usize, child: NodeIdx) {
        let start = self.get_node(node).children as usize;
        self.edges[start + slot] = child;
    }

    #[inline(always)]
    pub(crate) fn child_at(&self, node: NodeIdx, slot: usize) -> NodeIdx {
        let start = self.get_node(node).children as usize;
        self.edges[start + slot]
    }

    pub fn contains(&self, idx: NodeIdx) -> bool {
        idx.index() < self.nodes.len()
    }

    /// Address of a node record, if it lives in this arena.
    pub(crate) fn address_of(&self, idx: NodeIdx) -> Option<usize> {
        self.contains(idx)
            .then(|| self.nodes.as_ptr() as usize + idx.index() * size_of::<PackedNode>())
    }

    /// Number of node records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bytes_used(&self) -> usize {
        self.used
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
