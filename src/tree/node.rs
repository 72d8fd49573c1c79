//! Arena node of the prediction tree.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::sequence::SequenceId;

/// Index of a node inside its tree's arena. Only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The label-less root every tree starts with.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A node of the prediction tree.
///
/// Children are keyed by the item on the edge leading to them and keep their
/// first-insertion order. The parent link is a plain arena index used for
/// upward walks only.
#[derive(Debug, Clone)]
pub struct Node<T> {
    item: Option<T>,
    parent: Option<NodeId>,
    children: IndexMap<T, NodeId>,
    terminals: Vec<SequenceId>,
}

impl<T: Hash + Eq> Node<T> {
    pub(crate) fn root() -> Self {
        Self {
            item: None,
            parent: None,
            children: IndexMap::new(),
            terminals: Vec::new(),
        }
    }

    pub(crate) fn with_parent(item: T, parent: NodeId) -> Self {
        Self {
            item: Some(item),
            parent: Some(parent),
            children: IndexMap::new(),
            terminals: Vec::new(),
        }
    }

    /// Item on the edge from the parent; `None` only for the root.
    pub fn item(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Child reached through `item`, if one was ever inserted.
    pub fn child(&self, item: &T) -> Option<NodeId> {
        self.children.get(item).copied()
    }

    /// Child ids in first-insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Ids of the trained sequences whose last item lands on this node, ascending.
    pub fn terminals(&self) -> &[SequenceId] {
        &self.terminals
    }

    pub(crate) fn attach_child(&mut self, item: T, child: NodeId) {
        self.children.insert(item, child);
    }

    pub(crate) fn mark_terminal(&mut self, id: SequenceId) {
        self.terminals.push(id);
    }
}
