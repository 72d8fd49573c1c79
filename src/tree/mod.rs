//! Shared-prefix trie over trained sequences, stored as an arena of nodes.
//!
//! Every sequence is a path from the label-less root. Sequences sharing a
//! prefix share the nodes of that prefix, so the tree grows linearly in the
//! number of distinct prefixes. Nodes are never removed or relabelled.

mod node;
mod paths;

use std::collections::VecDeque;

pub use self::node::{Node, NodeId};
pub use self::paths::{MatchDirection, PathMatch};

use crate::error::{CptError, Result};
use crate::sequence::{Item, SequenceId};

#[derive(Debug, Clone)]
pub struct PredictionTree<T> {
    nodes: Vec<Node<T>>,
}

impl<T: Item> Default for PredictionTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> PredictionTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds its root; this is true only before any insertion.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Insert `sequence` under `id` and return the terminal node.
    ///
    /// Existing children are followed for every item already present on the
    /// path; missing ones are created. The id is recorded on the terminal node.
    pub fn insert(&mut self, sequence: &[T], id: SequenceId) -> Result<NodeId> {
        if sequence.is_empty() {
            return Err(CptError::InvalidInput(
                "cannot insert an empty sequence".to_string(),
            ));
        }

        let mut current = NodeId::ROOT;
        for item in sequence {
            current = self.child_or_insert(current, item);
        }
        self.nodes[current.index()].mark_terminal(id);
        Ok(current)
    }

    fn child_or_insert(&mut self, parent: NodeId, item: &T) -> NodeId {
        if let Some(existing) = self.nodes[parent.index()].child(item) {
            return existing;
        }
        let child = NodeId::new(self.nodes.len());
        self.nodes.push(Node::with_parent(item.clone(), parent));
        self.nodes[parent.index()].attach_child(item.clone(), child);
        child
    }

    /// Walk from `id` towards the root, yielding each non-root node id.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Items on the path from the root to `id`, in root-to-node order.
    pub fn path_to(&self, id: NodeId) -> Vec<T> {
        let mut items: Vec<T> = self
            .ancestors(id)
            .filter_map(|node_id| self.node(node_id).and_then(|n| n.item().cloned()))
            .collect();
        items.reverse();
        items
    }

    /// Follow `sequence` from the root without inserting anything.
    pub fn find(&self, sequence: &[T]) -> Option<NodeId> {
        sequence.iter().try_fold(NodeId::ROOT, |current, item| {
            self.node(current).and_then(|node| node.child(item))
        })
    }

    /// Node ids in breadth-first order from the root, siblings in first-insertion order.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([NodeId::ROOT]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            if let Some(node) = self.node(id) {
                queue.extend(node.children());
            }
        }
        order
    }

    /// Length of the longest root-to-node path.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut deepest = 0;
        for id in self.breadth_first() {
            if let Some(parent) = self.nodes[id.index()].parent() {
                depths[id.index()] = depths[parent.index()] + 1;
                deepest = deepest.max(depths[id.index()]);
            }
        }
        deepest
    }
}

/// Upward walk produced by [`PredictionTree::ancestors`]. Stops before the root.
pub struct Ancestors<'a, T> {
    tree: &'a PredictionTree<T>,
    next: Option<NodeId>,
}

impl<'a, T: Item> Iterator for Ancestors<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let node = self.tree.node(current)?;
        match node.parent() {
            Some(parent) => {
                self.next = Some(parent);
                Some(current)
            }
            None => {
                self.next = None;
                None
            }
        }
    }
}
