//! Longest tree paths matching a query.
//!
//! A match starts at every node carrying the query's first item (forward) or
//! last item (backward) and follows child or parent links for as long as the
//! neighbouring node carries the next query item. Items compare by equality.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::{NodeId, PredictionTree};
use crate::sequence::Item;

/// Which end of the query anchors a path match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchDirection {
    /// Start from the first query item and walk down through children.
    Forward,
    /// Start from the last query item and walk up through parents.
    Backward,
}

/// A run of consecutive tree nodes matching consecutive query items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Matched nodes in root-to-leaf order. Never empty.
    pub nodes: Vec<NodeId>,
}

impl PathMatch {
    /// Number of query items matched.
    pub fn matched(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest matched node.
    pub fn deepest(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

impl<T: Item> PredictionTree<T> {
    /// Every path matching `query` from its anchor end, longest first.
    ///
    /// Paths of equal length keep the arena order of their anchor node. An
    /// empty query, or one whose anchor item is absent from the tree, yields
    /// no matches.
    pub fn match_paths(&self, query: &[T], direction: MatchDirection) -> Vec<PathMatch> {
        let anchored = match direction {
            MatchDirection::Forward => query.split_first(),
            MatchDirection::Backward => query.split_last(),
        };
        let Some((anchor, rest)) = anchored else {
            return Vec::new();
        };

        let mut matches: Vec<PathMatch> = self
            .nodes_labelled(anchor)
            .map(|start| match direction {
                MatchDirection::Forward => self.extend_forward(start, rest),
                MatchDirection::Backward => self.extend_backward(start, rest),
            })
            .collect();
        matches.sort_by_key(|path| Reverse(path.matched()));
        matches
    }

    fn nodes_labelled<'a>(&'a self, item: &'a T) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.item() == Some(item))
            .map(|(index, _)| NodeId::new(index))
    }

    fn extend_forward(&self, start: NodeId, rest: &[T]) -> PathMatch {
        let mut nodes = vec![start];
        let mut current = start;
        for item in rest {
            match self.node(current).and_then(|node| node.child(item)) {
                Some(child) => {
                    nodes.push(child);
                    current = child;
                }
                None => break,
            }
        }
        PathMatch { nodes }
    }

    fn extend_backward(&self, start: NodeId, rest: &[T]) -> PathMatch {
        let mut nodes = vec![start];
        let mut upward = self.ancestors(start).skip(1);
        for item in rest.iter().rev() {
            match upward.next() {
                Some(parent) if self.node(parent).and_then(|node| node.item()) == Some(item) => {
                    nodes.push(parent)
                }
                _ => break,
            }
        }
        nodes.reverse();
        PathMatch { nodes }
    }
}
