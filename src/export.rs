//! Graph output of the learned tree for inspection.
//!
//! Node identifiers are positions in a breadth-first walk from the root with
//! siblings in first-insertion order, so output depends only on the training
//! history and never on hash iteration order.

use std::fmt::Write as _;

use serde_json::{json, Value};

use crate::cpt::CompactPredictionTree;
use crate::sequence::Item;
use crate::tree::{NodeId, PredictionTree};

/// Breadth-first numbering of a tree's nodes.
struct Numbering {
    order: Vec<NodeId>,
    position: Vec<usize>,
}

impl Numbering {
    fn new<T: Item>(tree: &PredictionTree<T>) -> Self {
        let order = tree.breadth_first();
        let mut position = vec![0; tree.len()];
        for (pos, id) in order.iter().enumerate() {
            position[id.index()] = pos;
        }
        Self { order, position }
    }

    fn of(&self, id: NodeId) -> usize {
        self.position[id.index()]
    }
}

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn debug_label<T: Item>(item: &T) -> String {
    format!("{:?}", item)
}

impl<T: Item> CompactPredictionTree<T> {
    /// Graphviz description of the tree: a header, one `id [label="..."]` line
    /// per node (the root has an empty label), then one `parent -> child` line per edge.
    ///
    /// Labels are the `Debug` form of each item; use
    /// [`export_labelled`](Self::export_labelled) for another rendering.
    pub fn export(&self) -> String {
        self.export_labelled(debug_label::<T>)
    }

    /// [`export`](Self::export) with node labels produced by `label`.
    pub fn export_labelled(&self, label: impl Fn(&T) -> String) -> String {
        let numbering = Numbering::new(&self.tree);
        let mut dot = String::from("digraph CPT {\n");
        self.write_nodes(&mut dot, &numbering, &label);
        self.write_edges(&mut dot, &numbering);
        dot.push_str("}\n");
        dot
    }

    /// [`export`](Self::export) plus one box per trained sequence pointing at its terminal node.
    pub fn export_with_sequences(&self) -> String {
        let numbering = Numbering::new(&self.tree);
        let mut dot = String::from("digraph CPT {\n");
        self.write_nodes(&mut dot, &numbering, &debug_label::<T>);
        self.write_edges(&mut dot, &numbering);
        for (id, terminal) in self.lookup.iter() {
            let _ = writeln!(dot, "seq{} [label=\"seq {}\", shape=box]", id, id);
            let _ = writeln!(dot, "seq{} -> {}", id, numbering.of(terminal));
        }
        dot.push_str("}\n");
        dot
    }

    /// JSON edge list with node attributes, numbered like [`export`](Self::export).
    pub fn export_json(&self) -> Value {
        let numbering = Numbering::new(&self.tree);
        let mut nodes = Vec::with_capacity(numbering.order.len());
        let mut edges = Vec::new();
        for &id in &numbering.order {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            nodes.push(json!({
                "id": numbering.of(id),
                "label": node.item().map(debug_label::<T>),
                "terminals": node.terminals(),
            }));
            if let Some(parent) = node.parent() {
                edges.push(json!({"source": numbering.of(parent), "target": numbering.of(id)}));
            }
        }
        let sequences: Vec<Value> = self
            .lookup
            .iter()
            .map(|(id, terminal)| json!({"id": id, "node": numbering.of(terminal)}))
            .collect();
        json!({"nodes": nodes, "edges": edges, "sequences": sequences})
    }

    fn write_nodes(&self, dot: &mut String, numbering: &Numbering, label: &impl Fn(&T) -> String) {
        for &id in &numbering.order {
            let text = self
                .tree
                .node(id)
                .and_then(|node| node.item())
                .map(|item| escape_label(&label(item)))
                .unwrap_or_default();
            let _ = writeln!(dot, "{} [label=\"{}\"]", numbering.of(id), text);
        }
    }

    fn write_edges(&self, dot: &mut String, numbering: &Numbering) {
        for &id in &numbering.order {
            if let Some(parent) = self.tree.node(id).and_then(|node| node.parent()) {
                let _ = writeln!(dot, "{} -> {}", numbering.of(parent), numbering.of(id));
            }
        }
    }
}
