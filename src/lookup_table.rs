//! Sequence id -> terminal node table.
//!
//! Ids are assigned densely in arrival order, so the table is a plain vector
//! indexed by id.

use crate::error::{CptError, Result};
use crate::sequence::SequenceId;
use crate::tree::NodeId;

#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    terminals: Vec<NodeId>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to its terminal node. Ids must arrive in order, each exactly once.
    pub fn bind(&mut self, id: SequenceId, node: NodeId) -> Result<()> {
        let next = self.terminals.len();
        if id.index() < next {
            return Err(CptError::DuplicateBinding(id));
        }
        if id.index() > next {
            return Err(CptError::OutOfOrderBinding {
                id,
                expected: SequenceId::new(next),
            });
        }
        self.terminals.push(node);
        Ok(())
    }

    pub fn resolve(&self, id: SequenceId) -> Result<NodeId> {
        self.terminals
            .get(id.index())
            .copied()
            .ok_or(CptError::UnknownSequence(id))
    }

    /// Id the next bind must use.
    pub fn next_id(&self) -> SequenceId {
        SequenceId::new(self.terminals.len())
    }

    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    /// All bindings in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SequenceId, NodeId)> + '_ {
        self.terminals
            .iter()
            .enumerate()
            .map(|(index, &node)| (SequenceId::new(index), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_and_resolves_in_order() {
        let mut table = LookupTable::new();
        table.bind(SequenceId::new(0), NodeId::new(3)).unwrap();
        table.bind(SequenceId::new(1), NodeId::new(3)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.next_id(), SequenceId::new(2));
        assert_eq!(table.resolve(SequenceId::new(1)), Ok(NodeId::new(3)));
    }

    #[test]
    fn rejects_second_binding() {
        let mut table = LookupTable::new();
        table.bind(SequenceId::new(0), NodeId::new(1)).unwrap();
        assert_eq!(
            table.bind(SequenceId::new(0), NodeId::new(2)),
            Err(CptError::DuplicateBinding(SequenceId::new(0)))
        );
        assert_eq!(table.resolve(SequenceId::new(0)), Ok(NodeId::new(1)));
    }

    #[test]
    fn rejects_binding_past_next_id() {
        let mut table = LookupTable::new();
        table.bind(SequenceId::new(0), NodeId::new(1)).unwrap();
        assert_eq!(
            table.bind(SequenceId::new(3), NodeId::new(2)),
            Err(CptError::OutOfOrderBinding {
                id: SequenceId::new(3),
                expected: SequenceId::new(1),
            })
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.next_id(), SequenceId::new(1));
    }

    #[test]
    fn unbound_id_is_unknown() {
        let table = LookupTable::new();
        assert_eq!(
            table.resolve(SequenceId::new(4)),
            Err(CptError::UnknownSequence(SequenceId::new(4)))
        );
    }
}
