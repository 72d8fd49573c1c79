//! Training: the only mutating entry point into the model.

use std::collections::HashSet;

use log::{debug, info};

use crate::cpt::CompactPredictionTree;
use crate::error::{CptError, Result};
use crate::sequence::{Item, SequenceId};

impl<T: Item> CompactPredictionTree<T> {
    /// Learn one sequence and return the id assigned to it.
    ///
    /// The id is the number of sequences trained before this call. The
    /// sequence is inserted into the tree, every distinct item is recorded in
    /// the inverted index, and the terminal node is bound in the lookup table.
    /// An empty sequence is rejected before anything is mutated.
    pub fn train(&mut self, sequence: &[T]) -> Result<SequenceId> {
        if sequence.is_empty() {
            return Err(CptError::InvalidInput(
                "cannot train on an empty sequence".to_string(),
            ));
        }

        let id = self.lookup.next_id();
        let terminal = self.tree.insert(sequence, id)?;

        let mut distinct: HashSet<&T> = HashSet::with_capacity(sequence.len());
        for item in sequence {
            if distinct.insert(item) {
                self.index.record(item.clone(), id);
            }
        }
        self.lookup.bind(id, terminal)?;

        debug!(
            "Trained sequence {} ({} items, {} distinct) ending at {}",
            id,
            sequence.len(),
            distinct.len(),
            terminal
        );
        Ok(id)
    }

    /// Train every sequence in order, returning the assigned ids.
    ///
    /// Stops at the first empty sequence; the sequences before it stay trained.
    pub fn train_all<I, S>(&mut self, sequences: I) -> Result<Vec<SequenceId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[T]>,
    {
        let mut ids = Vec::new();
        for sequence in sequences {
            ids.push(self.train(sequence.as_ref())?);
        }
        info!(
            "Trained {} sequences ({} total, {} nodes)",
            ids.len(),
            self.sequence_count(),
            self.node_count()
        );
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_ids_in_arrival_order() {
        let mut cpt = CompactPredictionTree::new();
        assert_eq!(cpt.train(&[1, 2, 3]).unwrap(), SequenceId::new(0));
        assert_eq!(cpt.train(&[1, 2, 3]).unwrap(), SequenceId::new(1));
        assert_eq!(cpt.train(&[7]).unwrap(), SequenceId::new(2));
        assert_eq!(cpt.sequence_count(), 3);
        assert_eq!(cpt.lookup_table().next_id(), SequenceId::new(3));
    }

    #[test]
    fn indexes_each_distinct_item_once() {
        let mut cpt = CompactPredictionTree::new();
        let id = cpt.train(&["a", "b", "a"]).unwrap();

        let index = cpt.inverted_index();
        assert_eq!(index.len(), 2);
        assert!(index.candidates(&"a").contains(&id));
        assert!(index.candidates(&"b").contains(&id));
    }

    #[test]
    fn empty_sequence_leaves_model_untouched() {
        let mut cpt: CompactPredictionTree<u8> = CompactPredictionTree::new();
        cpt.train(&[1, 2]).unwrap();
        let before = cpt.stats();

        let err = cpt.train(&[]).unwrap_err();
        assert!(matches!(err, CptError::InvalidInput(_)));
        assert_eq!(cpt.stats(), before);
        assert_eq!(cpt.lookup_table().next_id(), SequenceId::new(1));
    }

    #[test]
    fn train_all_stops_at_first_invalid_sequence() {
        let mut cpt: CompactPredictionTree<u32> = CompactPredictionTree::new();
        let batch: Vec<Vec<u32>> = vec![vec![1, 2], vec![], vec![3]];

        assert!(cpt.train_all(&batch).is_err());
        assert_eq!(cpt.sequence_count(), 1);
        assert_eq!(cpt.sequence(SequenceId::new(0)).unwrap(), vec![1, 2]);
    }
}
