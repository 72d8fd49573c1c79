//! Thread-shareable handle: one writer at a time, any number of readers.
//!
//! A `train` call holds the write lock for its whole insertion, so readers
//! observe either the state before it or the state after it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cpt::{CompactPredictionTree, CptStats};
use crate::error::{CptError, Result};
use crate::predictor::{Prediction, PredictionConfig};
use crate::sequence::{Item, SequenceId};
use crate::tree::{MatchDirection, PathMatch};

pub struct SharedCpt<T> {
    inner: Arc<RwLock<CompactPredictionTree<T>>>,
}

impl<T> Clone for SharedCpt<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Item> Default for SharedCpt<T> {
    fn default() -> Self {
        Self::new(CompactPredictionTree::new())
    }
}

impl<T: Item> From<CompactPredictionTree<T>> for SharedCpt<T> {
    fn from(cpt: CompactPredictionTree<T>) -> Self {
        Self::new(cpt)
    }
}

impl<T: Item> SharedCpt<T> {
    pub fn new(cpt: CompactPredictionTree<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cpt)),
        }
    }

    pub fn train(&self, sequence: &[T]) -> Result<SequenceId> {
        // Reject before queueing behind other writers.
        if sequence.is_empty() {
            return Err(CptError::InvalidInput(
                "cannot train on an empty sequence".to_string(),
            ));
        }
        self.inner.write().train(sequence)
    }

    pub fn match_sequence(&self, query: &[T]) -> Result<Vec<T>> {
        self.inner.read().match_sequence(query)
    }

    pub fn predict(&self, query: &[T]) -> Result<Vec<Prediction<T>>> {
        self.inner.read().predict(query)
    }

    pub fn match_paths(&self, query: &[T], direction: MatchDirection) -> Result<Vec<PathMatch>> {
        self.inner.read().match_paths(query, direction)
    }

    pub fn set_config(&self, config: PredictionConfig) -> Result<()> {
        self.inner.write().set_config(config)
    }

    pub fn stats(&self) -> CptStats {
        self.inner.read().stats()
    }

    /// Run `f` against a consistent view of the model.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&CompactPredictionTree<T>) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn export(&self) -> String {
        self.inner.read().export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_one_model() {
        let shared = SharedCpt::default();
        let other = shared.clone();
        shared.train(&[1u32, 2]).unwrap();

        assert_eq!(other.stats().sequences, 1);
        assert_eq!(other.match_sequence(&[1]).unwrap(), vec![2]);
    }

    #[test]
    fn concurrent_writers_get_distinct_ids() {
        let shared: SharedCpt<u32> = SharedCpt::default();
        thread::scope(|scope| {
            for worker in 0..4u32 {
                let shared = shared.clone();
                scope.spawn(move || {
                    for step in 0..25u32 {
                        shared.train(&[worker, step, worker + step]).unwrap();
                    }
                });
            }
        });

        shared.with_snapshot(|cpt| {
            assert_eq!(cpt.sequence_count(), 100);
            assert_eq!(cpt.lookup_table().len(), 100);
        });
    }

    #[test]
    fn exports_under_the_read_lock() {
        let shared = SharedCpt::default();
        shared.train(&[('a', 1u8), ('b', 2)]).unwrap();
        let dot = shared.export();
        assert!(dot.contains("2 [label=\"('b', 2)\"]"));
        assert_eq!(dot, shared.with_snapshot(|cpt| cpt.export()));
    }

    #[test]
    fn empty_sequence_is_rejected_without_locking() {
        let shared: SharedCpt<u32> = SharedCpt::default();
        assert!(matches!(shared.train(&[]), Err(CptError::InvalidInput(_))));
    }
}
