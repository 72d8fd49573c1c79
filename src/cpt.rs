//! The prediction engine value: tree, inverted index and lookup table kept in step.
//!
//! Training lives in [`crate::trainer`], matching in [`crate::predictor`] and
//! graph output in [`crate::export`]; all of them are inherent methods on
//! [`CompactPredictionTree`].

use log::debug;
use serde::Serialize;

use crate::error::{CptError, Result};
use crate::inverted_index::InvertedIndex;
use crate::lookup_table::LookupTable;
use crate::predictor::PredictionConfig;
use crate::sequence::{Item, SequenceId};
use crate::tree::{MatchDirection, PathMatch, PredictionTree};

/// Compact Prediction Tree over items of type `T`.
#[derive(Debug, Clone)]
pub struct CompactPredictionTree<T> {
    pub(crate) tree: PredictionTree<T>,
    pub(crate) index: InvertedIndex<T>,
    pub(crate) lookup: LookupTable,
    pub(crate) config: PredictionConfig,
}

/// Size summary of a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CptStats {
    pub sequences: usize,
    pub nodes: usize,
    pub alphabet: usize,
    pub depth: usize,
}

impl<T: Item> Default for CompactPredictionTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> CompactPredictionTree<T> {
    /// Empty model with the default [`PredictionConfig`].
    pub fn new() -> Self {
        Self {
            tree: PredictionTree::new(),
            index: InvertedIndex::new(),
            lookup: LookupTable::new(),
            config: PredictionConfig::default(),
        }
    }

    pub fn with_config(config: PredictionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Replace the prediction settings. Trained state is untouched.
    pub fn set_config(&mut self, config: PredictionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn tree(&self) -> &PredictionTree<T> {
        &self.tree
    }

    pub fn inverted_index(&self) -> &InvertedIndex<T> {
        &self.index
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup
    }

    /// Number of successful `train` calls so far; also the next id to be assigned.
    pub fn sequence_count(&self) -> usize {
        self.lookup.len()
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Number of distinct items seen during training.
    pub fn alphabet_len(&self) -> usize {
        self.index.len()
    }

    /// Rebuild a trained sequence from its terminal node.
    pub fn sequence(&self, id: SequenceId) -> Result<Vec<T>> {
        let terminal = self.lookup.resolve(id)?;
        Ok(self.tree.path_to(terminal))
    }

    /// Tree paths matching `query` from its first (forward) or last (backward) item, longest first.
    pub fn match_paths(&self, query: &[T], direction: MatchDirection) -> Result<Vec<PathMatch>> {
        if query.is_empty() {
            return Err(CptError::InvalidInput(
                "cannot match an empty query".to_string(),
            ));
        }
        let matches = self.tree.match_paths(query, direction);
        debug!(
            "{:?} path match of {} items: {} paths, longest {}",
            direction,
            query.len(),
            matches.len(),
            matches.first().map_or(0, PathMatch::matched)
        );
        Ok(matches)
    }

    pub fn stats(&self) -> CptStats {
        CptStats {
            sequences: self.sequence_count(),
            nodes: self.node_count(),
            alphabet: self.alphabet_len(),
            depth: self.tree.depth(),
        }
    }
}
