//! Matching: noise reduction, candidate retrieval, consequent extraction, scoring and ranking.
//!
//! Given a query, the items that appear in too large a share of the training
//! sequences are dropped, the remaining items shortlist candidate sequences
//! through the inverted index, and every candidate contributes the items that
//! follow its last match with the query. A candidate's contribution is
//!
//! ```text
//! weight = (matched query items / candidate length) / distinct consequent items
//! ```
//!
//! added to each of its consequent items. Items are ranked by total weight,
//! ties going to the smaller item.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::cpt::CompactPredictionTree;
use crate::error::{CptError, Result};
use crate::sequence::{Item, SequenceId};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default support ratio above which a query item is treated as noise.
pub const DEFAULT_MAX_SUPPORT_RATIO: f64 = 0.5;

/// Options that change how queries are matched against the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Drop query items contained in more than `max_support_ratio` of the training sequences.
    pub noise_reduction: bool,
    /// Support ratio threshold used by noise reduction, in `(0, 1]`.
    pub max_support_ratio: f64,
    /// Fall back to sequences containing any query item when none contains all of them.
    pub union_fallback: bool,
    /// Only use the last `n` items of a query to find candidates. Items of the
    /// whole query are still excluded from the predictions.
    pub prefix_length: Option<usize>,
    /// Extract candidate consequents on the rayon pool (requires the `parallel` feature).
    pub use_threads: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            noise_reduction: true,
            max_support_ratio: DEFAULT_MAX_SUPPORT_RATIO,
            union_fallback: true,
            prefix_length: None,
            use_threads: false,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_support_ratio > 0.0 && self.max_support_ratio <= 1.0) {
            return Err(CptError::InvalidConfig(format!(
                "max_support_ratio must be in (0, 1], got {}",
                self.max_support_ratio
            )));
        }
        if self.prefix_length == Some(0) {
            return Err(CptError::InvalidConfig(
                "prefix_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CptError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// A ranked prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction<T> {
    pub item: T,
    /// Accumulated weight from every candidate proposing the item.
    pub score: f64,
    /// Number of candidates whose consequent contains the item.
    pub support: usize,
    /// `support` divided by the number of training sequences containing the item.
    pub confidence: f64,
}

/// What one candidate sequence adds to the scores.
struct Contribution<T> {
    consequent: Vec<T>,
    weight: f64,
}

struct Tally {
    score: f64,
    support: usize,
}

impl<T: Item> CompactPredictionTree<T> {
    /// Predicted next items for `query`, best first. Empty when nothing was learned that matches.
    pub fn match_sequence(&self, query: &[T]) -> Result<Vec<T>> {
        Ok(self
            .predict(query)?
            .into_iter()
            .map(|prediction| prediction.item)
            .collect())
    }

    /// Like [`match_sequence`](Self::match_sequence) but keeps the score of each item.
    pub fn predict(&self, query: &[T]) -> Result<Vec<Prediction<T>>> {
        if query.is_empty() {
            return Err(CptError::InvalidInput(
                "cannot predict from an empty query".to_string(),
            ));
        }
        let window = match self.config.prefix_length {
            Some(len) if len < query.len() => &query[query.len() - len..],
            _ => query,
        };

        let known = self.known_items(window);
        if known.is_empty() {
            debug!("No query item was seen during training");
            return Ok(Vec::new());
        }

        let working = self.reduce_noise(known);
        let candidates = self.retrieve_candidates(&working);
        if candidates.is_empty() {
            debug!("No candidate sequence for {} query items", working.len());
            return Ok(Vec::new());
        }
        debug!(
            "Matching {} working items against {} candidates",
            working.len(),
            candidates.len()
        );

        let excluded: HashSet<&T> = query.iter().collect();
        let contributions = self.contributions(&candidates, &working, &excluded)?;
        Ok(self.rank(contributions))
    }

    /// Distinct query items that occur in at least one training sequence, ordered by last occurrence.
    fn known_items<'q>(&self, query: &'q [T]) -> Vec<&'q T> {
        let mut seen = HashSet::with_capacity(query.len());
        let mut known: Vec<&T> = query
            .iter()
            .rev()
            .filter(|item| seen.insert(*item) && self.index.contains(item))
            .collect();
        known.reverse();
        known
    }

    /// Drop items too common to discriminate; keep everything when all of them are.
    fn reduce_noise<'q>(&self, known: Vec<&'q T>) -> Vec<&'q T> {
        if !self.config.noise_reduction {
            return known;
        }
        let total = self.sequence_count() as f64;
        let ratio = self.config.max_support_ratio;
        let reduced: Vec<&T> = known
            .iter()
            .copied()
            .filter(|item| self.index.support(item) as f64 / total <= ratio)
            .collect();

        if reduced.is_empty() {
            debug!(
                "Noise reduction removed all {} query items, using them unreduced",
                known.len()
            );
            known
        } else {
            trace!("Noise reduction kept {} of {} items", reduced.len(), known.len());
            reduced
        }
    }

    fn retrieve_candidates(&self, working: &[&T]) -> BTreeSet<SequenceId> {
        let strict = self.index.intersection(working.iter().copied());
        if !strict.is_empty() || !self.config.union_fallback {
            return strict;
        }
        let loose = self.index.union(working.iter().copied());
        debug!(
            "No sequence contains every query item, relaxed to {} sequences containing any",
            loose.len()
        );
        loose
    }

    fn contributions(
        &self,
        candidates: &BTreeSet<SequenceId>,
        working: &[&T],
        excluded: &HashSet<&T>,
    ) -> Result<Vec<Contribution<T>>> {
        let ids: Vec<SequenceId> = candidates.iter().copied().collect();
        let extract = |&id: &SequenceId| self.contribution(id, working, excluded);

        #[cfg(feature = "parallel")]
        let results: Vec<Result<Option<Contribution<T>>>> = if self.config.use_threads {
            ids.par_iter().map(extract).collect()
        } else {
            ids.iter().map(extract).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<Option<Contribution<T>>>> = {
            if self.config.use_threads {
                use log::warn;
                warn!(
                    "Threaded prediction requested, but the 'parallel' feature is not enabled; falling back to sequential mode"
                );
            }
            ids.iter().map(extract).collect()
        };

        let mut contributions = Vec::with_capacity(results.len());
        for result in results {
            if let Some(contribution) = result? {
                contributions.push(contribution);
            }
        }
        Ok(contributions)
    }

    /// Consequent and weight of one candidate, or `None` if it has nothing to offer.
    fn contribution(
        &self,
        id: SequenceId,
        working: &[&T],
        excluded: &HashSet<&T>,
    ) -> Result<Option<Contribution<T>>> {
        let sequence = self.sequence(id)?;
        let present: HashSet<&T> = sequence.iter().collect();

        let match_count = working.iter().filter(|item| present.contains(*item)).count();
        let anchor = match working.iter().rev().find(|item| present.contains(*item)) {
            Some(anchor) => *anchor,
            None => return Ok(None),
        };
        let position = match sequence.iter().rposition(|item| item == anchor) {
            Some(position) => position,
            None => return Ok(None),
        };

        let mut seen = HashSet::new();
        let consequent: Vec<T> = sequence[position + 1..]
            .iter()
            .filter(|item| !excluded.contains(item) && seen.insert(*item))
            .cloned()
            .collect();
        if consequent.is_empty() {
            trace!("Sequence {} has no consequent after {:?}", id, anchor);
            return Ok(None);
        }

        let weight =
            match_count as f64 / sequence.len() as f64 / consequent.len() as f64;
        trace!(
            "Sequence {} matched {} items, consequent {:?}, weight {:.4}",
            id,
            match_count,
            consequent,
            weight
        );
        Ok(Some(Contribution { consequent, weight }))
    }

    fn rank(&self, contributions: Vec<Contribution<T>>) -> Vec<Prediction<T>> {
        let mut tallies: HashMap<T, Tally> = HashMap::new();
        for contribution in contributions {
            for item in contribution.consequent {
                let tally = tallies.entry(item).or_insert(Tally {
                    score: 0.0,
                    support: 0,
                });
                tally.score += contribution.weight;
                tally.support += 1;
            }
        }

        let mut predictions: Vec<Prediction<T>> = tallies
            .into_iter()
            .map(|(item, tally)| {
                let containing = self.index.support(&item).max(1);
                Prediction {
                    confidence: tally.support as f64 / containing as f64,
                    item,
                    score: tally.score,
                    support: tally.support,
                }
            })
            .collect();
        predictions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.item.cmp(&b.item)));
        predictions
    }
}
