//! Item -> sequence id index used to shortlist candidates without scanning the tree.

use std::collections::{BTreeSet, HashMap};

use crate::sequence::{Item, SequenceId};

static EMPTY: BTreeSet<SequenceId> = BTreeSet::new();

/// Maps each item to the ordered set of training sequences containing it.
#[derive(Debug, Clone)]
pub struct InvertedIndex<T> {
    entries: HashMap<T, BTreeSet<SequenceId>>,
}

impl<T: Item> Default for InvertedIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> InvertedIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add `id` under `item`. Recording the same pair twice is a no-op.
    pub fn record(&mut self, item: T, id: SequenceId) {
        self.entries.entry(item).or_default().insert(id);
    }

    /// Sequences containing `item`; empty for items never trained.
    pub fn candidates(&self, item: &T) -> &BTreeSet<SequenceId> {
        self.entries.get(item).unwrap_or(&EMPTY)
    }

    /// Number of training sequences containing `item`.
    pub fn support(&self, item: &T) -> usize {
        self.candidates(item).len()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.entries.contains_key(item)
    }

    /// Number of distinct items seen during training.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequences containing every item of `items`. Empty when `items` is empty.
    pub fn intersection<'a, I>(&self, items: I) -> BTreeSet<SequenceId>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        // Start from the smallest set so the retain passes stay cheap.
        let mut sets: Vec<&BTreeSet<SequenceId>> =
            items.into_iter().map(|item| self.candidates(item)).collect();
        sets.sort_by_key(|set| set.len());

        let mut iter = sets.into_iter();
        let mut result = match iter.next() {
            Some(first) => first.clone(),
            None => return BTreeSet::new(),
        };
        for set in iter {
            if result.is_empty() {
                break;
            }
            result.retain(|id| set.contains(id));
        }
        result
    }

    /// Sequences containing at least one item of `items`.
    pub fn union<'a, I>(&self, items: I) -> BTreeSet<SequenceId>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut result = BTreeSet::new();
        for item in items {
            result.extend(self.candidates(item).iter().copied());
        }
        result
    }
}
