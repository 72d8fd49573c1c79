//! Item and sequence identifiers shared by every structure in the crate.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A symbol that can appear in a training or query sequence.
///
/// Blanket-implemented for every type that is cloneable, hashable, totally
/// ordered and shareable across threads. The ordering is only used to break
/// score ties deterministically.
pub trait Item: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

impl<T> Item for T where T: Clone + Eq + Hash + Ord + fmt::Debug + Send + Sync {}

/// Identifier assigned to a training sequence, in arrival order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(usize);

impl SequenceId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SequenceId> for usize {
    fn from(id: SequenceId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_order_by_arrival() {
        let first = SequenceId::new(0);
        let second = SequenceId::new(1);
        assert!(first < second);
        assert_eq!(second.index(), 1);
        assert_eq!(usize::from(second), 1);
        assert_eq!(second.to_string(), "1");
    }

    #[test]
    fn sequence_id_serialises_as_plain_integer() {
        let json = serde_json::to_string(&SequenceId::new(7)).expect("serialise");
        assert_eq!(json, "7");
    }
}
