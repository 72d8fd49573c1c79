//! cpt_rs: Compact Prediction Tree
//!
//! Learns from training sequences of discrete items and, given a partial
//! query, ranks the items most likely to come next. Training inserts each
//! sequence into a shared-prefix tree while keeping an inverted index
//! (item -> sequences) and a lookup table (sequence -> terminal node), so
//! prediction only touches the sequences that share items with the query.
//!
//! ```
//! use cpt_rs::CompactPredictionTree;
//!
//! let mut cpt = CompactPredictionTree::new();
//! cpt.train(&[1, 2, 3]).unwrap();
//! cpt.train(&[1, 2, 5]).unwrap();
//! cpt.train(&[1, 5, 8]).unwrap();
//! assert_eq!(cpt.match_sequence(&[1, 2, 4]).unwrap(), vec![3, 5]);
//! ```

pub mod cpt;
pub mod error;
mod export;
pub mod inverted_index;
pub mod lookup_table;
pub mod predictor;
pub mod sequence;
pub mod shared;
mod trainer;
pub mod tree;

pub use cpt::{CompactPredictionTree, CptStats};
pub use error::{CptError, Result};
pub use inverted_index::InvertedIndex;
pub use lookup_table::LookupTable;
pub use predictor::{Prediction, PredictionConfig, DEFAULT_MAX_SUPPORT_RATIO};
pub use sequence::{Item, SequenceId};
pub use shared::SharedCpt;
pub use tree::{MatchDirection, Node, NodeId, PathMatch, PredictionTree};
