use crate::sequence::SequenceId;

/// Errors returned by the prediction tree and its auxiliary structures.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CptError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown sequence: {0}")]
    UnknownSequence(SequenceId),
    #[error("Sequence {0} is already bound in the lookup table")]
    DuplicateBinding(SequenceId),
    #[error("Sequence {id} bound out of order, expected {expected}")]
    OutOfOrderBinding { id: SequenceId, expected: SequenceId },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CptError>;
