use crate::{db::Direction, value::ValueTag};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Caller-constructed tree or request violates an execution precondition.
/// Shape errors are reported before any store access.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("merge children disagree on ordering: expected {expected}, found {found}")]
    InconsistentOrdering {
        expected: Direction,
        found: Direction,
    },

    #[error("child stream emitted out of order under {operator}")]
    OutOfOrder { operator: &'static str },

    #[error(
        "children of {operator} lead with different sort value kinds: expected {}, found {}",
        expected.label(),
        found.label()
    )]
    MixedSortKinds {
        operator: &'static str,
        expected: ValueTag,
        found: ValueTag,
    },

    #[error("invalid scan tree: {reason}")]
    InvalidTree { reason: &'static str },

    #[error("page size {requested} outside 1..={max}")]
    InvalidPageSize { requested: usize, max: usize },
}
