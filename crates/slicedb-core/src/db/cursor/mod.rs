//! Module: cursor
//! Responsibility: resumable tree positions and their opaque token form.
//! Does not own: tree shape. The planner supplies the same tree again on
//! resume; a token only carries position plus a fingerprint of the shape
//! it was taken from.

mod hex;
mod token;


use crate::{
    db::{key::RawKey, stream::{MergeOperator, MergePoint}},
    serialize::SerializeError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

pub use hex::{decode_hex, encode_hex};
pub use token::{CursorToken, TreeSignature};

///
/// CursorNode
///
/// Position of one node of an operator tree.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CursorNode {
    /// Nothing emitted yet.
    Start,

    /// Leaf position: the raw key of the last emitted column.
    After(RawKey),

    /// Merge position: last emitted merge point plus one position per child,
    /// in child order.
    Merge {
        operator: MergeOperator,
        last: Option<MergePoint>,
        children: Vec<Self>,
    },

    /// The node was exhausted.
    Done,
}

impl CursorNode {
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

///
/// CursorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    /// Corrupt, foreign or mismatched token. Resume never partially applies.
    #[error("invalid cursor: {reason}")]
    Invalid { reason: String },

    #[error("failed to encode cursor: {0}")]
    Encode(SerializeError),
}

impl CursorError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
