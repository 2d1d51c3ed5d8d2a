//! Module: serialize
//! Responsibility: CBOR encoding for wire-facing structs such as cursor
//! tokens, with size-bounded decoding of untrusted input.
//! Does not own: token framing or hex rendering (see `db::cursor`).

mod cbor;


use thiserror::Error as ThisError;

pub use cbor::{deserialize_bounded, serialize};

///
/// SerializeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },
}
