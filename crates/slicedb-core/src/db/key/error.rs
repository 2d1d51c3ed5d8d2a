use thiserror::Error as ThisError;

// Stable corruption reasons for composite key and column decode.
pub(crate) const ERR_TRUNCATED: &str = "truncated component";
pub(crate) const ERR_INVALID_TAG: &str = "invalid kind tag";
pub(crate) const ERR_INVALID_EQUALITY: &str = "invalid equality marker";
pub(crate) const ERR_INVALID_ESCAPE: &str = "invalid escape sequence";
pub(crate) const ERR_INVALID_BOOL: &str = "invalid bool payload";
pub(crate) const ERR_INVALID_UTF8: &str = "text payload is not valid utf-8";

///
/// CodecError
///
/// Failure to decode raw key or column bytes. Local to the one column that
/// produced it; the caller decides whether to skip or abort.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("malformed composite key: {reason}")]
    Malformed { reason: &'static str },
}

impl CodecError {
    pub(crate) const fn malformed(reason: &'static str) -> Self {
        Self::Malformed { reason }
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Malformed { reason } => reason,
        }
    }
}
