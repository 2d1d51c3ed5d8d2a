use crate::{
    config::ConfigError,
    db::{QueryError, cursor::CursorError, key::CodecError, store::StoreError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Failure surfaced at the execution boundary. A failed execution never
/// returns a partial page.
///

#[derive(Clone, Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Codec(_) => ErrorClass::Corruption,
            Self::Query(QueryError::OutOfOrder { .. }) => ErrorClass::Internal,
            Self::Query(QueryError::InvalidPageSize { .. }) => ErrorClass::Unsupported,
            Self::Query(_) | Self::Cursor(_) | Self::Config(_) => ErrorClass::InvariantViolation,
            Self::Store(_) => ErrorClass::Unavailable,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Codec(_) => ErrorOrigin::Index,
            Self::Query(_) => ErrorOrigin::Query,
            Self::Store(_) => ErrorOrigin::Store,
            Self::Cursor(CursorError::Encode(_)) => ErrorOrigin::Serialize,
            Self::Cursor(_) => ErrorOrigin::Cursor,
            Self::Config(_) => ErrorOrigin::Config,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Runtime classification for the collaborator boundary.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    InvariantViolation,
    Unsupported,
    Internal,
    Unavailable,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Index,
    Query,
    Store,
    Cursor,
    Serialize,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Index => "index",
            Self::Query => "query",
            Self::Store => "store",
            Self::Cursor => "cursor",
            Self::Serialize => "serialize",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
