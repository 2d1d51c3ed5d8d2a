use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use ulid::Ulid as WrappedUlid;

///
/// EntityIdError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum EntityIdError {
    #[error("invalid entity id string")]
    InvalidString,

    #[error("invalid entity id length: {len} bytes")]
    InvalidSize { len: usize },
}

///
/// EntityId
///
/// 128-bit entity identifier. Ordering is the big-endian byte order of the
/// identifier, which is also the order its ordered key encoding produces.
///

#[derive(
    Clone, Copy, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(from = "[u8; 16]", into = "[u8; 16]")]
#[repr(transparent)]
pub struct EntityId(WrappedUlid);

impl EntityId {
    pub const STORED_SIZE: usize = 16;

    pub const MIN: Self = Self::from_bytes([0x00; 16]);
    pub const MAX: Self = Self::from_bytes([0xFF; 16]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(WrappedUlid::from_bytes(bytes))
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, EntityIdError> {
        let array: [u8; 16] = bytes
            .try_into()
            .map_err(|_| EntityIdError::InvalidSize { len: bytes.len() })?;

        Ok(Self::from_bytes(array))
    }

    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self::from_bytes(n.to_be_bytes())
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.0.to_be_bytes()
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0.0
    }

    /// Parse the canonical 26-character ULID text form.
    pub fn parse(encoded: &str) -> Result<Self, EntityIdError> {
        let this = WrappedUlid::from_string(encoded).map_err(|_| EntityIdError::InvalidString)?;

        Ok(Self(this))
    }
}

impl From<[u8; 16]> for EntityId {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<EntityId> for [u8; 16] {
    fn from(id: EntityId) -> Self {
        id.to_bytes()
    }
}

impl From<WrappedUlid> for EntityId {
    fn from(ulid: WrappedUlid) -> Self {
        Self(ulid)
    }
}

///
/// TESTS
///
