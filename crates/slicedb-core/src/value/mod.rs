mod compare;
mod tag;


use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub use compare::{canonical_cmp, strict_order_cmp};
pub use tag::ValueTag;

///
/// Value
///
/// Typed value an index can sort on.
/// Values of one kind compare naturally; values of different kinds compare by
/// the fixed `ValueTag` order, so mixed-kind index rows still have a total order.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Value {
    Id(EntityId),
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Blob(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Value {
    /// Stable kind tag used by the ordered key encoding.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::Id(_) => ValueTag::Id,
            Self::Text(_) => ValueTag::Text,
            Self::Bool(_) => ValueTag::Bool,
            Self::Int(_) => ValueTag::Int,
            Self::Float(_) => ValueTag::Float,
            Self::Blob(_) => ValueTag::Blob,
        }
    }

    #[must_use]
    pub const fn as_entity_id(&self) -> Option<EntityId> {
        match self {
            Self::Id(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self, other).is_eq()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes)
    }
}
