//! Module: key
//! Responsibility: composite key model and its order-preserving byte codec.
//! Does not own: index-kind column layouts or scan bounds.
//! Boundary: every raw column name read from or sent to the store passes
//! through `encode_key` / `decode_key`.

mod codec;
mod error;
mod ordered;

#[cfg(test)]
mod tests;

use crate::{db::Direction, value::Value};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

pub use codec::{decode_key, encode_key};
pub use error::CodecError;

///
/// ComponentEquality
///
/// Trailing per-component marker. Stored keys always carry `Equal`; range
/// boundaries use `Less`/`Greater` to sort before/after every key sharing
/// the boundary prefix regardless of trailing components.
/// Marker bytes are persisted and never direction-inverted.
///

#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ComponentEquality {
    Less = 0x00,
    #[default]
    Equal = 0x01,
    Greater = 0x02,
}

impl ComponentEquality {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Less),
            0x01 => Some(Self::Equal),
            0x02 => Some(Self::Greater),
            _ => None,
        }
    }
}

///
/// KeyComponent
///
/// One typed slot of a composite key with its ordering direction and
/// equality marker.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyComponent {
    value: Value,
    direction: Direction,
    equality: ComponentEquality,
}

impl KeyComponent {
    #[must_use]
    pub const fn new(value: Value, direction: Direction, equality: ComponentEquality) -> Self {
        Self {
            value,
            direction,
            equality,
        }
    }

    #[must_use]
    pub const fn asc(value: Value) -> Self {
        Self::new(value, Direction::Asc, ComponentEquality::Equal)
    }

    #[must_use]
    pub const fn desc(value: Value) -> Self {
        Self::new(value, Direction::Desc, ComponentEquality::Equal)
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn equality(&self) -> ComponentEquality {
        self.equality
    }

    #[must_use]
    pub const fn with_equality(mut self, equality: ComponentEquality) -> Self {
        self.equality = equality;
        self
    }
}

// Component order mirrors encoded byte order:
// ascending tags sort below inverted (descending) tags, payloads follow the
// component direction, and the equality marker breaks remaining ties.
impl Ord for KeyComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.direction
            .cmp(&other.direction)
            .then_with(|| match self.direction {
                Direction::Asc => self.value.cmp(&other.value),
                Direction::Desc => other.value.cmp(&self.value),
            })
            .then_with(|| self.equality.cmp(&other.equality))
    }
}

impl PartialOrd for KeyComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///
/// CompositeKey
///
/// Ordered typed tuple. `Ord` is component-wise with shorter prefixes first,
/// which is exactly the byte order of the encoded form.
///

#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct CompositeKey {
    components: Vec<KeyComponent>,
}

impl CompositeKey {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from_components(components: Vec<KeyComponent>) -> Self {
        Self { components }
    }

    /// Build an all-ascending key from plain values.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            components: values.into_iter().map(KeyComponent::asc).collect(),
        }
    }

    /// Append one ascending component.
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.components.push(KeyComponent::asc(value.into()));
        self
    }

    /// Append one descending component.
    #[must_use]
    pub fn with_desc(mut self, value: impl Into<Value>) -> Self {
        self.components.push(KeyComponent::desc(value.into()));
        self
    }

    pub fn push(&mut self, component: KeyComponent) {
        self.components.push(component);
    }

    /// Replace the equality marker of the last component.
    #[must_use]
    pub fn with_equality(mut self, equality: ComponentEquality) -> Self {
        if let Some(last) = self.components.pop() {
            self.components.push(last.with_equality(equality));
        }
        self
    }

    /// Boundary sorting before every key that starts with this prefix.
    #[must_use]
    pub fn prefix_start(self) -> Self {
        self.with_equality(ComponentEquality::Less)
    }

    /// Boundary sorting after every key that starts with this prefix.
    #[must_use]
    pub fn prefix_end(self) -> Self {
        self.with_equality(ComponentEquality::Greater)
    }

    #[must_use]
    pub fn truncated(mut self, len: usize) -> Self {
        self.components.truncate(len);
        self
    }

    #[must_use]
    pub fn components(&self) -> &[KeyComponent] {
        &self.components
    }

    #[must_use]
    pub fn into_components(self) -> Vec<KeyComponent> {
        self.components
    }

    #[must_use]
    pub fn component(&self, index: usize) -> Option<&KeyComponent> {
        self.components.get(index)
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.components.get(index).map(KeyComponent::value)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn encode(&self) -> RawKey {
        encode_key(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        decode_key(bytes)
    }
}

///
/// RawKey
///
/// Encoded composite key bytes exactly as the store sorts and returns them.
/// Doubles as the resumable seek token for a scan position.
///

#[derive(Clone, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RawKey(#[serde(with = "serde_bytes")] Vec<u8>);

impl RawKey {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode(&self) -> Result<CompositeKey, CodecError> {
        decode_key(&self.0)
    }
}

impl AsRef<[u8]> for RawKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for RawKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawKey({self})")
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
