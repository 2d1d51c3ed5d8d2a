//! Module: column
//! Responsibility: typed parse of one physical index column into the entity
//! it identifies and the value it sorts on.
//! Does not own: byte framing (see `db::key`) or scan paging.

mod layout;

#[cfg(test)]
mod tests;

use crate::{
    db::{
        Direction,
        key::{CodecError, ComponentEquality, CompositeKey, KeyComponent, RawKey},
    },
    types::EntityId,
    value::Value,
};
use serde::{Deserialize, Serialize};

use layout::{ColumnLayout, ERR_MIXED_DIRECTION, ERR_NOT_ID, ERR_NOT_TEXT, ERR_WRONG_ARITY};

///
/// IndexKind
///
/// Closed set of index row layouts the executor knows how to parse.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum IndexKind {
    /// `[id]`: every entity of a collection, ordered by id.
    Entities,
    /// `[..prefix, value, id]`: one property's values.
    SecondaryValue,
    /// `[value, id, property]`: every property value of a collection.
    AllProperties,
    /// `[geocell, id, ..coords]`
    Geo,
    /// `[term, id, ..positions]`
    FullText,
}

impl IndexKind {
    /// Stable tag used by tree signatures.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Entities => 0x01,
            Self::SecondaryValue => 0x02,
            Self::AllProperties => 0x03,
            Self::Geo => 0x04,
            Self::FullText => 0x05,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::SecondaryValue => "secondary_value",
            Self::AllProperties => "all_properties",
            Self::Geo => "geo",
            Self::FullText => "full_text",
        }
    }

    fn layout(self) -> &'static ColumnLayout {
        match self {
            Self::Entities => &layout::ENTITIES,
            Self::SecondaryValue => &layout::SECONDARY_VALUE,
            Self::AllProperties => &layout::ALL_PROPERTIES,
            Self::Geo => &layout::GEO,
            Self::FullText => &layout::FULL_TEXT,
        }
    }
}

///
/// ScanColumn
///
/// One parsed index entry. `raw_key` is the exact column name the store
/// returned and is the resumable position of this entry.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanColumn {
    entity_id: EntityId,
    sort_value: Value,
    raw_key: RawKey,
}

impl ScanColumn {
    #[must_use]
    pub const fn new(entity_id: EntityId, sort_value: Value, raw_key: RawKey) -> Self {
        Self {
            entity_id,
            sort_value,
            raw_key,
        }
    }

    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    #[must_use]
    pub const fn sort_value(&self) -> &Value {
        &self.sort_value
    }

    #[must_use]
    pub const fn raw_key(&self) -> &RawKey {
        &self.raw_key
    }

    #[must_use]
    pub fn into_raw_key(self) -> RawKey {
        self.raw_key
    }
}

///
/// ColumnParser
///
/// Parser for one index kind. Each kind owns its layout; parsing dispatches
/// on the kind tag rather than on runtime value inspection.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColumnParser {
    kind: IndexKind,
}

impl ColumnParser {
    #[must_use]
    pub const fn new(kind: IndexKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Parse one raw column into a `ScanColumn`, retaining the raw bytes.
    pub fn parse(&self, raw: &RawKey) -> Result<ScanColumn, CodecError> {
        let key = raw.decode()?;
        let (entity_id, sort_value) = self.parse_key(key)?;

        Ok(ScanColumn::new(entity_id, sort_value, raw.clone()))
    }

    /// Intrinsic ordering of the column's sort component.
    pub fn parse_direction(&self, raw: &RawKey) -> Result<Direction, CodecError> {
        let key = raw.decode()?;
        let slots = self.kind.layout().resolve(key.len())?;
        let direction = key
            .component(slots.sort)
            .map(KeyComponent::direction)
            .ok_or(CodecError::malformed(ERR_WRONG_ARITY))?;

        Ok(direction)
    }

    /// Build a key in this layout positioned at `(sort_value, entity_id)`,
    /// reusing the leading components of `template` (a key from the same
    /// row). `sort_value == None` keeps the template's sort value.
    ///
    /// The returned key ends at the last merge-relevant slot with an
    /// `Equal` marker; callers choose the boundary marker.
    pub fn seek_key(
        &self,
        template: &CompositeKey,
        sort_value: Option<&Value>,
        entity_id: EntityId,
    ) -> Result<CompositeKey, CodecError> {
        let slots = self.kind.layout().resolve(template.len())?;
        let mut components = template.components().to_vec();

        if let Some(value) = sort_value
            && slots.sort != slots.id
        {
            let direction = components[slots.sort].direction();
            components[slots.sort] =
                KeyComponent::new(value.clone(), direction, ComponentEquality::Equal);
        }

        let direction = components[slots.id].direction();
        components[slots.id] =
            KeyComponent::new(Value::Id(entity_id), direction, ComponentEquality::Equal);
        components.truncate(slots.sort.max(slots.id) + 1);

        Ok(CompositeKey::from_components(components))
    }

    fn parse_key(&self, key: CompositeKey) -> Result<(EntityId, Value), CodecError> {
        let layout = self.kind.layout();
        let slots = layout.resolve(key.len())?;

        for slot in layout.text_slots {
            let index = slot.resolve(key.len()).ok_or(CodecError::malformed(ERR_WRONG_ARITY))?;
            if key.value(index).and_then(Value::as_text).is_none() {
                return Err(CodecError::malformed(ERR_NOT_TEXT));
            }
        }

        let id_component = &key.components()[slots.id];
        let sort_component = &key.components()[slots.sort];
        if id_component.direction() != sort_component.direction() {
            return Err(CodecError::malformed(ERR_MIXED_DIRECTION));
        }

        let entity_id = id_component
            .value()
            .as_entity_id()
            .ok_or(CodecError::malformed(ERR_NOT_ID))?;
        let sort_value = sort_component.value().clone();

        Ok((entity_id, sort_value))
    }
}
