//! Module: stream::order
//! Responsibility: comparator policy for merge decisions and monotonicity.
//! Boundary: centralizes ASC/DESC comparison so operators never branch on
//! direction themselves.

use crate::{
    db::{Direction, column::ScanColumn},
    types::EntityId,
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// MergeKey
///
/// What two columns are compared on when children are merged.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MergeKey {
    /// `(sort_value, entity_id)`.
    #[default]
    SortValue,

    /// `entity_id` only. Children must be entity-ordered, e.g. equality
    /// slices of a secondary index or an entities row.
    EntityId,
}

impl MergeKey {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::SortValue => 0x01,
            Self::EntityId => 0x02,
        }
    }
}

///
/// MergePoint
///
/// Projection of one column onto its merge key. `sort_value` is `None`
/// exactly when the key is `MergeKey::EntityId`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MergePoint {
    sort_value: Option<Value>,
    entity_id: EntityId,
}

impl MergePoint {
    #[must_use]
    pub const fn new(sort_value: Option<Value>, entity_id: EntityId) -> Self {
        Self {
            sort_value,
            entity_id,
        }
    }

    #[must_use]
    pub const fn sort_value(&self) -> Option<&Value> {
        self.sort_value.as_ref()
    }

    #[must_use]
    pub const fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Position of `column` relative to this point, in traversal order.
    #[must_use]
    pub fn locate(&self, column: &ScanColumn, direction: Direction) -> Ordering {
        let natural = match &self.sort_value {
            Some(value) => column
                .sort_value()
                .cmp(value)
                .then_with(|| column.entity_id().cmp(&self.entity_id)),
            None => column.entity_id().cmp(&self.entity_id),
        };

        apply_direction(natural, direction)
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        match (&self.sort_value, &other.sort_value) {
            (Some(left), Some(right)) => left
                .cmp(right)
                .then_with(|| self.entity_id.cmp(&other.entity_id)),
            _ => self.entity_id.cmp(&other.entity_id),
        }
    }
}

///
/// MergeComparator
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MergeComparator {
    key: MergeKey,
    direction: Direction,
}

impl MergeComparator {
    #[must_use]
    pub const fn new(key: MergeKey, direction: Direction) -> Self {
        Self { key, direction }
    }

    #[must_use]
    pub const fn key(self) -> MergeKey {
        self.key
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn point(self, column: &ScanColumn) -> MergePoint {
        let sort_value = match self.key {
            MergeKey::SortValue => Some(column.sort_value().clone()),
            MergeKey::EntityId => None,
        };

        MergePoint::new(sort_value, column.entity_id())
    }

    #[must_use]
    pub fn compare(self, left: &MergePoint, right: &MergePoint) -> Ordering {
        apply_direction(left.natural_cmp(right), self.direction)
    }

    // Whether `current` moves backwards after `previous`.
    pub(super) fn violates_monotonicity(self, previous: &MergePoint, current: &MergePoint) -> bool {
        self.compare(previous, current).is_gt()
    }

    /// Whether `point` has the shape this comparator produces.
    #[must_use]
    pub const fn accepts(self, point: &MergePoint) -> bool {
        matches!(
            (self.key, &point.sort_value),
            (MergeKey::SortValue, Some(_)) | (MergeKey::EntityId, None)
        )
    }
}

const fn apply_direction(natural: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => natural,
        Direction::Desc => natural.reverse(),
    }
}
