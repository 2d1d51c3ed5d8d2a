use crate::{
    db::{
        Direction,
        key::{ComponentEquality, CompositeKey, KeyComponent, RawKey},
    },
    value::Value,
};
use std::ops::Bound;

pub const DEFAULT_FETCH_SIZE: usize = 100;

///
/// ScanRange
///
/// Bounds of one scan over one index row. `start` and `end` are in key
/// order whatever the traversal: a reversed scan walks from `end` down to
/// `start`. An absent bound is open-ended.
///
/// Boundary semantics come from the equality markers the caller puts on
/// the bound keys; the builders below pick the usual ones.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanRange {
    pub start: Option<CompositeKey>,
    pub start_inclusive: bool,
    pub end: Option<CompositeKey>,
    pub end_inclusive: bool,
    pub reversed: bool,
    pub page_size: usize,
}

impl ScanRange {
    /// Every column of the row.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            start_inclusive: true,
            end: None,
            end_inclusive: true,
            reversed: false,
            page_size: DEFAULT_FETCH_SIZE,
        }
    }

    /// Every column whose leading components equal `prefix`.
    #[must_use]
    pub fn prefix(prefix: CompositeKey) -> Self {
        if prefix.is_empty() {
            return Self::all();
        }

        Self::all()
            .from(prefix.clone().prefix_start(), true)
            .to(prefix.prefix_end(), true)
    }

    /// Columns under `prefix` whose next (ascending) component lies between
    /// the given value bounds. Each bound carries its own inclusivity.
    #[must_use]
    pub fn values(
        prefix: &CompositeKey,
        lower: Option<(Value, bool)>,
        upper: Option<(Value, bool)>,
    ) -> Self {
        Self::values_in(prefix, Direction::Asc, lower, upper)
    }

    /// Like `values`, for a value component stored in `direction`.
    /// `lower`/`upper` are logical value bounds; a descending component
    /// maps the upper value onto the start of key order.
    #[must_use]
    pub fn values_in(
        prefix: &CompositeKey,
        direction: Direction,
        lower: Option<(Value, bool)>,
        upper: Option<(Value, bool)>,
    ) -> Self {
        let (first, last) = match direction {
            Direction::Asc => (lower, upper),
            Direction::Desc => (upper, lower),
        };

        let start = match first {
            Some((value, inclusive)) => {
                let marker = if inclusive {
                    ComponentEquality::Less
                } else {
                    ComponentEquality::Greater
                };
                Some(bound_key(prefix, value, direction, marker))
            }
            None if prefix.is_empty() => None,
            None => Some(prefix.clone().prefix_start()),
        };
        let end = match last {
            Some((value, inclusive)) => {
                let marker = if inclusive {
                    ComponentEquality::Greater
                } else {
                    ComponentEquality::Less
                };
                Some(bound_key(prefix, value, direction, marker))
            }
            None if prefix.is_empty() => None,
            None => Some(prefix.clone().prefix_end()),
        };

        Self {
            start,
            end,
            ..Self::all()
        }
    }

    #[must_use]
    pub fn from(mut self, start: CompositeKey, inclusive: bool) -> Self {
        self.start = Some(start);
        self.start_inclusive = inclusive;
        self
    }

    #[must_use]
    pub fn to(mut self, end: CompositeKey, inclusive: bool) -> Self {
        self.end = Some(end);
        self.end_inclusive = inclusive;
        self
    }

    #[must_use]
    pub const fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lower bound in raw key space.
    #[must_use]
    pub fn lower_bound(&self) -> Bound<RawKey> {
        raw_bound(self.start.as_ref(), self.start_inclusive)
    }

    /// Upper bound in raw key space.
    #[must_use]
    pub fn upper_bound(&self) -> Bound<RawKey> {
        raw_bound(self.end.as_ref(), self.end_inclusive)
    }
}

impl Default for ScanRange {
    fn default() -> Self {
        Self::all()
    }
}

fn bound_key(
    prefix: &CompositeKey,
    value: Value,
    direction: Direction,
    marker: ComponentEquality,
) -> CompositeKey {
    let mut key = prefix.clone();
    key.push(KeyComponent::new(value, direction, marker));

    key
}

fn raw_bound(key: Option<&CompositeKey>, inclusive: bool) -> Bound<RawKey> {
    match key {
        Some(key) if inclusive => Bound::Included(key.encode()),
        Some(key) => Bound::Excluded(key.encode()),
        None => Bound::Unbounded,
    }
}
