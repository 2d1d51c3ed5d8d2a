//! Module: store
//! Responsibility: the page-fetch contract consumed from the store client.
//! Does not own: retries, timeouts or connection management; those belong
//! to the client implementation behind `IndexStore`.

mod error;
mod memory;


use crate::{db::key::RawKey, types::RowKey};
use std::{ops::Bound, rc::Rc, sync::Arc};

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryIndexStore;

///
/// PageRequest
///
/// One bounded read of an index row. Bounds are in raw key space; the store
/// returns at most `limit` columns in ascending byte order, or descending
/// when `reversed`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub lower: Bound<RawKey>,
    pub upper: Bound<RawKey>,
    pub reversed: bool,
    pub limit: usize,
}

impl PageRequest {
    /// Whether `key` lies inside both bounds.
    #[must_use]
    pub fn contains(&self, key: &RawKey) -> bool {
        let above_lower = match &self.lower {
            Bound::Included(lower) => key >= lower,
            Bound::Excluded(lower) => key > lower,
            Bound::Unbounded => true,
        };
        let below_upper = match &self.upper {
            Bound::Included(upper) => key <= upper,
            Bound::Excluded(upper) => key < upper,
            Bound::Unbounded => true,
        };

        above_lower && below_upper
    }

    /// Whether no key can satisfy both bounds.
    #[must_use]
    pub fn is_empty_range(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Included(lower), Bound::Included(upper)) => lower > upper,
            (Bound::Included(lower) | Bound::Excluded(lower), Bound::Excluded(upper))
            | (Bound::Excluded(lower), Bound::Included(upper)) => lower >= upper,
            _ => false,
        }
    }
}

///
/// IndexStore
///
/// Store client boundary. Implementations must return columns sorted per
/// the row comparator (raw byte order) and honor exclusive bounds so a scan
/// can resume strictly after the last raw key it emitted.
///
/// A call may block; that is the only suspension point of a scan.
///

pub trait IndexStore {
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError>;
}

impl<T> IndexStore for &T
where
    T: IndexStore + ?Sized,
{
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        (**self).fetch_page(row, request)
    }
}

impl<T> IndexStore for Box<T>
where
    T: IndexStore + ?Sized,
{
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        self.as_ref().fetch_page(row, request)
    }
}

impl<T> IndexStore for Arc<T>
where
    T: IndexStore + ?Sized,
{
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        self.as_ref().fetch_page(row, request)
    }
}

impl<T> IndexStore for Rc<T>
where
    T: IndexStore + ?Sized,
{
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        self.as_ref().fetch_page(row, request)
    }
}
