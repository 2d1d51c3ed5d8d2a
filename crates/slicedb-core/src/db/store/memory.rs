use crate::{
    db::{
        key::{CompositeKey, RawKey},
        store::{IndexStore, PageRequest, StoreError},
    },
    types::RowKey,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::RwLock,
};

///
/// MemoryIndexStore
///
/// In-process reference store: one ordered set of raw column names per row.
/// Byte order of `RawKey` is the row comparator.
///

#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    rows: RwLock<BTreeMap<RowKey, BTreeSet<RawKey>>>,
}

impl MemoryIndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one composite column; returns whether it was newly added.
    pub fn insert(&self, row: impl Into<RowKey>, key: &CompositeKey) -> bool {
        self.insert_raw(row, key.encode())
    }

    pub fn insert_raw(&self, row: impl Into<RowKey>, raw: RawKey) -> bool {
        let mut rows = self
            .rows
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        rows.entry(row.into()).or_default().insert(raw)
    }

    pub fn remove(&self, row: &RowKey, key: &CompositeKey) -> bool {
        let mut rows = self
            .rows
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        rows.get_mut(row)
            .is_some_and(|columns| columns.remove(&key.encode()))
    }

    #[must_use]
    pub fn row_len(&self, row: &RowKey) -> usize {
        let rows = self
            .rows
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        rows.get(row).map_or(0, BTreeSet::len)
    }
}

impl IndexStore for MemoryIndexStore {
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        if request.limit == 0 || request.is_empty_range() {
            return Ok(Vec::new());
        }

        let rows = self
            .rows
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(columns) = rows.get(row) else {
            return Ok(Vec::new());
        };

        let range = columns.range((request.lower.clone(), request.upper.clone()));
        let page = if request.reversed {
            range.rev().take(request.limit).cloned().collect()
        } else {
            range.take(request.limit).cloned().collect()
        };

        Ok(page)
    }
}
