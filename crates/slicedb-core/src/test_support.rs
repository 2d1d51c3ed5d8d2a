//! Fixtures shared by unit tests across the crate.

use crate::{
    db::{
        key::{CompositeKey, RawKey},
        store::{IndexStore, MemoryIndexStore, PageRequest, StoreError},
    },
    obs::{ScanTraceEvent, ScanTraceSink},
    types::{EntityId, RowKey},
    value::Value,
};
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

pub(crate) const AGE_ROW: &str = "users:secondary";
pub(crate) const ENTITIES_ROW: &str = "users:entities";

pub(crate) const fn id(n: u128) -> EntityId {
    EntityId::from_u128(n)
}

/// Secondary value column `[property, value, id]`.
pub(crate) fn secondary_key(
    property: &str,
    value: impl Into<Value>,
    entity: EntityId,
) -> CompositeKey {
    CompositeKey::new().with(property).with(value).with(entity)
}

pub(crate) fn insert_secondary(
    store: &MemoryIndexStore,
    row: &str,
    property: &str,
    value: impl Into<Value>,
    entity: EntityId,
) {
    store.insert(row, &secondary_key(property, value, entity));
}

pub(crate) fn insert_entity(store: &MemoryIndexStore, row: &str, entity: EntityId) {
    store.insert(row, &CompositeKey::new().with(entity));
}

/// Store holding `age` = 10, 20, 20 for entities 1, 2, 3 plus an entities row.
pub(crate) fn age_store() -> MemoryIndexStore {
    let store = MemoryIndexStore::new();
    insert_secondary(&store, AGE_ROW, "age", 10_i64, id(1));
    insert_secondary(&store, AGE_ROW, "age", 20_i64, id(2));
    insert_secondary(&store, AGE_ROW, "age", 20_i64, id(3));
    for n in 1..=3 {
        insert_entity(&store, ENTITIES_ROW, id(n));
    }

    store
}

///
/// RecordingSink
///

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<ScanTraceEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<ScanTraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn count(&self, matches: impl Fn(&ScanTraceEvent) -> bool) -> usize {
        self.events().iter().filter(|event| matches(event)).count()
    }
}

impl ScanTraceSink for RecordingSink {
    fn on_event(&self, event: &ScanTraceEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }
}

///
/// FaultyStore
///
/// Wraps a memory store, counting fetches and failing every fetch of one
/// row once a number of fetches of that row have succeeded.
///

pub(crate) struct FaultyStore {
    inner: MemoryIndexStore,
    fail_row: Option<(RowKey, usize)>,
    fetches: AtomicUsize,
    fail_row_fetches: AtomicUsize,
}

impl FaultyStore {
    pub(crate) const fn new(inner: MemoryIndexStore) -> Self {
        Self {
            inner,
            fail_row: None,
            fetches: AtomicUsize::new(0),
            fail_row_fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(mut self, row: &str, after: usize) -> Self {
        self.fail_row = Some((RowKey::from(row), after));
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl IndexStore for FaultyStore {
    fn fetch_page(&self, row: &RowKey, request: &PageRequest) -> Result<Vec<RawKey>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some((fail_row, after)) = &self.fail_row
            && fail_row == row
            && self.fail_row_fetches.fetch_add(1, Ordering::SeqCst) >= *after
        {
            return Err(StoreError::unavailable("replica set unreachable"));
        }

        self.inner.fetch_page(row, request)
    }
}
