//! Core runtime for slicedb: the composite key codec, typed index columns,
//! paged index scans, merge operators and resumable cursors that execute
//! secondary-index queries over a sorted wide-column store.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod obs;
pub mod serialize;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains the vocabulary a query planner needs to build and drive
/// an operator tree. Stores and codecs stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        db::{
            Direction,
            column::{IndexKind, ScanColumn},
            executor::{IndexLeaf, Page, QueryExecutor, ScanTree},
            key::{CompositeKey, RawKey},
            scan::ScanRange,
            stream::MergeKey,
        },
        error::Error,
        types::{EntityId, RowKey},
        value::Value,
    };
}
