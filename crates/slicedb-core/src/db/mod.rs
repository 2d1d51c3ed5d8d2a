//! Query execution layer: key codec, column parsing, paged index scans,
//! merge operators, cursors and the tree executor that drives them.

pub mod column;
pub mod cursor;
pub mod executor;
pub mod key;
pub mod scan;
pub mod store;
pub mod stream;

mod direction;
mod error;

pub use direction::Direction;
pub use error::QueryError;
