mod entity_id;
mod row_key;

pub use entity_id::{EntityId, EntityIdError};
pub use row_key::RowKey;
