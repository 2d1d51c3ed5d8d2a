use serde::{Deserialize, Serialize};
use std::fmt;

///
/// RowKey
///
/// Key of one physical index row: the sorted-column container holding every
/// entry of a single index.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RowKey(#[serde(with = "serde_bytes")] Vec<u8>);

impl RowKey {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<&str> for RowKey {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

impl From<String> for RowKey {
    fn from(name: String) -> Self {
        Self::new(name.into_bytes())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
