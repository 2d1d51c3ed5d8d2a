use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Direction
///
/// Canonical ordering direction shared by key components, scan traversal
/// and merge comparators.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Compose a layout direction with a traversal that may be reversed.
    #[must_use]
    pub const fn traversed(self, reversed: bool) -> Self {
        if reversed { self.reverse() } else { self }
    }

    // Human-readable label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
