///
/// ValueTag
///
/// Stable value-kind tag used by the ordered key encoding and by mixed-kind
/// ordering. Tag bytes are persisted inside index rows and must not change.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Id = 1,
    Text = 2,
    Bool = 3,
    Int = 4,
    Float = 5,
    Blob = 6,
}

impl ValueTag {
    /// Stable byte tag for this kind.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Decode one stable byte tag.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Id),
            2 => Some(Self::Text),
            3 => Some(Self::Bool),
            4 => Some(Self::Int),
            5 => Some(Self::Float),
            6 => Some(Self::Blob),
            _ => None,
        }
    }

    /// Human-readable kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Text => "Text",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Blob => "Blob",
        }
    }
}
