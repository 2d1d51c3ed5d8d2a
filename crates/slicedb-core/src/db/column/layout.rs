use crate::db::key::CodecError;

pub(super) const ERR_WRONG_ARITY: &str = "column has wrong component count for its index kind";
pub(super) const ERR_NOT_ID: &str = "column id component is not an entity id";
pub(super) const ERR_NOT_TEXT: &str = "column label component is not text";
pub(super) const ERR_MIXED_DIRECTION: &str = "column sort and id components disagree on direction";

///
/// Slot
///
/// Component position counted from the front or from the back of a key.
///

#[derive(Clone, Copy, Debug)]
pub(super) enum Slot {
    Head(usize),
    Tail(usize),
}

impl Slot {
    pub(super) const fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Self::Head(index) if index < len => Some(index),
            Self::Tail(back) if back >= 1 && back <= len => Some(len - back),
            _ => None,
        }
    }
}

///
/// ColumnLayout
///

#[derive(Debug)]
pub(super) struct ColumnLayout {
    sort: Slot,
    id: Slot,
    min_arity: usize,
    max_arity: Option<usize>,
    pub(super) text_slots: &'static [Slot],
}

///
/// ResolvedSlots
///

#[derive(Clone, Copy, Debug)]
pub(super) struct ResolvedSlots {
    pub(super) sort: usize,
    pub(super) id: usize,
}

impl ColumnLayout {
    pub(super) fn resolve(&self, len: usize) -> Result<ResolvedSlots, CodecError> {
        if len < self.min_arity || self.max_arity.is_some_and(|max| len > max) {
            return Err(CodecError::malformed(ERR_WRONG_ARITY));
        }

        match (self.sort.resolve(len), self.id.resolve(len)) {
            (Some(sort), Some(id)) => Ok(ResolvedSlots { sort, id }),
            _ => Err(CodecError::malformed(ERR_WRONG_ARITY)),
        }
    }
}

pub(super) static ENTITIES: ColumnLayout = ColumnLayout {
    sort: Slot::Head(0),
    id: Slot::Head(0),
    min_arity: 1,
    max_arity: Some(1),
    text_slots: &[],
};

pub(super) static SECONDARY_VALUE: ColumnLayout = ColumnLayout {
    sort: Slot::Tail(2),
    id: Slot::Tail(1),
    min_arity: 2,
    max_arity: None,
    text_slots: &[],
};

pub(super) static ALL_PROPERTIES: ColumnLayout = ColumnLayout {
    sort: Slot::Head(0),
    id: Slot::Head(1),
    min_arity: 3,
    max_arity: Some(3),
    text_slots: &[Slot::Head(2)],
};

pub(super) static GEO: ColumnLayout = ColumnLayout {
    sort: Slot::Head(0),
    id: Slot::Head(1),
    min_arity: 2,
    max_arity: None,
    text_slots: &[Slot::Head(0)],
};

pub(super) static FULL_TEXT: ColumnLayout = ColumnLayout {
    sort: Slot::Head(0),
    id: Slot::Head(1),
    min_arity: 2,
    max_arity: None,
    text_slots: &[Slot::Head(0)],
};
