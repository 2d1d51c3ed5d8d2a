//! Module: stream
//! Responsibility: the pull contract shared by index scans and merge nodes,
//! plus the intersection, union and negation operators.
//! Does not own: page fetching (see `db::scan`) or cursor wire format.
//! Boundary: every merge decision goes through `MergeComparator`.

mod intersect;
mod negate;
mod order;
mod side;
mod union;


use crate::{
    db::{Direction, column::ScanColumn, cursor::CursorNode},
    error::Error,
};
use serde::{Deserialize, Serialize};

pub use intersect::IntersectStream;
pub use negate::NegateStream;
pub use order::{MergeComparator, MergeKey, MergePoint};
pub use union::UnionStream;

///
/// ColumnStream
///
/// Pull-based, finite, non-restartable ordered sequence of scan columns.
/// Once a call fails the stream is unusable; a fresh stream must be built
/// from a cursor to continue.
///

pub trait ColumnStream {
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error>;

    /// Skip forward so the next column is at (or, when exclusive, after)
    /// `target` in this stream's direction. Never moves backwards.
    fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error>;

    fn direction(&self) -> Direction;

    /// Resumable position covering every column emitted so far.
    fn position(&self) -> CursorNode;
}

pub type ColumnStreamBox<'a> = Box<dyn ColumnStream + 'a>;

impl<T> ColumnStream for Box<T>
where
    T: ColumnStream + ?Sized,
{
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        self.as_mut().next_column()
    }

    fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        self.as_mut().seek(target, inclusive)
    }

    fn direction(&self) -> Direction {
        self.as_ref().direction()
    }

    fn position(&self) -> CursorNode {
        self.as_ref().position()
    }
}

impl<T> ColumnStream for &mut T
where
    T: ColumnStream + ?Sized,
{
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        (**self).next_column()
    }

    fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        (**self).seek(target, inclusive)
    }

    fn direction(&self) -> Direction {
        (**self).direction()
    }

    fn position(&self) -> CursorNode {
        (**self).position()
    }
}

///
/// MergeOperator
///
/// Operator identity recorded in cursor positions.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MergeOperator {
    Intersect,
    Union,
    Not,
}

impl MergeOperator {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Intersect => 0x01,
            Self::Union => 0x02,
            Self::Not => 0x03,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intersect => "intersect",
            Self::Union => "union",
            Self::Not => "not",
        }
    }
}
