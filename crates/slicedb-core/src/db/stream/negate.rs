use crate::{
    db::{
        Direction, QueryError,
        column::ScanColumn,
        cursor::CursorNode,
        stream::{
            ColumnStream, ColumnStreamBox, MergeKey, MergeOperator, MergePoint, side::MergeCore,
        },
    },
    error::Error,
};

const POSITIVE: usize = 0;
const SUBTRACT: usize = 1;

///
/// NegateStream
///
/// Emits the positive child's columns whose merge point is absent from the
/// subtracted child. The positive child defines output order; the
/// subtracted child is only ever seeked forward to the positive head.
///

pub struct NegateStream<'a> {
    core: MergeCore<'a>,
}

impl<'a> NegateStream<'a> {
    pub fn new(
        key: MergeKey,
        positive: ColumnStreamBox<'a>,
        subtract: ColumnStreamBox<'a>,
    ) -> Result<Self, QueryError> {
        Ok(Self {
            core: MergeCore::new(MergeOperator::Not, key, vec![positive, subtract])?,
        })
    }

    #[must_use]
    pub fn resume_after(mut self, last: MergePoint) -> Self {
        self.core.resume_after(last);
        self
    }

    #[must_use]
    pub fn finished(mut self) -> Self {
        self.core.finish();
        self
    }
}

impl ColumnStream for NegateStream<'_> {
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        if self.core.is_done() {
            return Ok(None);
        }

        loop {
            self.core.fill_all()?;

            let Some(target) = self.core.sides[POSITIVE].head_point().cloned() else {
                self.core.finish();
                return Ok(None);
            };

            let comparator = self.core.comparator();
            let behind = self.core.sides[SUBTRACT]
                .head_point()
                .is_some_and(|point| comparator.compare(point, &target).is_lt());
            if behind {
                self.core.seek_side(SUBTRACT, &target, true)?;
                self.core.fill(SUBTRACT)?;
            }

            let excluded = self.core.sides[SUBTRACT]
                .head_point()
                .is_some_and(|point| comparator.compare(point, &target).is_eq());
            let column = self.core.sides[POSITIVE].take();

            if excluded || !self.core.admit(target) {
                continue;
            }

            return Ok(column);
        }
    }

    fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        self.core.seek(target, inclusive)
    }

    fn direction(&self) -> Direction {
        self.core.direction()
    }

    fn position(&self) -> CursorNode {
        self.core.position()
    }
}
