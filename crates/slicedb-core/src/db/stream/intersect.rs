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

///
/// IntersectStream
///
/// Emits the columns whose merge point is present in every child.
/// Lagging children are seeked to the leading head instead of stepped,
/// so sparse overlaps converge in a few page fetches.
///

pub struct IntersectStream<'a> {
    core: MergeCore<'a>,
}

impl<'a> IntersectStream<'a> {
    pub fn new(key: MergeKey, children: Vec<ColumnStreamBox<'a>>) -> Result<Self, QueryError> {
        Ok(Self {
            core: MergeCore::new(MergeOperator::Intersect, key, children)?,
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

    // Leading head across all children, or None once any child is exhausted.
    fn leading_point(&self) -> Option<MergePoint> {
        let comparator = self.core.comparator();
        let mut leading: Option<&MergePoint> = None;

        for side in &self.core.sides {
            let point = side.head_point()?;
            if leading.is_none_or(|current| comparator.compare(point, current).is_gt()) {
                leading = Some(point);
            }
        }

        leading.cloned()
    }
}

impl ColumnStream for IntersectStream<'_> {
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        if self.core.is_done() {
            return Ok(None);
        }

        loop {
            self.core.fill_all()?;
            if self.core.sides.iter().any(|side| side.is_done()) {
                self.core.finish();
                return Ok(None);
            }

            let Some(target) = self.leading_point() else {
                self.core.finish();
                return Ok(None);
            };

            // Seek every lagging child up to the leading head.
            let comparator = self.core.comparator();
            let mut aligned = true;
            for index in 0..self.core.sides.len() {
                let behind = self.core.sides[index]
                    .head_point()
                    .is_some_and(|point| comparator.compare(point, &target).is_lt());
                if behind {
                    self.core.seek_side(index, &target, true)?;
                    aligned = false;
                }
            }
            if !aligned {
                continue;
            }

            let mut emitted = None;
            for side in &mut self.core.sides {
                let column = side.take();
                if emitted.is_none() {
                    emitted = column;
                }
            }

            if self.core.admit(target) {
                return Ok(emitted);
            }
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
