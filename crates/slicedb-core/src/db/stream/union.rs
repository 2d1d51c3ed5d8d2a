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
/// UnionStream
///
/// Emits the smallest head across children and advances only the children
/// positioned on it. Equal merge points from different children collapse
/// into one output column.
///

pub struct UnionStream<'a> {
    core: MergeCore<'a>,
}

impl<'a> UnionStream<'a> {
    pub fn new(key: MergeKey, children: Vec<ColumnStreamBox<'a>>) -> Result<Self, QueryError> {
        Ok(Self {
            core: MergeCore::new(MergeOperator::Union, key, children)?,
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

    fn lowest_point(&self) -> Option<MergePoint> {
        let comparator = self.core.comparator();

        self.core
            .sides
            .iter()
            .filter_map(|side| side.head_point())
            .min_by(|left, right| comparator.compare(left, right))
            .cloned()
    }
}

impl ColumnStream for UnionStream<'_> {
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        if self.core.is_done() {
            return Ok(None);
        }

        loop {
            self.core.fill_all()?;

            let Some(target) = self.lowest_point() else {
                self.core.finish();
                return Ok(None);
            };

            let comparator = self.core.comparator();
            let mut emitted = None;
            for side in &mut self.core.sides {
                let on_target = side
                    .head_point()
                    .is_some_and(|point| comparator.compare(point, &target).is_eq());
                if on_target {
                    let column = side.take();
                    if emitted.is_none() {
                        emitted = column;
                    }
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
