use crate::{
    db::{
        Direction, QueryError,
        column::ScanColumn,
        cursor::CursorNode,
        stream::{ColumnStreamBox, MergeComparator, MergeKey, MergeOperator, MergePoint},
    },
    error::Error,
    value::{Value, ValueTag},
};

///
/// StreamSide
///
/// One child stream plus its lookahead. `consumed` is the child position
/// that excludes the buffered head, so a cursor taken mid-merge never
/// loses a column the parent has not emitted yet. `kind` is the sort
/// value kind of the first head, recorded only under `MergeKey::SortValue`.
///

pub(super) struct StreamSide<'a> {
    stream: ColumnStreamBox<'a>,
    head: Option<(MergePoint, ScanColumn)>,
    done: bool,
    last_point: Option<MergePoint>,
    consumed: CursorNode,
    kind: Option<ValueTag>,
}

impl<'a> StreamSide<'a> {
    fn new(stream: ColumnStreamBox<'a>) -> Self {
        let consumed = stream.position();

        Self {
            stream,
            head: None,
            done: false,
            last_point: None,
            consumed,
            kind: None,
        }
    }

    // Ensure one lookahead column is buffered unless the child is exhausted.
    fn fill(&mut self, comparator: MergeComparator, operator: MergeOperator) -> Result<(), Error> {
        if self.done || self.head.is_some() {
            return Ok(());
        }

        let before = self.stream.position();
        match self.stream.next_column()? {
            Some(column) => {
                let point = comparator.point(&column);
                if let Some(previous) = &self.last_point
                    && comparator.violates_monotonicity(previous, &point)
                {
                    return Err(QueryError::OutOfOrder {
                        operator: operator.label(),
                    }
                    .into());
                }

                if self.kind.is_none() {
                    self.kind = point.sort_value().map(Value::tag);
                }
                self.last_point = Some(point.clone());
                self.head = Some((point, column));
                self.consumed = before;
            }
            None => {
                self.done = true;
                self.consumed = CursorNode::Done;
            }
        }

        Ok(())
    }

    pub(super) fn head_point(&self) -> Option<&MergePoint> {
        self.head.as_ref().map(|(point, _)| point)
    }

    pub(super) const fn is_done(&self) -> bool {
        self.done
    }

    const fn kind(&self) -> Option<ValueTag> {
        self.kind
    }

    pub(super) fn take(&mut self) -> Option<ScanColumn> {
        self.head.take().map(|(_, column)| column)
    }

    // Drop the head if it lies behind `target`, then seek the child.
    fn seek(
        &mut self,
        target: &MergePoint,
        inclusive: bool,
        comparator: MergeComparator,
    ) -> Result<(), Error> {
        if self.done {
            return Ok(());
        }

        if let Some((point, _)) = &self.head {
            let ord = comparator.compare(point, target);
            let behind = if inclusive { ord.is_lt() } else { ord.is_le() };
            if !behind {
                return Ok(());
            }
            self.head = None;
        }

        self.stream.seek(target, inclusive)
    }
}

///
/// MergeCore
///
/// State shared by every merge operator: the children, their comparator,
/// the last emitted point and an optional pending resume target.
/// Under `MergeKey::SortValue` every child must lead with one sort value
/// kind; points of different kinds never compare equal.
///

pub(super) struct MergeCore<'a> {
    operator: MergeOperator,
    comparator: MergeComparator,
    pub(super) sides: Vec<StreamSide<'a>>,
    last: Option<MergePoint>,
    resume: Option<MergePoint>,
    kind: Option<ValueTag>,
    done: bool,
}

impl<'a> MergeCore<'a> {
    pub(super) fn new(
        operator: MergeOperator,
        key: MergeKey,
        children: Vec<ColumnStreamBox<'a>>,
    ) -> Result<Self, QueryError> {
        let direction = common_direction(&children)?;
        let sides = children.into_iter().map(StreamSide::new).collect();

        Ok(Self {
            operator,
            comparator: MergeComparator::new(key, direction),
            sides,
            last: None,
            resume: None,
            kind: None,
            done: false,
        })
    }

    pub(super) const fn comparator(&self) -> MergeComparator {
        self.comparator
    }

    pub(super) const fn is_done(&self) -> bool {
        self.done
    }

    pub(super) const fn finish(&mut self) {
        self.done = true;
    }

    /// Continue strictly after `last`; children are positioned lazily on
    /// the first pull.
    pub(super) fn resume_after(&mut self, last: MergePoint) {
        self.last = Some(last.clone());
        self.resume = Some(last);
    }

    // Apply a pending resume target, then top up every side's lookahead.
    pub(super) fn fill_all(&mut self) -> Result<(), Error> {
        if let Some(target) = self.resume.take() {
            self.seek_all(&target, false)?;
        }

        for index in 0..self.sides.len() {
            self.fill(index)?;
        }

        Ok(())
    }

    pub(super) fn fill(&mut self, index: usize) -> Result<(), Error> {
        let (comparator, operator) = (self.comparator, self.operator);

        self.sides[index].fill(comparator, operator)?;
        self.check_kind(index)?;

        Ok(())
    }

    fn check_kind(&mut self, index: usize) -> Result<(), QueryError> {
        let Some(found) = self.sides[index].kind() else {
            return Ok(());
        };

        match self.kind {
            None => self.kind = Some(found),
            Some(expected) if expected != found => {
                return Err(QueryError::MixedSortKinds {
                    operator: self.operator.label(),
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }

        Ok(())
    }

    pub(super) fn seek_side(
        &mut self,
        index: usize,
        target: &MergePoint,
        inclusive: bool,
    ) -> Result<(), Error> {
        let comparator = self.comparator;

        self.sides[index].seek(target, inclusive, comparator)
    }

    pub(super) fn seek_all(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        if self.done {
            return Ok(());
        }

        for index in 0..self.sides.len() {
            self.seek_side(index, target, inclusive)?;
        }

        Ok(())
    }

    /// Seek entry point for a parent: a pending resume is folded in first
    /// so the node never moves behind its own cursor.
    pub(super) fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        if let Some(pending) = self.resume.take() {
            self.seek_all(&pending, false)?;
        }

        self.seek_all(target, inclusive)
    }

    /// Record `point` as emitted unless it repeats the last emitted point.
    pub(super) fn admit(&mut self, point: MergePoint) -> bool {
        if self
            .last
            .as_ref()
            .is_some_and(|last| self.comparator.compare(last, &point).is_ge())
        {
            return false;
        }

        self.last = Some(point);
        true
    }

    pub(super) fn direction(&self) -> Direction {
        self.comparator.direction()
    }

    pub(super) fn position(&self) -> CursorNode {
        if self.done {
            return CursorNode::Done;
        }

        CursorNode::Merge {
            operator: self.operator,
            last: self.last.clone(),
            children: self
                .sides
                .iter()
                .map(|side| side.consumed.clone())
                .collect(),
        }
    }
}

// Shared traversal direction of a merge node's children.
fn common_direction(children: &[ColumnStreamBox<'_>]) -> Result<Direction, QueryError> {
    let Some(first) = children.first() else {
        return Err(QueryError::InvalidTree {
            reason: "merge node has no children",
        });
    };
    let expected = first.direction();

    for child in &children[1..] {
        let found = child.direction();
        if found != expected {
            return Err(QueryError::InconsistentOrdering { expected, found });
        }
    }

    Ok(expected)
}
