//! Module: scan
//! Responsibility: lazy, paged, resumable scan of one index row range.
//! Does not own: merge semantics or cursor encoding.
//! Boundary: the only caller of `IndexStore::fetch_page`.

mod range;

#[cfg(test)]
mod tests;

use crate::{
    config::MalformedColumnPolicy,
    db::{
        Direction,
        column::{ColumnParser, IndexKind, ScanColumn},
        cursor::CursorNode,
        key::{ComponentEquality, CompositeKey, RawKey},
        store::{IndexStore, PageRequest},
        stream::{ColumnStream, MergePoint},
    },
    error::Error,
    obs::{ScanTraceEvent, ScanTraceSink, emit},
    types::RowKey,
};
use std::{collections::VecDeque, ops::Bound};

pub use range::{DEFAULT_FETCH_SIZE, ScanRange};

///
/// ScanState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    Unopened,
    Fetching,
    Buffered,
    Exhausted,
    Failed,
}

///
/// IndexScan
///
/// Pull-driven scan over one index row. Pages are fetched on demand; each
/// refetch starts strictly after the last raw key the store returned. The
/// only suspension point is the page fetch.
///
/// A failure is terminal: the same error is returned on every later pull.
///

pub struct IndexScan<'a> {
    store: &'a dyn IndexStore,
    row: RowKey,
    parser: ColumnParser,
    range: ScanRange,
    direction: Direction,
    lower: Bound<RawKey>,
    upper: Bound<RawKey>,
    buffer: VecDeque<ScanColumn>,
    state: ScanState,
    more: bool,
    last_emitted: Option<RawKey>,
    template: Option<RawKey>,
    failure: Option<Error>,
    policy: MalformedColumnPolicy,
    trace: Option<&'a dyn ScanTraceSink>,
}

impl<'a> IndexScan<'a> {
    /// `layout` is the direction the row stores its sort component in.
    #[must_use]
    pub fn new(
        store: &'a dyn IndexStore,
        row: RowKey,
        kind: IndexKind,
        layout: Direction,
        range: ScanRange,
    ) -> Self {
        Self {
            store,
            row,
            parser: ColumnParser::new(kind),
            direction: layout.traversed(range.reversed),
            lower: range.lower_bound(),
            upper: range.upper_bound(),
            range,
            buffer: VecDeque::new(),
            state: ScanState::Unopened,
            more: true,
            last_emitted: None,
            template: None,
            failure: None,
            policy: MalformedColumnPolicy::Fail,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: MalformedColumnPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: Option<&'a dyn ScanTraceSink>) -> Self {
        self.trace = trace;
        self
    }

    /// Continue strictly after `raw`, the last column a previous scan emitted.
    #[must_use]
    pub fn resume_after(mut self, raw: RawKey) -> Self {
        *self.start_side_mut() = Bound::Excluded(raw.clone());
        self.last_emitted = Some(raw);
        self
    }

    /// A scan that was already exhausted when its cursor was taken.
    #[must_use]
    pub fn finished(mut self) -> Self {
        self.state = ScanState::Exhausted;
        self.more = false;
        self
    }

    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    #[must_use]
    pub const fn row(&self) -> &RowKey {
        &self.row
    }

    #[must_use]
    pub const fn last_emitted(&self) -> Option<&RawKey> {
        self.last_emitted.as_ref()
    }

    /// Pull the next column, fetching a page when the buffer runs dry.
    pub fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        loop {
            match self.state {
                ScanState::Failed => return Err(self.failed_error()),
                ScanState::Exhausted => return Ok(None),
                _ => {}
            }

            if let Some(column) = self.buffer.pop_front() {
                self.state = ScanState::Buffered;
                self.last_emitted = Some(column.raw_key().clone());
                return Ok(Some(column));
            }

            if self.state != ScanState::Unopened && !self.more {
                self.exhaust();
                return Ok(None);
            }

            self.fetch()?;
        }
    }

    /// Narrow the traversal start to `key`. Buffered columns behind `key`
    /// are dropped; a bound that would move backwards is ignored.
    pub fn seek_to(&mut self, key: &CompositeKey, inclusive: bool) {
        let raw = key.encode();
        let reversed = self.range.reversed;

        while let Some(front) = self.buffer.front() {
            let ahead = if reversed {
                front.raw_key() < &raw || (inclusive && front.raw_key() == &raw)
            } else {
                front.raw_key() > &raw || (inclusive && front.raw_key() == &raw)
            };
            if ahead {
                return;
            }
            self.buffer.pop_front();
        }

        let candidate = if inclusive {
            Bound::Included(raw)
        } else {
            Bound::Excluded(raw)
        };
        if tightens(self.start_side(), &candidate, reversed) {
            *self.start_side_mut() = candidate;
            emit(
                self.trace,
                ScanTraceEvent::Seek {
                    row: self.row.clone(),
                },
            );
        }
    }

    // Fetch one page from the current start bound and parse it into the buffer.
    fn fetch(&mut self) -> Result<(), Error> {
        self.state = ScanState::Fetching;

        let request = PageRequest {
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            reversed: self.range.reversed,
            limit: self.range.page_size,
        };
        let page = match self.store.fetch_page(&self.row, &request) {
            Ok(page) => page,
            Err(err) => return Err(self.fail(err.into())),
        };

        emit(
            self.trace,
            ScanTraceEvent::PageFetched {
                row: self.row.clone(),
                requested: request.limit,
                returned: page.len(),
            },
        );

        let full = page.len() >= request.limit;
        let mut passed_end = false;
        let mut last_raw = None;

        for raw in page {
            if !request.contains(&raw) {
                passed_end = true;
                break;
            }

            match self.parser.parse(&raw) {
                Ok(column) => {
                    self.template = Some(raw.clone());
                    self.buffer.push_back(column);
                }
                Err(err) => match self.policy {
                    MalformedColumnPolicy::Fail => return Err(self.fail(err.into())),
                    MalformedColumnPolicy::SkipAndTrace => emit(
                        self.trace,
                        ScanTraceEvent::MalformedSkipped {
                            row: self.row.clone(),
                            reason: err,
                        },
                    ),
                },
            }
            last_raw = Some(raw);
        }

        if let Some(raw) = last_raw {
            *self.start_side_mut() = Bound::Excluded(raw);
        }
        self.more = full && !passed_end;
        self.state = ScanState::Buffered;

        Ok(())
    }

    fn seek_point(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        loop {
            match self.state {
                ScanState::Failed => return Err(self.failed_error()),
                ScanState::Exhausted => return Ok(()),
                _ => {}
            }

            while let Some(front) = self.buffer.front() {
                let ord = target.locate(front, self.direction);
                let behind = if inclusive { ord.is_lt() } else { ord.is_le() };
                if !behind {
                    return Ok(());
                }
                self.buffer.pop_front();
            }

            if self.state != ScanState::Unopened && !self.more {
                return Ok(());
            }

            // The seek key reuses a real column of this row as its template.
            let Some(template) = self.template.as_ref() else {
                self.fetch()?;
                continue;
            };
            let template = match template.decode() {
                Ok(template) => template,
                Err(err) => return Err(self.fail(err.into())),
            };
            let key = match self.parser.seek_key(
                &template,
                target.sort_value(),
                target.entity_id(),
            ) {
                Ok(key) => key,
                Err(err) => return Err(self.fail(err.into())),
            };

            let marker = match (self.range.reversed, inclusive) {
                (false, true) | (true, false) => ComponentEquality::Less,
                (false, false) | (true, true) => ComponentEquality::Greater,
            };
            self.seek_to(&key.with_equality(marker), true);

            return Ok(());
        }
    }

    const fn start_side(&self) -> &Bound<RawKey> {
        if self.range.reversed {
            &self.upper
        } else {
            &self.lower
        }
    }

    const fn start_side_mut(&mut self) -> &mut Bound<RawKey> {
        if self.range.reversed {
            &mut self.upper
        } else {
            &mut self.lower
        }
    }

    fn exhaust(&mut self) {
        self.state = ScanState::Exhausted;
        emit(
            self.trace,
            ScanTraceEvent::Exhausted {
                row: self.row.clone(),
            },
        );
    }

    fn fail(&mut self, err: Error) -> Error {
        self.state = ScanState::Failed;
        self.buffer.clear();
        self.failure = Some(err.clone());
        emit(
            self.trace,
            ScanTraceEvent::Failed {
                row: self.row.clone(),
            },
        );

        err
    }

    fn failed_error(&self) -> Error {
        self.failure.clone().unwrap_or_else(|| {
            crate::db::QueryError::InvalidTree {
                reason: "index scan failed without a recorded error",
            }
            .into()
        })
    }
}

impl ColumnStream for IndexScan<'_> {
    fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        Self::next_column(self)
    }

    fn seek(&mut self, target: &MergePoint, inclusive: bool) -> Result<(), Error> {
        self.seek_point(target, inclusive)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn position(&self) -> CursorNode {
        match (&self.state, &self.last_emitted) {
            (ScanState::Exhausted, _) => CursorNode::Done,
            (_, Some(raw)) => CursorNode::After(raw.clone()),
            (_, None) => CursorNode::Start,
        }
    }
}

// Whether `candidate` starts strictly later than `current` in traversal order.
fn tightens(current: &Bound<RawKey>, candidate: &Bound<RawKey>, reversed: bool) -> bool {
    let (current_key, current_excluded) = match current {
        Bound::Unbounded => return true,
        Bound::Included(key) => (key, false),
        Bound::Excluded(key) => (key, true),
    };
    let (candidate_key, candidate_excluded) = match candidate {
        Bound::Unbounded => return false,
        Bound::Included(key) => (key, false),
        Bound::Excluded(key) => (key, true),
    };

    if candidate_key == current_key {
        return candidate_excluded && !current_excluded;
    }

    if reversed {
        candidate_key < current_key
    } else {
        candidate_key > current_key
    }
}
