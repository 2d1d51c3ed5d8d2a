//! Module: executor
//! Responsibility: drive a planner-supplied operator tree one page at a time
//! and hand back a resumable cursor.
//! Does not own: tree construction (the planner's job) or storage access
//! beyond the `IndexStore` it is given.

mod build;
mod tree;


use crate::{
    config::ExecutionConfig,
    db::{
        QueryError,
        column::ScanColumn,
        cursor::{CursorError, CursorNode, CursorToken, TreeSignature},
        store::IndexStore,
        stream::{ColumnStream, ColumnStreamBox},
    },
    error::Error,
    obs::ScanTraceSink,
    types::EntityId,
};

pub use tree::{IndexLeaf, ScanTree};

///
/// Page
///
/// One fully valid page of results. `cursor` is `None` exactly when no
/// result follows this page.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page {
    pub entities: Vec<EntityId>,
    pub columns: Vec<ScanColumn>,
    pub cursor: Option<String>,
}

impl Page {
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.cursor.is_none()
    }
}

///
/// QueryExecutor
///

pub struct QueryExecutor<'a> {
    store: &'a dyn IndexStore,
    config: ExecutionConfig,
    trace: Option<&'a dyn ScanTraceSink>,
}

impl<'a> QueryExecutor<'a> {
    #[must_use]
    pub fn new(store: &'a dyn IndexStore) -> Self {
        Self {
            store,
            config: ExecutionConfig::default(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: &'a dyn ScanTraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// First page of `tree`.
    pub fn execute(&self, tree: &ScanTree, page_size: usize) -> Result<Page, Error> {
        self.execute_from(tree, None, page_size)
    }

    /// One page of `tree`, starting at `cursor` when given.
    ///
    /// Fails atomically: any error discards the partial page.
    pub fn execute_from(
        &self,
        tree: &ScanTree,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<Page, Error> {
        if page_size == 0 || page_size > self.config.max_page_size {
            return Err(QueryError::InvalidPageSize {
                requested: page_size,
                max: self.config.max_page_size,
            }
            .into());
        }

        let mut stream = match cursor {
            Some(token) => self.resume(tree, token)?,
            None => self.open(tree)?,
        };

        let mut columns = Vec::with_capacity(page_size);
        while columns.len() < page_size {
            match stream.next_column()? {
                Some(column) => columns.push(column),
                None => return Ok(page(columns, None)),
            }
        }

        // Snapshot before probing: the probe pulls one column past the page.
        let token = stream.encode_cursor()?;
        let more = stream.next_column()?.is_some();

        Ok(page(columns, more.then_some(token)))
    }

    /// Open `tree` from its start.
    pub fn open(&self, tree: &ScanTree) -> Result<TreeStream<'a>, Error> {
        tree.validate(&self.config)?;
        let root = build::build(self, tree, &CursorNode::Start)?;

        Ok(TreeStream::new(root, tree.signature()))
    }

    /// Reconstruct `tree` at the position carried by `token`.
    ///
    /// The token is fully checked against the tree before anything is built.
    pub fn resume(&self, tree: &ScanTree, token: &str) -> Result<TreeStream<'a>, Error> {
        tree.validate(&self.config)?;

        let decoded = CursorToken::decode(token, self.config.max_cursor_len)?;
        let signature = tree.signature();
        if decoded.signature() != signature {
            return Err(CursorError::invalid(format!(
                "cursor was taken from a different tree (expected {signature}, found {})",
                decoded.signature()
            ))
            .into());
        }

        let position = decoded.into_position();
        tree.check_position(&position)?;
        let root = build::build(self, tree, &position)?;

        Ok(TreeStream::new(root, signature))
    }
}

fn page(columns: Vec<ScanColumn>, cursor: Option<String>) -> Page {
    Page {
        entities: columns.iter().map(ScanColumn::entity_id).collect(),
        columns,
        cursor,
    }
}

///
/// TreeStream
///
/// Lazily driven result stream of one operator tree.
///

pub struct TreeStream<'a> {
    root: ColumnStreamBox<'a>,
    signature: TreeSignature,
    finished: bool,
    failure: Option<Error>,
}

impl<'a> TreeStream<'a> {
    fn new(root: ColumnStreamBox<'a>, signature: TreeSignature) -> Self {
        Self {
            root,
            signature,
            finished: false,
            failure: None,
        }
    }

    /// Pull the next result. A failure is terminal and repeats on every
    /// later pull.
    pub fn next_column(&mut self) -> Result<Option<ScanColumn>, Error> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.finished {
            return Ok(None);
        }

        match self.root.next_column() {
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Ok(next) => Ok(next),
            Err(err) => {
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn position(&self) -> CursorNode {
        self.root.position()
    }

    /// Token resuming right after the last emitted column, or `None` once
    /// the stream has reported its end.
    pub fn cursor(&self) -> Result<Option<String>, Error> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.finished {
            return Ok(None);
        }

        self.encode_cursor().map(Some)
    }

    fn encode_cursor(&self) -> Result<String, Error> {
        let token = CursorToken::new(self.signature, self.position());

        Ok(token.encode()?)
    }
}

impl Iterator for TreeStream<'_> {
    type Item = Result<ScanColumn, Error>;

    // Fused: the error is yielded once, then iteration ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() {
            return None;
        }

        self.next_column().transpose()
    }
}
