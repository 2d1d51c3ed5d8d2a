use crate::{
    config::ExecutionConfig,
    db::{
        Direction, QueryError,
        column::{ColumnParser, IndexKind},
        cursor::{CursorError, CursorNode, TreeSignature},
        key::CompositeKey,
        scan::ScanRange,
        stream::{MergeKey, MergeOperator},
    },
    types::RowKey,
};
use sha2::{Digest, Sha256};

///
/// IndexLeaf
///
/// One index row scan. `layout` is the direction the row stores its sort
/// component in; the leaf's output direction also folds in `range.reversed`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexLeaf {
    pub row: RowKey,
    pub kind: IndexKind,
    pub layout: Direction,
    pub range: ScanRange,
}

impl IndexLeaf {
    #[must_use]
    pub fn new(row: impl Into<RowKey>, kind: IndexKind, range: ScanRange) -> Self {
        Self {
            row: row.into(),
            kind,
            layout: Direction::Asc,
            range,
        }
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: Direction) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.layout.traversed(self.range.reversed)
    }
}

///
/// ScanTree
///
/// Operator tree supplied by the planner. The same tree must be supplied
/// again to resume from a cursor taken on it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanTree {
    Leaf(IndexLeaf),
    Intersect {
        key: MergeKey,
        children: Vec<Self>,
    },
    Union {
        key: MergeKey,
        children: Vec<Self>,
    },
    Not {
        key: MergeKey,
        positive: Box<Self>,
        subtract: Box<Self>,
    },
}

impl ScanTree {
    #[must_use]
    pub const fn leaf(leaf: IndexLeaf) -> Self {
        Self::Leaf(leaf)
    }

    #[must_use]
    pub const fn intersect(key: MergeKey, children: Vec<Self>) -> Self {
        Self::Intersect { key, children }
    }

    #[must_use]
    pub const fn union(key: MergeKey, children: Vec<Self>) -> Self {
        Self::Union { key, children }
    }

    #[must_use]
    pub fn not(key: MergeKey, positive: Self, subtract: Self) -> Self {
        Self::Not {
            key,
            positive: Box::new(positive),
            subtract: Box::new(subtract),
        }
    }

    #[must_use]
    pub const fn operator(&self) -> Option<MergeOperator> {
        match self {
            Self::Leaf(_) => None,
            Self::Intersect { .. } => Some(MergeOperator::Intersect),
            Self::Union { .. } => Some(MergeOperator::Union),
            Self::Not { .. } => Some(MergeOperator::Not),
        }
    }

    /// Check shape preconditions and return the tree's output direction.
    pub fn validate(&self, config: &ExecutionConfig) -> Result<Direction, QueryError> {
        match self {
            Self::Leaf(leaf) => {
                let requested = leaf.range.page_size;
                if requested == 0 || requested > config.max_fetch_size {
                    return Err(QueryError::InvalidPageSize {
                        requested,
                        max: config.max_fetch_size,
                    });
                }

                Ok(leaf.direction())
            }
            Self::Intersect { children, .. } | Self::Union { children, .. } => {
                let Some((first, rest)) = children.split_first() else {
                    return Err(QueryError::InvalidTree {
                        reason: "merge node has no children",
                    });
                };
                let expected = first.validate(config)?;
                for child in rest {
                    let found = child.validate(config)?;
                    if found != expected {
                        return Err(QueryError::InconsistentOrdering { expected, found });
                    }
                }

                Ok(expected)
            }
            Self::Not {
                positive, subtract, ..
            } => {
                let expected = positive.validate(config)?;
                let found = subtract.validate(config)?;
                if found != expected {
                    return Err(QueryError::InconsistentOrdering { expected, found });
                }

                Ok(expected)
            }
        }
    }

    /// Fingerprint of everything a position depends on. Fetch sizes are
    /// excluded so they can be tuned between pages.
    #[must_use]
    pub fn signature(&self) -> TreeSignature {
        let mut hasher = Sha256::new();
        hasher.update(b"scantree:v2");
        hash_tree(&mut hasher, self);

        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        TreeSignature::from_bytes(out)
    }

    /// Structural check of a decoded position against this tree.
    pub(super) fn check_position(&self, position: &CursorNode) -> Result<(), CursorError> {
        match (self, position) {
            (_, CursorNode::Start | CursorNode::Done) => Ok(()),
            (Self::Leaf(leaf), CursorNode::After(raw)) => ColumnParser::new(leaf.kind)
                .parse(raw)
                .map(|_| ())
                .map_err(|err| CursorError::invalid(format!("leaf position: {err}"))),
            (Self::Leaf(_), CursorNode::Merge { .. }) => {
                Err(CursorError::invalid("merge position supplied for an index leaf"))
            }
            (_, CursorNode::After(_)) => {
                Err(CursorError::invalid("leaf position supplied for a merge node"))
            }
            (
                _,
                CursorNode::Merge {
                    operator,
                    last,
                    children,
                },
            ) => {
                let (key, nodes) = self.merge_parts();
                if Some(*operator) != self.operator() {
                    return Err(CursorError::invalid(format!(
                        "cursor operator {} does not match tree",
                        operator.label()
                    )));
                }
                if children.len() != nodes.len() {
                    return Err(CursorError::invalid(format!(
                        "cursor has {} child positions, tree has {} children",
                        children.len(),
                        nodes.len()
                    )));
                }
                if let Some(last) = last {
                    let shaped = match key {
                        MergeKey::SortValue => last.sort_value().is_some(),
                        MergeKey::EntityId => last.sort_value().is_none(),
                    };
                    if !shaped {
                        return Err(CursorError::invalid(
                            "cursor merge point does not match the merge key",
                        ));
                    }
                }

                for (node, child) in nodes.iter().zip(children) {
                    node.check_position(child)?;
                }

                Ok(())
            }
        }
    }

    // Merge key and children in cursor order; leaves have neither.
    pub(super) fn merge_parts(&self) -> (MergeKey, Vec<&Self>) {
        match self {
            Self::Leaf(_) => (MergeKey::default(), Vec::new()),
            Self::Intersect { key, children } | Self::Union { key, children } => {
                (*key, children.iter().collect())
            }
            Self::Not {
                key,
                positive,
                subtract,
            } => (*key, vec![positive.as_ref(), subtract.as_ref()]),
        }
    }
}

impl From<IndexLeaf> for ScanTree {
    fn from(leaf: IndexLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

///
/// Hash one tree node and its descendants into the signature stream.
///

fn hash_tree(hasher: &mut Sha256, tree: &ScanTree) {
    match tree {
        ScanTree::Leaf(leaf) => {
            write_tag(hasher, 0x10);
            write_bytes(hasher, leaf.row.as_bytes());
            write_tag(hasher, leaf.kind.tag());
            write_tag(hasher, direction_tag(leaf.layout));
            write_bound(hasher, leaf.range.start.as_ref(), leaf.range.start_inclusive);
            write_bound(hasher, leaf.range.end.as_ref(), leaf.range.end_inclusive);
            write_tag(hasher, u8::from(leaf.range.reversed));
        }
        _ => {
            let (key, children) = tree.merge_parts();
            write_tag(hasher, 0x20);
            write_tag(hasher, tree.operator().map_or(0, MergeOperator::tag));
            write_tag(hasher, key.tag());
            write_len(hasher, children.len());
            for child in children {
                hash_tree(hasher, child);
            }
        }
    }
}

fn write_bound(hasher: &mut Sha256, key: Option<&CompositeKey>, inclusive: bool) {
    match key {
        None => write_tag(hasher, 0x00),
        Some(key) => {
            write_tag(hasher, if inclusive { 0x01 } else { 0x02 });
            write_bytes(hasher, key.encode().as_bytes());
        }
    }
}

const fn direction_tag(direction: Direction) -> u8 {
    match direction {
        Direction::Asc => 0x00,
        Direction::Desc => 0x01,
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

// Length frame: u64 big-endian.
fn write_len(hasher: &mut Sha256, len: usize) {
    let len = u64::try_from(len).unwrap_or(u64::MAX);
    hasher.update(len.to_be_bytes());
}

fn write_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    write_len(hasher, bytes.len());
    hasher.update(bytes);
}
