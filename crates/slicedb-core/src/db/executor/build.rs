use crate::{
    db::{
        cursor::{CursorError, CursorNode},
        executor::{IndexLeaf, QueryExecutor, ScanTree},
        scan::IndexScan,
        stream::{ColumnStreamBox, IntersectStream, MergePoint, NegateStream, UnionStream},
    },
    error::Error,
};

///
/// MergeStart
///
/// Where a merge node resumes: its last emitted point, one position per
/// child and whether the node was already exhausted.
///

struct MergeStart<'a> {
    last: Option<MergePoint>,
    children: Vec<ColumnStreamBox<'a>>,
    done: bool,
}

/// Build the stream for `tree` positioned at `position`.
///
/// `position` must already have passed `ScanTree::check_position`.
pub(super) fn build<'a>(
    executor: &QueryExecutor<'a>,
    tree: &ScanTree,
    position: &CursorNode,
) -> Result<ColumnStreamBox<'a>, Error> {
    let stream: ColumnStreamBox<'a> = match tree {
        ScanTree::Leaf(leaf) => Box::new(build_leaf(executor, leaf, position)?),
        ScanTree::Intersect { key, .. } => {
            let start = build_children(executor, tree, position)?;
            let mut stream = IntersectStream::new(*key, start.children)?;
            if let Some(last) = start.last {
                stream = stream.resume_after(last);
            }
            if start.done {
                stream = stream.finished();
            }

            Box::new(stream)
        }
        ScanTree::Union { key, .. } => {
            let start = build_children(executor, tree, position)?;
            let mut stream = UnionStream::new(*key, start.children)?;
            if let Some(last) = start.last {
                stream = stream.resume_after(last);
            }
            if start.done {
                stream = stream.finished();
            }

            Box::new(stream)
        }
        ScanTree::Not { key, .. } => {
            let start = build_children(executor, tree, position)?;
            let mut children = start.children.into_iter();
            let (Some(positive), Some(subtract)) = (children.next(), children.next()) else {
                return Err(CursorError::invalid("negation requires two child positions").into());
            };
            let mut stream = NegateStream::new(*key, positive, subtract)?;
            if let Some(last) = start.last {
                stream = stream.resume_after(last);
            }
            if start.done {
                stream = stream.finished();
            }

            Box::new(stream)
        }
    };

    Ok(stream)
}

fn build_leaf<'a>(
    executor: &QueryExecutor<'a>,
    leaf: &IndexLeaf,
    position: &CursorNode,
) -> Result<IndexScan<'a>, Error> {
    let scan = IndexScan::new(
        executor.store,
        leaf.row.clone(),
        leaf.kind,
        leaf.layout,
        leaf.range.clone(),
    )
    .with_policy(executor.config.malformed_columns)
    .with_trace(executor.trace);

    match position {
        CursorNode::Start => Ok(scan),
        CursorNode::After(raw) => Ok(scan.resume_after(raw.clone())),
        CursorNode::Done => Ok(scan.finished()),
        CursorNode::Merge { .. } => {
            Err(CursorError::invalid("merge position supplied for an index leaf").into())
        }
    }
}

fn build_children<'a>(
    executor: &QueryExecutor<'a>,
    tree: &ScanTree,
    position: &CursorNode,
) -> Result<MergeStart<'a>, Error> {
    let (_, nodes) = tree.merge_parts();
    let (last, positions, done) = match position {
        CursorNode::Start => (None, vec![CursorNode::Start; nodes.len()], false),
        CursorNode::Done => (None, vec![CursorNode::Done; nodes.len()], true),
        CursorNode::Merge { last, children, .. } => (last.clone(), children.clone(), false),
        CursorNode::After(_) => {
            return Err(CursorError::invalid("leaf position supplied for a merge node").into());
        }
    };

    let mut children = Vec::with_capacity(nodes.len());
    for (node, child_position) in nodes.into_iter().zip(&positions) {
        children.push(build(executor, node, child_position)?);
    }

    Ok(MergeStart {
        last,
        children,
        done,
    })
}
