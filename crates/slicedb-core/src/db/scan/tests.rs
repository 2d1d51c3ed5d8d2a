use crate::{
    config::MalformedColumnPolicy,
    db::{
        Direction,
        column::IndexKind,
        cursor::CursorNode,
        key::{CodecError, CompositeKey, RawKey},
        scan::{IndexScan, ScanRange, ScanState},
        store::MemoryIndexStore,
        stream::{ColumnStream, MergePoint},
    },
    error::Error,
    obs::ScanTraceEvent,
    test_support::{
        AGE_ROW, ENTITIES_ROW, FaultyStore, RecordingSink, age_store, id, insert_entity,
        secondary_key,
    },
    types::{EntityId, RowKey},
    value::Value,
};

fn drain(scan: &mut IndexScan<'_>) -> Vec<(EntityId, Value)> {
    let mut out = Vec::new();
    while let Some(column) = scan.next_column().expect("scan should not fail") {
        out.push((column.entity_id(), column.sort_value().clone()));
    }

    out
}

fn age_range(lower: i64, upper: i64) -> ScanRange {
    ScanRange::values(
        &CompositeKey::new().with("age"),
        Some((Value::Int(lower), true)),
        Some((Value::Int(upper), true)),
    )
}

fn entities_store(count: u128) -> MemoryIndexStore {
    let store = MemoryIndexStore::new();
    for n in 1..=count {
        insert_entity(&store, ENTITIES_ROW, id(n));
    }

    store
}

#[test]
fn value_range_yields_matching_entities_in_id_order() {
    let store = age_store();
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        age_range(15, 30),
    );

    assert_eq!(
        drain(&mut scan),
        vec![(id(2), Value::Int(20)), (id(3), Value::Int(20))]
    );
}

#[test]
fn repeated_scans_return_the_same_tie_order() {
    let store = age_store();
    let scan_once = || {
        let mut scan = IndexScan::new(
            &store,
            RowKey::from(AGE_ROW),
            IndexKind::SecondaryValue,
            Direction::Asc,
            age_range(15, 30).with_page_size(1),
        );
        drain(&mut scan)
    };

    assert_eq!(scan_once(), scan_once());
}

#[test]
fn exclusive_value_bounds_drop_boundary_values() {
    let store = age_store();
    let range = ScanRange::values(
        &CompositeKey::new().with("age"),
        Some((Value::Int(10), false)),
        Some((Value::Int(20), false)),
    );
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        range,
    );

    assert!(drain(&mut scan).is_empty());
}

#[test]
fn reversed_scan_walks_down_from_the_end_bound() {
    let store = age_store();
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        ScanRange::prefix(CompositeKey::new().with("age")).reversed(true),
    );

    assert_eq!(ColumnStream::direction(&scan), Direction::Desc);
    assert_eq!(
        drain(&mut scan),
        vec![
            (id(3), Value::Int(20)),
            (id(2), Value::Int(20)),
            (id(1), Value::Int(10)),
        ]
    );
}

#[test]
fn short_page_exhausts_without_another_fetch() {
    let store = FaultyStore::new(entities_store(3));
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all().with_page_size(2),
    );
    assert_eq!(scan.state(), ScanState::Unopened);

    scan.next_column().expect("first pull").expect("column");
    assert_eq!(scan.state(), ScanState::Buffered);
    assert_eq!(store.fetches(), 1);

    assert_eq!(drain(&mut scan).len(), 2);
    assert_eq!(scan.state(), ScanState::Exhausted);
    assert_eq!(store.fetches(), 2);

    assert!(scan.next_column().expect("exhausted pull").is_none());
    assert_eq!(store.fetches(), 2);
}

#[test]
fn full_pages_refetch_strictly_after_last_key() {
    let store = FaultyStore::new(entities_store(4));
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all().with_page_size(2),
    );

    let ids: Vec<_> = drain(&mut scan).into_iter().map(|(entity, _)| entity).collect();

    assert_eq!(ids, vec![id(1), id(2), id(3), id(4)]);
    // two full pages, then an empty one to prove the end
    assert_eq!(store.fetches(), 3);
}

#[test]
fn resume_after_continues_past_the_emitted_key() {
    let store = entities_store(5);
    let last = CompositeKey::new().with(id(2)).encode();
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all(),
    )
    .resume_after(last.clone());

    assert_eq!(scan.position(), CursorNode::After(last));
    let ids: Vec<_> = drain(&mut scan).into_iter().map(|(entity, _)| entity).collect();
    assert_eq!(ids, vec![id(3), id(4), id(5)]);
}

#[test]
fn position_tracks_emitted_columns() {
    let store = entities_store(2);
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all(),
    );
    assert_eq!(scan.position(), CursorNode::Start);

    let first = scan.next_column().expect("pull").expect("column");
    assert_eq!(scan.position(), CursorNode::After(first.raw_key().clone()));

    drain(&mut scan);
    assert_eq!(scan.position(), CursorNode::Done);
}

#[test]
fn seek_to_before_first_pull_narrows_start() {
    let store = entities_store(5);
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all(),
    );

    scan.seek_to(&CompositeKey::new().with(id(3)), true);
    let ids: Vec<_> = drain(&mut scan).into_iter().map(|(entity, _)| entity).collect();

    assert_eq!(ids, vec![id(3), id(4), id(5)]);
}

#[test]
fn seek_to_never_moves_backwards() {
    let store = entities_store(5);
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all(),
    );

    scan.seek_to(&CompositeKey::new().with(id(4)), false);
    scan.seek_to(&CompositeKey::new().with(id(2)), true);
    let ids: Vec<_> = drain(&mut scan).into_iter().map(|(entity, _)| entity).collect();

    assert_eq!(ids, vec![id(5)]);
}

#[test]
fn merge_seek_jumps_with_a_single_fetch() {
    let store = FaultyStore::new(entities_store(100));
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all().with_page_size(5),
    );

    scan.next_column().expect("first pull");
    ColumnStream::seek(&mut scan, &MergePoint::new(None, id(80)), true).expect("seek");
    let column = scan.next_column().expect("pull").expect("column");

    assert_eq!(column.entity_id(), id(80));
    assert_eq!(store.fetches(), 2);
}

#[test]
fn exclusive_merge_seek_on_reversed_scan_skips_target() {
    let store = entities_store(10);
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all().reversed(true).with_page_size(2),
    );

    ColumnStream::seek(&mut scan, &MergePoint::new(None, id(6)), false).expect("seek");
    let ids: Vec<_> = drain(&mut scan).into_iter().map(|(entity, _)| entity).collect();

    assert_eq!(ids, vec![id(5), id(4), id(3), id(2), id(1)]);
}

#[test]
fn malformed_column_fails_by_default_and_stays_failed() {
    let store = age_store();
    store.insert(AGE_ROW, &CompositeKey::new().with("age"));
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        ScanRange::all(),
    );

    let err = scan.next_column().expect_err("malformed column should fail");
    assert!(matches!(err, Error::Codec(CodecError::Malformed { .. })));
    assert_eq!(scan.state(), ScanState::Failed);

    let again = scan.next_column().expect_err("failure is terminal");
    assert_eq!(again.to_string(), err.to_string());
}

#[test]
fn malformed_column_skip_policy_traces_and_continues() {
    let store = age_store();
    store.insert(AGE_ROW, &CompositeKey::new().with("age"));
    let sink = RecordingSink::default();
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        ScanRange::all(),
    )
    .with_policy(MalformedColumnPolicy::SkipAndTrace)
    .with_trace(Some(&sink));

    assert_eq!(drain(&mut scan).len(), 3);
    assert_eq!(
        sink.count(|event| matches!(event, ScanTraceEvent::MalformedSkipped { .. })),
        1
    );
}

#[test]
fn store_failure_is_terminal_and_traced() {
    let store = FaultyStore::new(entities_store(4)).failing(ENTITIES_ROW, 1);
    let sink = RecordingSink::default();
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all().with_page_size(2),
    )
    .with_trace(Some(&sink));

    assert!(scan.next_column().expect("first page").is_some());
    assert!(scan.next_column().expect("buffered").is_some());
    let err = scan.next_column().expect_err("second page fails");
    assert!(matches!(err, Error::Store(_)));
    assert_eq!(scan.state(), ScanState::Failed);

    let fetches = store.fetches();
    assert!(scan.next_column().is_err());
    assert_eq!(store.fetches(), fetches, "failed scans are not retried");
    assert_eq!(
        sink.count(|event| matches!(event, ScanTraceEvent::Failed { .. })),
        1
    );
}

#[test]
fn columns_beyond_the_end_bound_stop_the_scan() {
    let store = age_store();
    let range = ScanRange::all().to(secondary_key("age", 10_i64, id(1)), true);
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(AGE_ROW),
        IndexKind::SecondaryValue,
        Direction::Asc,
        range,
    );

    assert_eq!(drain(&mut scan), vec![(id(1), Value::Int(10))]);
    assert_eq!(scan.state(), ScanState::Exhausted);
}

#[test]
fn raw_garbage_in_row_is_reported_not_panicked() {
    let store = MemoryIndexStore::new();
    store.insert_raw(ENTITIES_ROW, RawKey::from_bytes(vec![0x01, 0x02]));
    let mut scan = IndexScan::new(
        &store,
        RowKey::from(ENTITIES_ROW),
        IndexKind::Entities,
        Direction::Asc,
        ScanRange::all(),
    );

    assert!(matches!(scan.next_column(), Err(Error::Codec(_))));
}
