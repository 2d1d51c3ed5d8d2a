use crate::{
    db::{
        Direction,
        column::{ColumnParser, IndexKind},
        key::{CodecError, ComponentEquality, CompositeKey},
    },
    types::EntityId,
    value::Value,
};

fn id(n: u128) -> EntityId {
    EntityId::from_u128(n)
}

#[test]
fn secondary_value_column_parses_value_and_trailing_id() {
    let raw = CompositeKey::new()
        .with("age")
        .with(20_i64)
        .with(id(3))
        .encode();

    let column = ColumnParser::new(IndexKind::SecondaryValue)
        .parse(&raw)
        .expect("well-formed column should parse");

    assert_eq!(column.entity_id(), id(3));
    assert_eq!(column.sort_value(), &Value::Int(20));
    assert_eq!(column.raw_key(), &raw, "raw bytes are retained as the resume key");
}

#[test]
fn entities_column_sorts_on_its_own_id() {
    let raw = CompositeKey::new().with(id(9)).encode();
    let column = ColumnParser::new(IndexKind::Entities)
        .parse(&raw)
        .expect("entity column should parse");

    assert_eq!(column.entity_id(), id(9));
    assert_eq!(column.sort_value(), &Value::Id(id(9)));
}

#[test]
fn all_properties_column_reads_leading_value() {
    let raw = CompositeKey::new()
        .with(1.5_f64)
        .with(id(4))
        .with("weight")
        .encode();
    let column = ColumnParser::new(IndexKind::AllProperties)
        .parse(&raw)
        .expect("all-properties column should parse");

    assert_eq!(column.entity_id(), id(4));
    assert_eq!(column.sort_value(), &Value::Float(1.5));
}

#[test]
fn geo_and_full_text_columns_require_text_labels() {
    let geo = CompositeKey::new()
        .with("9q8yy")
        .with(id(1))
        .with(37.7_f64)
        .with(-122.4_f64)
        .encode();
    let column = ColumnParser::new(IndexKind::Geo)
        .parse(&geo)
        .expect("geo column should parse");
    assert_eq!(column.sort_value(), &Value::Text("9q8yy".to_string()));

    let bad_term = CompositeKey::new().with(5_i64).with(id(1)).encode();
    let err = ColumnParser::new(IndexKind::FullText)
        .parse(&bad_term)
        .expect_err("non-text term must be rejected");
    assert!(matches!(err, CodecError::Malformed { .. }));
}

#[test]
fn wrong_arity_and_non_id_slots_are_malformed() {
    let parser = ColumnParser::new(IndexKind::SecondaryValue);

    let short = CompositeKey::new().with(id(1)).encode();
    assert!(parser.parse(&short).is_err(), "one component is too short");

    let no_id = CompositeKey::new().with("age").with(1_i64).with(2_i64).encode();
    let err = parser.parse(&no_id).expect_err("trailing slot must be an id");
    assert_eq!(err.reason(), "column id component is not an entity id");

    let entities = ColumnParser::new(IndexKind::Entities);
    let two = CompositeKey::new().with(id(1)).with(id(2)).encode();
    assert!(entities.parse(&two).is_err(), "entity rows hold exactly one id");
}

#[test]
fn mixed_sort_and_id_directions_are_malformed() {
    let raw = CompositeKey::new()
        .with("age")
        .with_desc(3_i64)
        .with(id(1))
        .encode();

    let err = ColumnParser::new(IndexKind::SecondaryValue)
        .parse(&raw)
        .expect_err("mixed directions must be rejected");
    assert_eq!(
        err.reason(),
        "column sort and id components disagree on direction"
    );
}

#[test]
fn truncated_column_bytes_are_malformed() {
    let raw = CompositeKey::new().with("age").with(20_i64).with(id(3)).encode();
    let cut = crate::db::key::RawKey::from_bytes(raw.as_bytes()[..raw.len() - 4].to_vec());

    let err = ColumnParser::new(IndexKind::SecondaryValue)
        .parse(&cut)
        .expect_err("truncated column must fail");
    assert!(matches!(err, CodecError::Malformed { .. }));
}

#[test]
fn parse_direction_reports_sort_component_order() {
    let parser = ColumnParser::new(IndexKind::SecondaryValue);
    let asc = CompositeKey::new().with("age").with(1_i64).with(id(1)).encode();
    let desc = CompositeKey::new()
        .with("age")
        .with_desc(1_i64)
        .with_desc(id(1))
        .encode();

    assert_eq!(parser.parse_direction(&asc), Ok(Direction::Asc));
    assert_eq!(parser.parse_direction(&desc), Ok(Direction::Desc));
}

#[test]
fn seek_key_substitutes_merge_slots_and_keeps_prefix() {
    let template = CompositeKey::new().with("age").with(20_i64).with(id(3));
    let parser = ColumnParser::new(IndexKind::SecondaryValue);

    let by_value = parser
        .seek_key(&template, Some(&Value::Int(25)), id(7))
        .expect("seek key should build");
    assert_eq!(
        by_value,
        CompositeKey::new().with("age").with(25_i64).with(id(7))
    );

    let by_entity = parser
        .seek_key(&template, None, id(7))
        .expect("seek key should build");
    assert_eq!(
        by_entity,
        CompositeKey::new().with("age").with(20_i64).with(id(7))
    );
}

#[test]
fn seek_key_drops_trailing_components_after_merge_slots() {
    let template = CompositeKey::new()
        .with("cell")
        .with(id(1))
        .with(1.0_f64)
        .with(2.0_f64);
    let key = ColumnParser::new(IndexKind::Geo)
        .seek_key(&template, Some(&Value::Text("dell".to_string())), id(5))
        .expect("seek key should build");

    assert_eq!(key, CompositeKey::new().with("dell").with(id(5)));
    assert_eq!(
        key.component(1).map(|c| c.equality()),
        Some(ComponentEquality::Equal)
    );
}
