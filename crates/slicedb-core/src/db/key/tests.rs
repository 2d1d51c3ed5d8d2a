use crate::{
    db::{
        Direction,
        key::{ComponentEquality, CodecError, CompositeKey, KeyComponent, decode_key, encode_key},
    },
    types::EntityId,
    value::Value,
};
use proptest::prelude::*;
use std::cmp::Ordering;

fn assert_encoded_order(left: &CompositeKey, right: &CompositeKey, expected: Ordering) {
    let left_bytes = encode_key(left);
    let right_bytes = encode_key(right);

    assert_eq!(left.cmp(right), expected, "logical order mismatch");
    assert_eq!(
        left_bytes.cmp(&right_bytes),
        expected,
        "byte order must match logical order for {left:?} vs {right:?}"
    );
}

fn secondary(property: &str, value: impl Into<Value>, id: u128) -> CompositeKey {
    CompositeKey::new()
        .with(property)
        .with(value)
        .with(EntityId::from_u128(id))
}

#[test]
fn round_trip_preserves_every_kind_and_flag() {
    let key = CompositeKey::from_components(vec![
        KeyComponent::asc(Value::Id(EntityId::from_u128(7))),
        KeyComponent::desc(Value::Text("a\0b".to_string())),
        KeyComponent::asc(Value::Bool(true)),
        KeyComponent::desc(Value::Int(-42)),
        KeyComponent::asc(Value::Float(-0.0)),
        KeyComponent::new(
            Value::Blob(vec![0x00, 0xFF, 0x00]),
            Direction::Desc,
            ComponentEquality::Greater,
        ),
    ]);

    let raw = encode_key(&key);
    let decoded = decode_key(raw.as_bytes()).expect("encoded key should decode");

    assert_eq!(decoded, key);
    assert_eq!(encode_key(&decoded), raw, "re-encoding must be byte-identical");
}

#[test]
fn empty_key_round_trips_to_empty_bytes() {
    let raw = encode_key(&CompositeKey::new());

    assert!(raw.is_empty());
    assert!(decode_key(&[]).expect("empty buffer decodes").is_empty());
}

#[test]
fn integers_order_across_sign_boundary() {
    let values = [i64::MIN, -10, -1, 0, 1, 10, i64::MAX];
    for pair in values.windows(2) {
        assert_encoded_order(
            &CompositeKey::new().with(pair[0]),
            &CompositeKey::new().with(pair[1]),
            Ordering::Less,
        );
    }
}

#[test]
fn floats_order_by_total_order() {
    let values = [
        f64::NEG_INFINITY,
        -1.5,
        -0.0,
        0.0,
        f64::MIN_POSITIVE,
        2.5,
        f64::INFINITY,
    ];
    for pair in values.windows(2) {
        assert_encoded_order(
            &CompositeKey::new().with(pair[0]),
            &CompositeKey::new().with(pair[1]),
            Ordering::Less,
        );
    }
}

#[test]
fn text_prefix_sorts_first_and_embedded_nul_is_escaped() {
    assert_encoded_order(
        &CompositeKey::new().with("a"),
        &CompositeKey::new().with("a\0"),
        Ordering::Less,
    );
    assert_encoded_order(
        &CompositeKey::new().with("a\0"),
        &CompositeKey::new().with("a\u{1}"),
        Ordering::Less,
    );
    assert_encoded_order(
        &CompositeKey::new().with("ab"),
        &CompositeKey::new().with("b"),
        Ordering::Less,
    );
}

#[test]
fn descending_component_reverses_value_order() {
    assert_encoded_order(
        &CompositeKey::new().with_desc(20_i64),
        &CompositeKey::new().with_desc(10_i64),
        Ordering::Less,
    );
    assert_encoded_order(
        &CompositeKey::new().with_desc("ab"),
        &CompositeKey::new().with_desc("a"),
        Ordering::Less,
    );
}

#[test]
fn later_components_break_ties() {
    assert_encoded_order(
        &secondary("age", 20_i64, 2),
        &secondary("age", 20_i64, 3),
        Ordering::Less,
    );
    assert_encoded_order(
        &secondary("age", 10_i64, 9),
        &secondary("age", 20_i64, 1),
        Ordering::Less,
    );
}

#[test]
fn prefix_markers_bracket_every_key_with_that_prefix() {
    let start = CompositeKey::new().with("age").with(20_i64).prefix_start();
    let end = CompositeKey::new().with("age").with(20_i64).prefix_end();

    for id in [0, 1, u128::MAX] {
        let stored = secondary("age", 20_i64, id);
        assert_encoded_order(&start, &stored, Ordering::Less);
        assert_encoded_order(&stored, &end, Ordering::Less);
    }

    assert_encoded_order(&secondary("age", 19_i64, u128::MAX), &start, Ordering::Less);
    assert_encoded_order(&end, &secondary("age", 21_i64, 0), Ordering::Less);
}

#[test]
fn equal_marker_prefix_sorts_before_longer_keys() {
    let prefix = CompositeKey::new().with("age").with(20_i64);

    assert_encoded_order(&prefix, &secondary("age", 20_i64, 0), Ordering::Less);
}

#[test]
fn every_truncation_of_a_valid_key_is_malformed_or_shorter() {
    let key = CompositeKey::new()
        .with("name")
        .with_desc("value")
        .with(EntityId::from_u128(99));
    let raw = encode_key(&key);
    let bytes = raw.as_bytes();

    for cut in 1..bytes.len() {
        match decode_key(&bytes[..cut]) {
            Err(CodecError::Malformed { .. }) => {}
            Ok(decoded) => assert!(
                decoded.len() < key.len(),
                "cut at {cut} decoded a full-length key"
            ),
        }
    }
}

#[test]
fn buffer_cut_mid_payload_is_malformed() {
    let raw = encode_key(&CompositeKey::new().with(EntityId::from_u128(1)));
    let err = decode_key(&raw.as_bytes()[..8]).expect_err("cut id payload must fail");

    assert_eq!(err, CodecError::Malformed { reason: "truncated component" });
}

#[test]
fn decode_rejects_unknown_tag() {
    let err = decode_key(&[0x07, 0x01]).expect_err("unknown tag must fail");

    assert_eq!(err.reason(), "invalid kind tag");
}

#[test]
fn decode_rejects_unknown_equality_marker() {
    let mut bytes = encode_key(&CompositeKey::new().with(true)).into_bytes();
    *bytes.last_mut().expect("encoded key is not empty") = 0x09;

    let err = decode_key(&bytes).expect_err("bad equality marker must fail");
    assert_eq!(err.reason(), "invalid equality marker");
}

#[test]
fn decode_rejects_bad_escape_and_bad_payloads() {
    // text tag, NUL followed by a byte that is neither terminator nor escape
    let err = decode_key(&[0x02, b'a', 0x00, 0x05, 0x00, 0x00, 0x01]).expect_err("bad escape");
    assert_eq!(err.reason(), "invalid escape sequence");

    let err = decode_key(&[0x03, 0x02, 0x01]).expect_err("bool payload out of range");
    assert_eq!(err.reason(), "invalid bool payload");

    let err = decode_key(&[0x02, 0xC3, 0x28, 0x00, 0x00, 0x01]).expect_err("invalid utf-8");
    assert_eq!(err.reason(), "text payload is not valid utf-8");
}

#[test]
fn encoding_is_deterministic() {
    let build = || {
        CompositeKey::new()
            .with("tag")
            .with(1.25_f64)
            .with(vec![1_u8, 2, 3])
    };

    assert_eq!(encode_key(&build()), encode_key(&build()));
}

fn value_strategy() -> BoxedStrategy<Value> {
    prop_oneof![
        any::<u128>().prop_map(|n| Value::Id(EntityId::from_u128(n))),
        proptest::collection::vec(any::<char>(), 0..6)
            .prop_map(|chars| Value::Text(chars.into_iter().collect())),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        proptest::collection::vec(any::<u8>(), 0..6).prop_map(Value::Blob),
    ]
    .boxed()
}

fn component_strategy() -> BoxedStrategy<KeyComponent> {
    (value_strategy(), any::<bool>(), 0_u8..3)
        .prop_map(|(value, descending, marker)| {
            let direction = if descending {
                Direction::Desc
            } else {
                Direction::Asc
            };
            let equality = ComponentEquality::from_u8(marker).unwrap_or_default();

            KeyComponent::new(value, direction, equality)
        })
        .boxed()
}

fn key_strategy() -> BoxedStrategy<CompositeKey> {
    proptest::collection::vec(component_strategy(), 0..4)
        .prop_map(CompositeKey::from_components)
        .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1024))]

    #[test]
    fn decode_inverts_encode_property(key in key_strategy()) {
        let raw = encode_key(&key);
        let decoded = decode_key(raw.as_bytes()).expect("encoded key should decode");

        prop_assert_eq!(&decoded, &key);
        prop_assert_eq!(encode_key(&decoded), raw);
    }

    #[test]
    fn byte_order_matches_logical_order_property(
        left in key_strategy(),
        right in key_strategy(),
    ) {
        prop_assert_eq!(encode_key(&left).cmp(&encode_key(&right)), left.cmp(&right));
    }

    #[test]
    fn shared_prefix_keys_keep_order_property(
        prefix in key_strategy(),
        left in component_strategy(),
        right in component_strategy(),
    ) {
        let mut lhs = prefix.clone();
        lhs.push(left);
        let mut rhs = prefix;
        rhs.push(right);

        prop_assert_eq!(encode_key(&lhs).cmp(&encode_key(&rhs)), lhs.cmp(&rhs));
    }

    #[test]
    fn arbitrary_bytes_never_panic_property(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
        let _ = decode_key(&bytes);
    }
}
