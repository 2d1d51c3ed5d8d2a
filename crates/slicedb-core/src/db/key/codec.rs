//! Module: key::codec
//! Responsibility: raw byte framing/parsing for `CompositeKey`.
//!
//! Component layout: `tag | payload | equality`.
//! Descending components invert tag and payload bytes; the equality marker
//! is written as-is so boundary markers keep their physical meaning.

use crate::{
    db::{
        Direction,
        key::{
            ComponentEquality, CompositeKey, KeyComponent, RawKey,
            error::{
                CodecError, ERR_INVALID_BOOL, ERR_INVALID_EQUALITY, ERR_INVALID_TAG,
                ERR_INVALID_UTF8, ERR_TRUNCATED,
            },
            ordered::{
                f64_from_ordered, i64_from_ordered, ordered_f64_bytes, ordered_i64_bytes,
                push_masked, push_terminated, read_fixed, read_terminated,
            },
        },
    },
    types::EntityId,
    value::{Value, ValueTag},
};

const fn direction_mask(direction: Direction) -> u8 {
    match direction {
        Direction::Asc => 0x00,
        Direction::Desc => 0xFF,
    }
}

/// Encode one composite key. Identical tuples always produce identical bytes.
#[must_use]
pub fn encode_key(key: &CompositeKey) -> RawKey {
    let mut out = Vec::new();
    for component in key.components() {
        encode_component(&mut out, component);
    }

    RawKey::from_bytes(out)
}

/// Decode raw key bytes, rejecting truncated or malformed buffers.
pub fn decode_key(bytes: &[u8]) -> Result<CompositeKey, CodecError> {
    let mut offset = 0;
    let mut components = Vec::new();

    while offset < bytes.len() {
        components.push(decode_component(bytes, &mut offset)?);
    }

    Ok(CompositeKey::from_components(components))
}

fn encode_component(out: &mut Vec<u8>, component: &KeyComponent) {
    let mask = direction_mask(component.direction());
    let value = component.value();

    out.push(value.tag().to_u8() ^ mask);
    match value {
        Value::Id(id) => push_masked(out, &id.to_bytes(), mask),
        Value::Text(text) => push_terminated(out, text.as_bytes(), mask),
        Value::Bool(flag) => out.push(u8::from(*flag) ^ mask),
        Value::Int(n) => push_masked(out, &ordered_i64_bytes(*n), mask),
        Value::Float(n) => push_masked(out, &ordered_f64_bytes(*n), mask),
        Value::Blob(bytes) => push_terminated(out, bytes, mask),
    }
    out.push(component.equality().to_u8());
}

fn decode_component(bytes: &[u8], offset: &mut usize) -> Result<KeyComponent, CodecError> {
    let raw_tag = *bytes
        .get(*offset)
        .ok_or(CodecError::malformed(ERR_TRUNCATED))?;
    *offset += 1;

    let (tag, direction) = decode_tag(raw_tag)?;
    let mask = direction_mask(direction);

    let value = match tag {
        ValueTag::Id => Value::Id(EntityId::from_bytes(read_fixed::<16>(bytes, offset, mask)?)),
        ValueTag::Text => {
            let payload = read_terminated(bytes, offset, mask)?;
            let text =
                String::from_utf8(payload).map_err(|_| CodecError::malformed(ERR_INVALID_UTF8))?;
            Value::Text(text)
        }
        ValueTag::Bool => match read_fixed::<1>(bytes, offset, mask)? {
            [0] => Value::Bool(false),
            [1] => Value::Bool(true),
            _ => return Err(CodecError::malformed(ERR_INVALID_BOOL)),
        },
        ValueTag::Int => Value::Int(i64_from_ordered(read_fixed::<8>(bytes, offset, mask)?)),
        ValueTag::Float => Value::Float(f64_from_ordered(read_fixed::<8>(bytes, offset, mask)?)),
        ValueTag::Blob => Value::Blob(read_terminated(bytes, offset, mask)?),
    };

    let raw_equality = *bytes
        .get(*offset)
        .ok_or(CodecError::malformed(ERR_TRUNCATED))?;
    *offset += 1;
    let equality = ComponentEquality::from_u8(raw_equality)
        .ok_or(CodecError::malformed(ERR_INVALID_EQUALITY))?;

    Ok(KeyComponent::new(value, direction, equality))
}

// Ascending tags are 0x01..=0x06; descending tags are their bitwise inverse.
fn decode_tag(raw: u8) -> Result<(ValueTag, Direction), CodecError> {
    if let Some(tag) = ValueTag::from_u8(raw) {
        return Ok((tag, Direction::Asc));
    }
    if let Some(tag) = ValueTag::from_u8(!raw) {
        return Ok((tag, Direction::Desc));
    }

    Err(CodecError::malformed(ERR_INVALID_TAG))
}
