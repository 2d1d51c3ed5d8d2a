//! Module: key::ordered
//! Responsibility: fixed-width scalar byte transforms preserving order,
//! plus escaped/terminated framing for variable-length payloads.
//! Does not own: component framing or tag assignment.

use crate::db::key::error::{CodecError, ERR_INVALID_ESCAPE, ERR_TRUNCATED};

const SIGN_64: u64 = 1 << 63;
const ESCAPE: u8 = 0xFF;

pub(super) const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ SIGN_64;
    biased.to_be_bytes()
}

pub(super) const fn i64_from_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ SIGN_64).cast_signed()
}

pub(super) const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & SIGN_64 == 0 {
        bits ^ SIGN_64
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

pub(super) const fn f64_from_ordered(bytes: [u8; 8]) -> f64 {
    let ordered = u64::from_be_bytes(bytes);
    let bits = if ordered & SIGN_64 == 0 {
        !ordered
    } else {
        ordered ^ SIGN_64
    };

    f64::from_bits(bits)
}

// Append bytes with every byte XOR-ed by `mask` (0xFF inverts for descending).
pub(super) fn push_masked(out: &mut Vec<u8>, bytes: &[u8], mask: u8) {
    out.extend(bytes.iter().map(|byte| byte ^ mask));
}

// Byte strings are escaped so tuple boundaries remain unambiguous:
// 0x00 -> 0x00 0xFF, terminated by 0x00 0x00 (before masking).
pub(super) fn push_terminated(out: &mut Vec<u8>, bytes: &[u8], mask: u8) {
    for &byte in bytes {
        if byte == 0 {
            out.extend_from_slice(&[mask, ESCAPE ^ mask]);
        } else {
            out.push(byte ^ mask);
        }
    }

    out.extend_from_slice(&[mask, mask]);
}

pub(super) fn read_fixed<const N: usize>(
    bytes: &[u8],
    offset: &mut usize,
    mask: u8,
) -> Result<[u8; N], CodecError> {
    let end = offset
        .checked_add(N)
        .ok_or(CodecError::malformed(ERR_TRUNCATED))?;
    let slice = bytes
        .get(*offset..end)
        .ok_or(CodecError::malformed(ERR_TRUNCATED))?;

    let mut out = [0u8; N];
    for (dst, src) in out.iter_mut().zip(slice) {
        *dst = src ^ mask;
    }
    *offset = end;

    Ok(out)
}

pub(super) fn read_terminated(
    bytes: &[u8],
    offset: &mut usize,
    mask: u8,
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let mut cursor = *offset;

    loop {
        let byte = *bytes
            .get(cursor)
            .ok_or(CodecError::malformed(ERR_TRUNCATED))?
            ^ mask;
        if byte != 0 {
            out.push(byte);
            cursor += 1;
            continue;
        }

        let next = *bytes
            .get(cursor + 1)
            .ok_or(CodecError::malformed(ERR_TRUNCATED))?
            ^ mask;
        cursor += 2;
        match next {
            0 => break,
            ESCAPE => out.push(0),
            _ => return Err(CodecError::malformed(ERR_INVALID_ESCAPE)),
        }
    }

    *offset = cursor;

    Ok(out)
}
