use crate::db::cursor::CursorError;
use std::fmt::Write as _;

/// Encode raw cursor bytes as a lowercase hex token.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }

    out
}

/// Decode a hex token (either case) into raw bytes.
///
/// Surrounding whitespace is trimmed; tokens longer than `max_len`
/// characters are rejected before any decoding.
pub fn decode_hex(token: &str, max_len: usize) -> Result<Vec<u8>, CursorError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(CursorError::invalid("cursor token is empty"));
    }
    if token.len() > max_len {
        return Err(CursorError::invalid(format!(
            "cursor token exceeds max length: {} hex chars (max {max_len})",
            token.len()
        )));
    }
    if !token.len().is_multiple_of(2) {
        return Err(CursorError::invalid(
            "cursor token must have an even number of hex characters",
        ));
    }

    let bytes = token.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (index, pair) in bytes.chunks_exact(2).enumerate() {
        let position = index * 2;
        let hi = decode_nibble(pair[0]).ok_or_else(|| invalid_char(position))?;
        let lo = decode_nibble(pair[1]).ok_or_else(|| invalid_char(position + 1))?;
        out.push((hi << 4) | lo);
    }

    Ok(out)
}

fn invalid_char(position: usize) -> CursorError {
    CursorError::invalid(format!("invalid hex character at position {}", position + 1))
}

const fn decode_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
