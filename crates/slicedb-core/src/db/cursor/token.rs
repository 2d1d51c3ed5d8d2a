use crate::{
    db::cursor::{CursorError, CursorNode, hex},
    serialize::{deserialize_bounded, serialize},
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TreeSignature
///
/// SHA-256 fingerprint of the operator tree a cursor was taken from.
/// Covers rows, index kinds, ranges and operators; excludes page sizes.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TreeSignature([u8; 32]);

impl TreeSignature {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        hex::encode_hex(&self.0)
    }
}

impl fmt::Display for TreeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

///
/// CursorTokenVersion
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CursorTokenVersion {
    V1,
}

impl CursorTokenVersion {
    const V1_TAG: u8 = 1;

    const fn decode(raw: u8) -> Option<Self> {
        match raw {
            Self::V1_TAG => Some(Self::V1),
            _ => None,
        }
    }

    const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
        }
    }
}

///
/// CursorTokenWire
///

#[derive(Deserialize, Serialize)]
struct CursorTokenWire {
    version: u8,
    signature: [u8; 32],
    position: CursorNode,
}

///
/// CursorToken
///
/// Opaque continuation token: `hex(cbor{version, signature, position})`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CursorToken {
    signature: TreeSignature,
    position: CursorNode,
}

impl CursorToken {
    #[must_use]
    pub const fn new(signature: TreeSignature, position: CursorNode) -> Self {
        Self {
            signature,
            position,
        }
    }

    #[must_use]
    pub const fn signature(&self) -> TreeSignature {
        self.signature
    }

    #[must_use]
    pub const fn position(&self) -> &CursorNode {
        &self.position
    }

    #[must_use]
    pub fn into_position(self) -> CursorNode {
        self.position
    }

    pub fn encode(&self) -> Result<String, CursorError> {
        let wire = CursorTokenWire {
            version: CursorTokenVersion::V1.encode(),
            signature: self.signature.into_bytes(),
            position: self.position.clone(),
        };
        let bytes = serialize(&wire).map_err(CursorError::Encode)?;

        Ok(hex::encode_hex(&bytes))
    }

    /// Decode a token of at most `max_len` hex characters.
    pub fn decode(token: &str, max_len: usize) -> Result<Self, CursorError> {
        let bytes = hex::decode_hex(token, max_len)?;
        let wire: CursorTokenWire = deserialize_bounded(&bytes, max_len / 2)
            .map_err(|err| CursorError::invalid(err.to_string()))?;

        if CursorTokenVersion::decode(wire.version).is_none() {
            return Err(CursorError::invalid(format!(
                "unsupported cursor version: {}",
                wire.version
            )));
        }

        Ok(Self::new(
            TreeSignature::from_bytes(wire.signature),
            wire.position,
        ))
    }

    #[cfg(test)]
    pub(crate) fn encode_with_version_for_test(&self, version: u8) -> String {
        let wire = CursorTokenWire {
            version,
            signature: self.signature.into_bytes(),
            position: self.position.clone(),
        };

        hex::encode_hex(&serialize(&wire).unwrap_or_default())
    }
}
