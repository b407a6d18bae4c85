//! Nibble paths and the hex-prefix compact encoding.
//!
//! Leaf and extension nodes store their partial path hex-prefix encoded: a
//! header byte whose top two bits must be zero, bit 0x20 flagging a leaf,
//! bit 0x10 flagging an odd nibble count (with the first nibble packed into
//! the header byte's low half), then the remaining nibbles two per byte.

use crate::error::VerifyError;
use crate::rlp::string_header;
use crate::reader::read_slice;
use crate::types::H256;

/// A decoded hex-prefix partial path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HpPath {
    /// The partial path, one nibble per byte.
    pub nibbles: Vec<u8>,
    /// True for a leaf node, false for an extension node.
    pub is_leaf: bool,
    /// Offset of the RLP element following the path element.
    pub next: usize,
}

/// Decode the hex-prefix encoded RLP string at `offset`.
pub fn decode_hp(buf: &[u8], offset: usize) -> Result<HpPath, VerifyError> {
    let (start, len) = string_header(buf, offset)?;
    if len == 0 {
        return Err(VerifyError::MalformedRlp);
    }
    let content = read_slice(buf, start, len)?;
    let flags = content[0];
    if flags & 0xc0 != 0 {
        return Err(VerifyError::InvalidHpHeader);
    }
    let is_leaf = flags & 0x20 != 0;
    let odd = flags & 0x10 != 0;

    let mut nibbles = Vec::with_capacity(2 * (len - 1) + 1);
    if odd {
        nibbles.push(flags & 0x0f);
    }
    for &byte in &content[1..] {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    Ok(HpPath { nibbles, is_leaf, next: start + len })
}

/// Hex-prefix encode a nibble path (builder/test side of [`decode_hp`]).
pub fn encode_hp(nibbles: &[u8], is_leaf: bool) -> Vec<u8> {
    let odd = nibbles.len() % 2 == 1;
    let mut flags = if is_leaf { 0x20u8 } else { 0x00 };
    let mut out = Vec::with_capacity(1 + nibbles.len() / 2);
    let rest = if odd {
        flags |= 0x10 | nibbles[0];
        &nibbles[1..]
    } else {
        nibbles
    };
    out.push(flags);
    for pair in rest.chunks(2) {
        out.push((pair[0] << 4) | pair[1]);
    }
    out
}

/// Split an arbitrary key into nibbles, most significant first.
pub fn to_nibbles(key: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(key.len() * 2);
    for &byte in key {
        nibbles.push(byte >> 4);
        nibbles.push(byte & 0x0f);
    }
    nibbles
}

/// The 64 nibbles of a 32-byte trie path, index 0 = most significant.
pub fn path_nibbles(path: &H256) -> [u8; 64] {
    let mut nibbles = [0u8; 64];
    for (i, &byte) in path.iter().enumerate() {
        nibbles[2 * i] = byte >> 4;
        nibbles[2 * i + 1] = byte & 0x0f;
    }
    nibbles
}

/// The `count` nibbles of a path starting at nibble index `start`. Callers
/// guarantee `start + count <= 64`.
pub fn extract_nibbles(nibbles: &[u8; 64], start: usize, count: usize) -> &[u8] {
    &nibbles[start..start + count]
}
