//! RLP header decoding, one item at a time.
//!
//! Trie nodes and block headers are never decoded eagerly into owned
//! structures; callers read one header, jump over uninteresting fields with
//! [`skip_strings`], and pull out exactly the bytes they need. The encoding
//! half exists for the reference [`crate::builder`] and for tests.

use crate::error::VerifyError;
use crate::reader::{read_be_len, read_byte, read_slice};
use crate::types::H256;

/// Decode the RLP string header at `offset`.
///
/// Returns `(content_start, content_len)`. A single byte below 0x80 encodes
/// itself, so its content starts at the header byte. A list header in
/// string position is malformed here; use [`list_contents`] for lists.
pub fn string_header(buf: &[u8], offset: usize) -> Result<(usize, usize), VerifyError> {
    let header = read_byte(buf, offset)?;
    let (start, len) = if header < 0x80 {
        (offset, 1)
    } else if header <= 0xb7 {
        (offset + 1, (header - 0x80) as usize)
    } else if header <= 0xbf {
        let size = (header - 0xb7) as usize;
        (offset + 1 + size, read_be_len(buf, offset + 1, size)?)
    } else {
        return Err(VerifyError::MalformedRlp);
    };
    let end = start.checked_add(len).ok_or(VerifyError::MalformedRlp)?;
    if end > buf.len() {
        return Err(VerifyError::MalformedRlp);
    }
    Ok((start, len))
}

/// Decode the RLP list header at `offset` and return where its content
/// starts. The content's end is not returned: proof nodes and headers are
/// each exactly one RLP list, so their content runs to the buffer's end.
pub fn list_contents(buf: &[u8], offset: usize) -> Result<usize, VerifyError> {
    let header = read_byte(buf, offset)?;
    if header <= 0xbf {
        return Err(VerifyError::ExpectedList);
    }
    let (start, len) = if header < 0xf8 {
        (offset + 1, (header - 0xc0) as usize)
    } else {
        let size = (header - 0xf7) as usize;
        (offset + 1 + size, read_be_len(buf, offset + 1, size)?)
    };
    let end = start.checked_add(len).ok_or(VerifyError::MalformedRlp)?;
    if end > buf.len() {
        return Err(VerifyError::MalformedRlp);
    }
    Ok(start)
}

/// Advance past `n` consecutive RLP strings starting at `offset`.
pub fn skip_strings(buf: &[u8], offset: usize, n: usize) -> Result<usize, VerifyError> {
    let mut at = offset;
    for _ in 0..n {
        let (start, len) = string_header(buf, at)?;
        at = start + len;
    }
    Ok(at)
}

/// Read an RLP string that must hold exactly 32 bytes (hash fields).
pub fn read_fixed32(buf: &[u8], offset: usize) -> Result<H256, VerifyError> {
    let (start, len) = string_header(buf, offset)?;
    if len != 32 {
        return Err(VerifyError::MalformedRlp);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(read_slice(buf, start, 32)?);
    Ok(out)
}

/// RLP-encode a byte string.
pub fn encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        data.to_vec()
    } else if data.len() < 56 {
        let mut out = vec![0x80 + data.len() as u8];
        out.extend_from_slice(data);
        out
    } else {
        let len_bytes = be_len_bytes(data.len());
        let mut out = vec![0xb7 + len_bytes.len() as u8];
        out.extend_from_slice(&len_bytes);
        out.extend_from_slice(data);
        out
    }
}

/// RLP-encode a list from already-encoded items.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload_len: usize = items.iter().map(Vec::len).sum();
    let mut out = if payload_len < 56 {
        vec![0xc0 + payload_len as u8]
    } else {
        let len_bytes = be_len_bytes(payload_len);
        let mut head = vec![0xf7 + len_bytes.len() as u8];
        head.extend_from_slice(&len_bytes);
        head
    };
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

/// Minimal big-endian representation of a length (at least one byte).
fn be_len_bytes(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(bytes.len() - 1);
    bytes[skip..].to_vec()
}
