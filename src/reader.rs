//! Bounds-checked access to flat byte buffers.
//!
//! Proof material is adversarial, so no raw indexing happens anywhere in
//! this crate: every read funnels through these primitives, and a declared
//! length that would run past the buffer is a hard failure, never a
//! truncated read.

use crate::error::VerifyError;
use crate::types::H256;

/// Borrow `len` bytes of `buf` starting at `offset`.
pub fn read_slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], VerifyError> {
    let end = offset.checked_add(len).ok_or(VerifyError::OutOfBounds)?;
    buf.get(offset..end).ok_or(VerifyError::OutOfBounds)
}

/// Read the single byte at `offset`.
pub fn read_byte(buf: &[u8], offset: usize) -> Result<u8, VerifyError> {
    Ok(read_slice(buf, offset, 1)?[0])
}

/// Read `size` bytes (at most 32) at `offset` as a big-endian unsigned
/// integer, left-padded into a 32-byte word.
pub fn read_be_word(buf: &[u8], offset: usize, size: usize) -> Result<H256, VerifyError> {
    if size > 32 {
        return Err(VerifyError::OversizedInteger);
    }
    let bytes = read_slice(buf, offset, size)?;
    let mut word = [0u8; 32];
    word[32 - size..].copy_from_slice(bytes);
    Ok(word)
}

/// Narrow a 32-byte word to `u64`, rejecting values that do not fit.
pub fn word_to_u64(word: &H256) -> Result<u64, VerifyError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(VerifyError::OversizedInteger);
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(raw))
}

/// Read a big-endian length field of `size` bytes, as found in long-form
/// RLP headers. A length that does not fit `usize` is malformed, since no
/// real buffer could hold that much content.
pub fn read_be_len(buf: &[u8], offset: usize, size: usize) -> Result<usize, VerifyError> {
    let word = read_be_word(buf, offset, size)?;
    let value = word_to_u64(&word).map_err(|_| VerifyError::MalformedRlp)?;
    usize::try_from(value).map_err(|_| VerifyError::MalformedRlp)
}
