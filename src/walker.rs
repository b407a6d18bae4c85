//! The proof walk: from a trusted root hash down to a leaf value or a
//! provable absence.
//!
//! A proof is an ordered list of RLP trie nodes, root first. Each node is
//! re-hashed and checked against the hash its parent committed to, so the
//! only trusted input is the root; everything else is verified as it is
//! consumed. The walk holds no state between calls and visits each node
//! exactly once.

use crate::error::VerifyError;
use crate::hash::{keccak256, EMPTY_TRIE_ROOT};
use crate::path::{decode_hp, extract_nibbles, path_nibbles};
use crate::reader::read_slice;
use crate::rlp::{list_contents, read_fixed32, skip_strings, string_header};
use crate::types::H256;

/// Walk `proof` from `expected_root` along `path`.
///
/// Returns `Some(bytes)` with the content of the matching leaf's value
/// element, or `None` when the proof shows the path is not in the trie.
/// Absence by divergence and absence by an empty branch slot are
/// deliberately indistinguishable here; callers map `None` to a domain
/// default (zero value, empty-trie storage root).
pub fn walk(
    expected_root: &H256,
    path: &H256,
    proof: &[Vec<u8>],
) -> Result<Option<Vec<u8>>, VerifyError> {
    // An empty trie proves every absence by its root alone.
    if *expected_root == EMPTY_TRIE_ROOT && proof.is_empty() {
        return Ok(None);
    }

    let nibbles = path_nibbles(path);
    let mut expected = *expected_root;
    let mut consumed = 0usize;
    // None while descending; Some(None) = proven absent, Some(Some) = found.
    let mut outcome: Option<Option<Vec<u8>>> = None;

    for node in proof {
        if outcome.is_some() {
            return Err(VerifyError::ProofTooLong);
        }
        if keccak256(node) != expected {
            return Err(VerifyError::InvalidNodeHash);
        }

        let content = list_contents(node, 0)?;
        // Shape inference: branches always carry 17 elements, leaf and
        // extension nodes exactly 2, so bytes remaining after the second
        // element mean a branch. That is the standard hex-trie layout,
        // trusted here rather than re-verified per node.
        let after_two = skip_strings(node, content, 2)?;
        if after_two < node.len() {
            // Branch: one nibble selects among the 16 child slots.
            let nibble = nibbles.get(consumed).copied().unwrap_or(0) as usize;
            consumed += 1;
            let slot = skip_strings(node, content, nibble)?;
            let (_, len) = string_header(node, slot)?;
            if len == 0 {
                outcome = Some(None);
            } else {
                expected = read_fixed32(node, slot)?;
            }
        } else {
            // Leaf or extension: compare the compact partial path.
            let hp = decode_hp(node, content)?;
            if !path_matches(&nibbles, consumed, &hp.nibbles) {
                outcome = Some(None);
            } else if hp.is_leaf {
                if consumed + hp.nibbles.len() != 64 {
                    return Err(VerifyError::ProofPathTooShort);
                }
                consumed = 64;
                let (start, len) = string_header(node, hp.next)?;
                outcome = Some(Some(read_slice(node, start, len)?.to_vec()));
            } else {
                expected = read_fixed32(node, hp.next)?;
                consumed += hp.nibbles.len();
            }
        }
    }

    if consumed > 64 {
        return Err(VerifyError::ProofPathTooLong);
    }
    match outcome {
        Some(result) => Ok(result),
        None => Err(VerifyError::IncompleteProof),
    }
}

/// Compare a partial path against the path window starting at `start`.
/// Positions past nibble 64 compare as zero; a walk that actually consumes
/// them is rejected by the 64-nibble bound once it ends.
fn path_matches(nibbles: &[u8; 64], start: usize, partial: &[u8]) -> bool {
    if start + partial.len() <= 64 {
        extract_nibbles(nibbles, start, partial.len()) == partial
    } else {
        partial
            .iter()
            .enumerate()
            .all(|(i, &nib)| nibbles.get(start + i).copied().unwrap_or(0) == nib)
    }
}
