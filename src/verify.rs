//! The two trie-backed entry points: account storage root out of the state
//! trie, slot value out of a storage trie.

use crate::error::VerifyError;
use crate::hash::{keccak256, EMPTY_TRIE_ROOT};
use crate::reader::read_be_word;
use crate::rlp::{list_contents, read_fixed32, skip_strings, string_header};
use crate::types::{Address, H256};
use crate::walker::walk;

/// Verify an account proof against `state_root` and return the account's
/// storage root.
///
/// The trie path is `keccak256(address)`. An account the proof shows to be
/// absent has never been touched and therefore has the empty trie as its
/// storage: [`EMPTY_TRIE_ROOT`] is returned, not an error. A present
/// account's leaf holds the RLP list (nonce, balance, storage root, code
/// hash); the third field is returned.
pub fn account_storage_root(
    state_root: &H256,
    address: &Address,
    proof: &[Vec<u8>],
) -> Result<H256, VerifyError> {
    let path = keccak256(address);
    match walk(state_root, &path, proof)? {
        None => Ok(EMPTY_TRIE_ROOT),
        Some(account) => {
            let content = list_contents(&account, 0)?;
            let root_at = skip_strings(&account, content, 2)?;
            read_fixed32(&account, root_at)
        }
    }
}

/// Verify a storage proof against `storage_root` and return the slot's
/// value, left-padded to 32 bytes.
///
/// The trie path is `keccak256(slot)`. An absent slot reads as zero, which
/// is exactly how the EVM treats storage never written to. A present
/// slot's leaf holds one RLP string: the value's minimal big-endian bytes.
pub fn storage_value(
    storage_root: &H256,
    slot: &H256,
    proof: &[Vec<u8>],
) -> Result<H256, VerifyError> {
    let path = keccak256(slot);
    match walk(storage_root, &path, proof)? {
        None => Ok([0u8; 32]),
        Some(payload) => {
            let (start, len) = string_header(&payload, 0)?;
            read_be_word(&payload, start, len)
        }
    }
}
