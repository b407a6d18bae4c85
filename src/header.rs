//! Extracting a verified state root from raw block-header bytes.

use crate::error::VerifyError;
use crate::hash::keccak256;
use crate::reader::{read_be_word, word_to_u64};
use crate::rlp::{list_contents, read_fixed32, skip_strings, string_header};
use crate::types::H256;
use std::collections::HashMap;

/// Supplies the trusted hash for a block number.
///
/// The verifier itself never decides which hashes to trust; the caller
/// injects that knowledge, typically backed by a locally verified chain-tip
/// store or a rolling window of recent hashes.
pub trait BlockHashOracle {
    /// The known-good hash for block `number`, if one is held.
    fn block_hash(&self, number: u64) -> Option<H256>;
}

impl BlockHashOracle for HashMap<u64, H256> {
    fn block_hash(&self, number: u64) -> Option<H256> {
        self.get(&number).copied()
    }
}

/// Decode `(block_number, state_root)` from raw header bytes, anchored
/// against the oracle's trusted hash for that number.
///
/// The header is an RLP list whose first fields are parent hash, ommers
/// hash, miner, state root, transactions root, receipts root, logs bloom,
/// difficulty, number. Only the state root and the number are read; the
/// hash check covers every byte regardless.
///
/// Fails with [`VerifyError::UnverifiableBlock`] when `keccak256(header)`
/// differs from the oracle's hash for the claimed number, or when the
/// oracle holds no hash for it.
pub fn block_state_root<O: BlockHashOracle>(
    header: &[u8],
    oracle: &O,
) -> Result<(u64, H256), VerifyError> {
    let content = list_contents(header, 0)?;

    // Fields 0..2 precede the state root.
    let root_at = skip_strings(header, content, 3)?;
    let state_root = read_fixed32(header, root_at)?;

    // Five fields from the state root's own position: state root,
    // transactions root, receipts root, logs bloom, difficulty.
    let number_at = skip_strings(header, root_at, 5)?;
    let (start, len) = string_header(header, number_at)?;
    let number = word_to_u64(&read_be_word(header, start, len)?)?;

    let trusted = oracle
        .block_hash(number)
        .ok_or(VerifyError::UnverifiableBlock)?;
    if keccak256(header) != trusted {
        return Err(VerifyError::UnverifiableBlock);
    }
    Ok((number, state_root))
}
