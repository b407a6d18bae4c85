//! End-to-end verification against tries built by the reference builder:
//! header anchoring, account storage roots, and storage slot values, plus
//! the tampering cases a hostile data source could produce.

use mpt_verify::{
    account_storage_root, block_state_root, encode_bytes, encode_list, keccak256, storage_value,
    Address, TrieBuilder, VerifyError, EMPTY_TRIE_ROOT, H256,
};
use std::collections::HashMap;

/// Minimal big-endian representation of an integer (empty for zero), the
/// form RLP integer fields take on the wire.
fn be_min(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

fn slot_index(n: u64) -> H256 {
    let mut slot = [0u8; 32];
    slot[24..].copy_from_slice(&n.to_be_bytes());
    slot
}

fn padded(value: u64) -> H256 {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// A storage trie stores, at keccak256(slot), the RLP string of the
/// value's minimal big-endian bytes.
fn build_storage_trie(slots: &[(u64, u64)]) -> TrieBuilder {
    let mut trie = TrieBuilder::new();
    for &(slot, value) in slots {
        trie.insert(&keccak256(&slot_index(slot)), &encode_bytes(&be_min(value)));
    }
    trie
}

/// The state trie stores, at keccak256(address), the RLP account list
/// (nonce, balance, storage root, code hash).
fn account_body(nonce: u64, balance: u64, storage_root: &H256, code_hash: &H256) -> Vec<u8> {
    encode_list(&[
        encode_bytes(&be_min(nonce)),
        encode_bytes(&be_min(balance)),
        encode_bytes(storage_root),
        encode_bytes(code_hash),
    ])
}

fn build_header(number: u64, state_root: &H256) -> Vec<u8> {
    encode_list(&[
        encode_bytes(&[0x11; 32]),      // parent hash
        encode_bytes(&[0x22; 32]),      // ommers hash
        encode_bytes(&[0x33; 20]),      // miner
        encode_bytes(state_root),       // state root
        encode_bytes(&[0x44; 32]),      // transactions root
        encode_bytes(&[0x55; 32]),      // receipts root
        encode_bytes(&[0u8; 256]),      // logs bloom
        encode_bytes(&be_min(0)),       // difficulty
        encode_bytes(&be_min(number)),  // number
        encode_bytes(&be_min(30_000_000)), // gas limit
        encode_bytes(&be_min(14_200_000)), // gas used
        encode_bytes(&be_min(1_755_000_000)), // timestamp
        encode_bytes(b"extra"),         // extra data
        encode_bytes(&[0x66; 32]),      // mix hash
        encode_bytes(&[0u8; 8]),        // nonce
        encode_bytes(&be_min(7)),       // base fee per gas
    ])
}

const SLOTS: &[(u64, u64)] = &[
    (0, 1_000),
    (1, 42),
    (2, u64::MAX),
    (7, 1),
    (100, 123_456_789),
    (1_000_000, 5),
    (u64::MAX, 99),
];

#[test]
fn present_slots_verify_to_their_values() {
    let trie = build_storage_trie(SLOTS);
    let root = trie.root_hash();

    for &(slot, value) in SLOTS {
        let key = slot_index(slot);
        let proof = trie.prove(&keccak256(&key));
        assert_eq!(storage_value(&root, &key, &proof).unwrap(), padded(value));
    }
}

#[test]
fn absent_slots_verify_to_zero() {
    let trie = build_storage_trie(SLOTS);
    let root = trie.root_hash();

    for absent in [3u64, 8, 55, 777, 123_456] {
        let key = slot_index(absent);
        let proof = trie.prove(&keccak256(&key));
        assert!(!proof.is_empty());
        assert_eq!(storage_value(&root, &key, &proof).unwrap(), [0u8; 32]);
    }
}

#[test]
fn empty_storage_trie_needs_no_proof() {
    let key = slot_index(5);
    assert_eq!(
        storage_value(&EMPTY_TRIE_ROOT, &key, &[]).unwrap(),
        [0u8; 32]
    );
}

#[test]
fn single_slot_trie_has_one_node_proof() {
    let trie = build_storage_trie(&[(3, 0xabcd)]);
    let root = trie.root_hash();
    let key = slot_index(3);

    let proof = trie.prove(&keccak256(&key));
    assert_eq!(proof.len(), 1);
    assert_eq!(storage_value(&root, &key, &proof).unwrap(), padded(0xabcd));
}

#[test]
fn shuffled_proof_fails_hash_chain() {
    let trie = build_storage_trie(SLOTS);
    let root = trie.root_hash();
    let key = slot_index(1);

    let mut proof = trie.prove(&keccak256(&key));
    assert!(proof.len() >= 2, "need a multi-node proof to shuffle");
    proof.swap(0, 1);

    assert_eq!(
        storage_value(&root, &key, &proof),
        Err(VerifyError::InvalidNodeHash)
    );
}

#[test]
fn trailing_node_fails_proof_too_long() {
    let trie = build_storage_trie(SLOTS);
    let root = trie.root_hash();
    let key = slot_index(1);

    let mut proof = trie.prove(&keccak256(&key));
    proof.push(proof[proof.len() - 1].clone());

    assert_eq!(
        storage_value(&root, &key, &proof),
        Err(VerifyError::ProofTooLong)
    );
}

#[test]
fn truncated_proof_fails_incomplete() {
    let trie = build_storage_trie(SLOTS);
    let root = trie.root_hash();
    let key = slot_index(1);

    let mut proof = trie.prove(&keccak256(&key));
    assert!(proof.len() >= 2, "need a multi-node proof to truncate");
    proof.pop();

    assert_eq!(
        storage_value(&root, &key, &proof),
        Err(VerifyError::IncompleteProof)
    );
}

#[test]
fn wrong_root_rejects_first_node() {
    let trie = build_storage_trie(SLOTS);
    let key = slot_index(1);
    let proof = trie.prove(&keccak256(&key));

    assert_eq!(
        storage_value(&[0xee; 32], &key, &proof),
        Err(VerifyError::InvalidNodeHash)
    );
}

#[test]
fn account_proof_yields_storage_root() {
    let storage = build_storage_trie(SLOTS);
    let storage_root = storage.root_hash();
    let code_hash = keccak256(b"runtime code");

    let mut state = TrieBuilder::new();
    let address: Address = [0xaa; 20];
    state.insert(
        &keccak256(&address),
        &account_body(3, 10_000, &storage_root, &code_hash),
    );
    for filler in 0u8..6 {
        let other: Address = [filler; 20];
        state.insert(
            &keccak256(&other),
            &account_body(1, 5, &EMPTY_TRIE_ROOT, &code_hash),
        );
    }
    let state_root = state.root_hash();

    let proof = state.prove(&keccak256(&address));
    let verified = account_storage_root(&state_root, &address, &proof).unwrap();
    assert_eq!(verified, storage_root);

    // Chain into the storage trie with the root just verified.
    let key = slot_index(100);
    let slot_proof = storage.prove(&keccak256(&key));
    assert_eq!(
        storage_value(&verified, &key, &slot_proof).unwrap(),
        padded(123_456_789)
    );
}

#[test]
fn untouched_account_has_empty_storage_root() {
    let mut state = TrieBuilder::new();
    let code_hash = keccak256(b"code");
    for filler in 0u8..6 {
        let other: Address = [filler; 20];
        state.insert(
            &keccak256(&other),
            &account_body(1, 5, &EMPTY_TRIE_ROOT, &code_hash),
        );
    }
    let state_root = state.root_hash();

    let absent: Address = [0xf7; 20];
    let proof = state.prove(&keccak256(&absent));
    assert_eq!(
        account_storage_root(&state_root, &absent, &proof).unwrap(),
        EMPTY_TRIE_ROOT
    );
}

#[test]
fn first_nibble_absence_exits_after_one_node() {
    // Two accounts whose hashed paths differ in their first nibble make the
    // root a branch; a third address whose first nibble hits an empty slot
    // is proven absent by that single branch node.
    let mut picked = Vec::new();
    let mut used = [false; 16];
    for candidate in 0u8..=255 {
        let address: Address = [candidate; 20];
        let nibble = (keccak256(&address)[0] >> 4) as usize;
        if picked.len() < 2 {
            if !used[nibble] {
                used[nibble] = true;
                picked.push(address);
            }
        } else if !used[nibble] {
            picked.push(address);
            break;
        }
    }
    assert_eq!(picked.len(), 3, "need three addresses with distinct first nibbles");
    let (first, second, absent) = (picked[0], picked[1], picked[2]);

    let mut state = TrieBuilder::new();
    let code_hash = keccak256(b"code");
    state.insert(&keccak256(&first), &account_body(1, 1, &EMPTY_TRIE_ROOT, &code_hash));
    state.insert(&keccak256(&second), &account_body(2, 2, &EMPTY_TRIE_ROOT, &code_hash));
    let state_root = state.root_hash();

    let proof = state.prove(&keccak256(&absent));
    assert_eq!(proof.len(), 1, "absence should be decided at the root branch");
    assert_eq!(
        account_storage_root(&state_root, &absent, &proof).unwrap(),
        EMPTY_TRIE_ROOT
    );
}

#[test]
fn header_yields_number_and_state_root() {
    let state_root = keccak256(b"some state root");
    let header = build_header(17_500_000, &state_root);

    let mut oracle = HashMap::new();
    oracle.insert(17_500_000u64, keccak256(&header));

    assert_eq!(
        block_state_root(&header, &oracle).unwrap(),
        (17_500_000, state_root)
    );
}

#[test]
fn tampered_header_is_unverifiable() {
    let state_root = keccak256(b"some state root");
    let header = build_header(17_500_000, &state_root);

    let mut oracle = HashMap::new();
    oracle.insert(17_500_000u64, keccak256(&header));

    // Flip one byte anywhere and the hash anchor breaks.
    let mut tampered = header.clone();
    let at = tampered.len() - 20;
    tampered[at] ^= 0x01;
    assert_eq!(
        block_state_root(&tampered, &oracle),
        Err(VerifyError::UnverifiableBlock)
    );

    // A number the oracle has no hash for is just as unverifiable.
    let unknown = build_header(1, &state_root);
    assert_eq!(
        block_state_root(&unknown, &oracle),
        Err(VerifyError::UnverifiableBlock)
    );
}

#[test]
fn header_number_decodes_genesis_zero() {
    let state_root = [0x12; 32];
    let header = build_header(0, &state_root);
    let mut oracle = HashMap::new();
    oracle.insert(0u64, keccak256(&header));

    assert_eq!(block_state_root(&header, &oracle).unwrap(), (0, state_root));
}

#[test]
fn garbage_header_bytes_are_rejected_before_hashing() {
    let oracle: HashMap<u64, H256> = HashMap::new();
    assert_eq!(
        block_state_root(&[0x83, 0x01, 0x02, 0x03], &oracle),
        Err(VerifyError::ExpectedList)
    );
    assert_eq!(
        block_state_root(&[], &oracle),
        Err(VerifyError::OutOfBounds)
    );
}
