use crate::types::H256;
use sha3::{Digest, Keccak256};

/// Root hash of the empty trie: `keccak256(rlp(""))` = `keccak256(0x80)`.
pub const EMPTY_TRIE_ROOT: H256 = [
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8,
    0x6e, 0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63,
    0xb4, 0x21,
];

/// Compute the Keccak-256 hash of `data`.
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trie_root_is_hash_of_empty_string_rlp() {
        assert_eq!(keccak256(&[0x80]), EMPTY_TRIE_ROOT);
    }

    #[test]
    fn keccak_empty_input() {
        let expected =
            hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                .unwrap();
        assert_eq!(keccak256(b"").to_vec(), expected);
    }
}
