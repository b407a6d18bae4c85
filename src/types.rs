//! Core type aliases and serde mirrors of the proof material an upstream
//! data source delivers (the `eth_getProof` response shape).

use serde::{Deserialize, Deserializer};

/// 32-byte hash / word.
pub type H256 = [u8; 32];

/// 20-byte account address.
pub type Address = [u8; 20];

/// An `eth_getProof`-shaped response: everything needed to verify one
/// account and any number of its storage slots. This crate only consumes
/// the byte arrays; fetching and packaging them is the data source's job.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    /// The proven account.
    #[serde(deserialize_with = "hex_to_address")]
    pub address: Address,
    /// State-trie nodes from the state root down to the account leaf.
    #[serde(deserialize_with = "hex_to_nodes")]
    pub account_proof: Vec<Vec<u8>>,
    /// The storage root the data source claims for the account. Informative
    /// only; the verified value comes out of the account proof.
    #[serde(deserialize_with = "hex_to_h256")]
    pub storage_hash: H256,
    /// One proof per requested slot.
    #[serde(default)]
    pub storage_proof: Vec<StorageEntry>,
}

/// A single slot's proof within a [`ProofResponse`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    /// The raw slot key, left-padded to 32 bytes.
    #[serde(deserialize_with = "hex_to_h256")]
    pub key: H256,
    /// Storage-trie nodes from the storage root down to the slot's leaf.
    #[serde(deserialize_with = "hex_to_nodes")]
    pub proof: Vec<Vec<u8>>,
}

fn parse_hex<E: serde::de::Error>(value: &str) -> Result<Vec<u8>, E> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let bytes = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    bytes.map_err(E::custom)
}

fn hex_to_nodes<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let nodes: Vec<String> = Deserialize::deserialize(deserializer)?;
    nodes.iter().map(|node| parse_hex(node)).collect()
}

fn hex_to_h256<'de, D>(deserializer: D) -> Result<H256, D::Error>
where
    D: Deserializer<'de>,
{
    let value: String = Deserialize::deserialize(deserializer)?;
    let bytes = parse_hex::<D::Error>(&value)?;
    if bytes.len() > 32 {
        return Err(serde::de::Error::custom("value wider than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

fn hex_to_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    let value: String = Deserialize::deserialize(deserializer)?;
    let bytes = parse_hex::<D::Error>(&value)?;
    bytes
        .try_into()
        .map_err(|_| serde::de::Error::custom("address must be 20 bytes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_get_proof_response() {
        let json = r#"{
            "address": "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae",
            "accountProof": ["0xf851808080", "0x80"],
            "balance": "0x0",
            "codeHash": "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            "nonce": "0x1",
            "storageHash": "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "storageProof": [
                { "key": "0x1", "value": "0x0", "proof": ["0xf871a0ff"] }
            ]
        }"#;

        let response: ProofResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.address[0], 0xde);
        assert_eq!(response.account_proof.len(), 2);
        assert_eq!(response.account_proof[1], vec![0x80]);
        assert_eq!(response.storage_hash, crate::hash::EMPTY_TRIE_ROOT);
        assert_eq!(response.storage_proof.len(), 1);
        // Short keys left-pad into the 32-byte slot index.
        assert_eq!(response.storage_proof[0].key[31], 0x01);
        assert_eq!(response.storage_proof[0].proof[0][0], 0xf8);
    }

    #[test]
    fn missing_storage_proof_defaults_empty() {
        let json = r#"{
            "address": "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae",
            "accountProof": [],
            "storageHash": "0x0"
        }"#;
        let response: ProofResponse = serde_json::from_str(json).unwrap();
        assert!(response.storage_proof.is_empty());
        assert_eq!(response.storage_hash, [0u8; 32]);
    }
}
