//! An in-memory reference trie for exercising the verifier.
//!
//! [`TrieBuilder`] holds a full hex trie, computes the same roots a real
//! client would for the same key/value set, and emits proofs for any key,
//! present or absent. Absence proofs end at the node that decides the
//! matter: a diverging leaf or extension, or a branch whose selected slot
//! is empty.
//!
//! Children are always referenced by their 32-byte keccak hash; the
//! sub-32-byte node inlining real clients perform is not modelled, which
//! keeps the emitted proofs within the walker's slot contract.

use crate::hash::{keccak256, EMPTY_TRIE_ROOT};
use crate::path::{encode_hp, to_nibbles};
use crate::rlp::{encode_bytes, encode_list};
use crate::types::H256;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum BuilderNode {
    Leaf(Vec<u8>, Vec<u8>),
    Extension(Vec<u8>, H256),
    Branch(Box<[Option<H256>; 16]>, Option<Vec<u8>>),
}

impl BuilderNode {
    fn encode(&self) -> Vec<u8> {
        match self {
            BuilderNode::Leaf(path, value) => encode_list(&[
                encode_bytes(&encode_hp(path, true)),
                encode_bytes(value),
            ]),
            BuilderNode::Extension(path, child) => encode_list(&[
                encode_bytes(&encode_hp(path, false)),
                encode_bytes(child),
            ]),
            BuilderNode::Branch(children, value) => {
                let mut items: Vec<Vec<u8>> = children
                    .iter()
                    .map(|child| match child {
                        Some(hash) => encode_bytes(hash),
                        None => encode_bytes(&[]),
                    })
                    .collect();
                items.push(match value {
                    Some(bytes) => encode_bytes(bytes),
                    None => encode_bytes(&[]),
                });
                encode_list(&items)
            }
        }
    }
}

/// A mutable Merkle Patricia Trie kept fully in memory.
pub struct TrieBuilder {
    nodes: HashMap<H256, BuilderNode>,
    encoded: HashMap<H256, Vec<u8>>,
    root: Option<H256>,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            encoded: HashMap::new(),
            root: None,
        }
    }

    /// Insert or overwrite a key, returning the new root hash.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> H256 {
        let nibbles = to_nibbles(key);
        let root = self.insert_at(self.root, &nibbles, value.to_vec());
        self.root = Some(root);
        root
    }

    /// The current root hash; an empty trie has the canonical empty root.
    pub fn root_hash(&self) -> H256 {
        self.root.unwrap_or(EMPTY_TRIE_ROOT)
    }

    /// Look up a key.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let nibbles = to_nibbles(key);
        let mut current = self.root?;
        let mut at = 0usize;
        loop {
            match self.nodes.get(&current)? {
                BuilderNode::Leaf(path, value) => {
                    return (*path == nibbles[at..]).then(|| value.clone());
                }
                BuilderNode::Extension(path, child) => {
                    if !nibbles[at..].starts_with(path) {
                        return None;
                    }
                    at += path.len();
                    current = *child;
                }
                BuilderNode::Branch(children, value) => {
                    if at == nibbles.len() {
                        return value.clone();
                    }
                    current = children[nibbles[at] as usize]?;
                    at += 1;
                }
            }
        }
    }

    /// Emit the proof for a key: every node on its path, root first,
    /// ending at the leaf or at the node that proves absence.
    pub fn prove(&self, key: &[u8]) -> Vec<Vec<u8>> {
        let nibbles = to_nibbles(key);
        let mut proof = Vec::new();
        let Some(mut current) = self.root else {
            return proof;
        };
        let mut at = 0usize;
        loop {
            let (Some(node), Some(bytes)) =
                (self.nodes.get(&current), self.encoded.get(&current))
            else {
                return proof;
            };
            proof.push(bytes.clone());
            match node {
                BuilderNode::Leaf(..) => return proof,
                BuilderNode::Extension(path, child) => {
                    if !nibbles[at..].starts_with(path) {
                        return proof;
                    }
                    at += path.len();
                    current = *child;
                }
                BuilderNode::Branch(children, _) => {
                    if at == nibbles.len() {
                        return proof;
                    }
                    match children[nibbles[at] as usize] {
                        Some(child) => {
                            at += 1;
                            current = child;
                        }
                        None => return proof,
                    }
                }
            }
        }
    }

    fn insert_at(&mut self, node: Option<H256>, path: &[u8], value: Vec<u8>) -> H256 {
        let Some(hash) = node else {
            return self.store(BuilderNode::Leaf(path.to_vec(), value));
        };
        // Stale nodes stay in the maps; only reachability matters.
        let existing = self.nodes.get(&hash).cloned();
        match existing {
            None => self.store(BuilderNode::Leaf(path.to_vec(), value)),
            Some(BuilderNode::Leaf(leaf_path, leaf_value)) => {
                self.split_leaf(leaf_path, leaf_value, path, value)
            }
            Some(BuilderNode::Extension(ext_path, child)) => {
                self.split_extension(ext_path, child, path, value)
            }
            Some(BuilderNode::Branch(mut children, branch_value)) => {
                if path.is_empty() {
                    self.store(BuilderNode::Branch(children, Some(value)))
                } else {
                    let idx = path[0] as usize;
                    children[idx] = Some(self.insert_at(children[idx], &path[1..], value));
                    self.store(BuilderNode::Branch(children, branch_value))
                }
            }
        }
    }

    fn split_leaf(
        &mut self,
        leaf_path: Vec<u8>,
        leaf_value: Vec<u8>,
        path: &[u8],
        value: Vec<u8>,
    ) -> H256 {
        let common = common_prefix_len(&leaf_path, path);
        if common == leaf_path.len() && common == path.len() {
            // Same key: overwrite.
            return self.store(BuilderNode::Leaf(path.to_vec(), value));
        }

        let mut children: Box<[Option<H256>; 16]> = Default::default();
        let mut branch_value = None;

        if common == leaf_path.len() {
            branch_value = Some(leaf_value);
        } else {
            let idx = leaf_path[common] as usize;
            children[idx] =
                Some(self.store(BuilderNode::Leaf(leaf_path[common + 1..].to_vec(), leaf_value)));
        }
        if common == path.len() {
            branch_value = Some(value);
        } else {
            let idx = path[common] as usize;
            children[idx] =
                Some(self.store(BuilderNode::Leaf(path[common + 1..].to_vec(), value)));
        }

        let branch = self.store(BuilderNode::Branch(children, branch_value));
        self.prefix_with(&path[..common], branch)
    }

    fn split_extension(
        &mut self,
        ext_path: Vec<u8>,
        child: H256,
        path: &[u8],
        value: Vec<u8>,
    ) -> H256 {
        let common = common_prefix_len(&ext_path, path);
        if common == ext_path.len() {
            let new_child = self.insert_at(Some(child), &path[common..], value);
            return self.store(BuilderNode::Extension(ext_path, new_child));
        }

        let mut children: Box<[Option<H256>; 16]> = Default::default();
        let mut branch_value = None;

        // The existing subtree hangs off the nibble where the extension
        // stops matching.
        let old_idx = ext_path[common] as usize;
        children[old_idx] = Some(if common + 1 == ext_path.len() {
            child
        } else {
            self.store(BuilderNode::Extension(ext_path[common + 1..].to_vec(), child))
        });

        if common == path.len() {
            branch_value = Some(value);
        } else {
            let new_idx = path[common] as usize;
            children[new_idx] =
                Some(self.store(BuilderNode::Leaf(path[common + 1..].to_vec(), value)));
        }

        let branch = self.store(BuilderNode::Branch(children, branch_value));
        self.prefix_with(&path[..common], branch)
    }

    /// Wrap `node` in an extension for `prefix`, unless the prefix is empty.
    fn prefix_with(&mut self, prefix: &[u8], node: H256) -> H256 {
        if prefix.is_empty() {
            node
        } else {
            self.store(BuilderNode::Extension(prefix.to_vec(), node))
        }
    }

    fn store(&mut self, node: BuilderNode) -> H256 {
        let bytes = node.encode();
        let hash = keccak256(&bytes);
        self.encoded.insert(hash, bytes);
        self.nodes.insert(hash, node);
        hash
    }
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
