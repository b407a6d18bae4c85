//! Stateless verification of Ethereum state against a trusted block hash.
//!
//! Given nothing but a 32-byte hash known to be good, this crate recovers:
//!
//! * a block's state root from its raw RLP header bytes
//!   ([`block_state_root`]),
//! * an account's storage root from a state-trie proof
//!   ([`account_storage_root`]),
//! * a single storage slot's value from a storage-trie proof
//!   ([`storage_value`]).
//!
//! The proof material is untrusted: every node is re-hashed and checked
//! against the hash its parent committed to, so a verifier never needs to
//! hold the trie itself. Malformed or tampered input is rejected with a
//! [`VerifyError`]; a well-formed proof of a missing key verifies to an
//! explicit absence (zero value, empty-trie storage root).
//!
//! Every call is a pure function of its inputs. Nothing is fetched, nothing
//! is cached.

pub mod builder;
pub mod error;
pub mod hash;
pub mod header;
pub mod path;
pub mod reader;
pub mod rlp;
pub mod types;
pub mod verify;
pub mod walker;

pub use builder::*;
pub use error::*;
pub use hash::*;
pub use header::*;
pub use path::*;
pub use reader::*;
pub use rlp::*;
pub use types::*;
pub use verify::*;
pub use walker::*;
