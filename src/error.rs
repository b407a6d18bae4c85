use thiserror::Error;

/// Why a verification call rejected its input.
///
/// All of these are fatal for the given input: recovery means asking the
/// data source for a fresh, corrected proof, never retrying locally. A key
/// that provably does not exist is *not* an error; it surfaces as a
/// successful absence result from the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// A buffer read would run past the end of its buffer.
    #[error("buffer read out of bounds")]
    OutOfBounds,

    /// An integer field is wider than its consumer allows.
    #[error("oversized big-endian integer")]
    OversizedInteger,

    /// An RLP header byte is invalid in its position, or a declared content
    /// length exceeds the buffer.
    #[error("malformed RLP")]
    MalformedRlp,

    /// A string header appeared where a list header was required.
    #[error("expected an RLP list")]
    ExpectedList,

    /// The top two bits of a hex-prefix header byte were not zero.
    #[error("invalid hex-prefix header")]
    InvalidHpHeader,

    /// A proof node's keccak hash does not match the hash its parent
    /// committed to (or the root, for the first node).
    #[error("proof node hash does not match the expected hash")]
    InvalidNodeHash,

    /// Extra proof nodes follow a terminal node.
    #[error("proof continues past its terminal node")]
    ProofTooLong,

    /// The walk consumed more than 64 path nibbles.
    #[error("proof path longer than 64 nibbles")]
    ProofPathTooLong,

    /// A matching leaf was reached before all 64 path nibbles were consumed.
    #[error("leaf reached before the full path was consumed")]
    ProofPathTooShort,

    /// The proof ran out of nodes without reaching a terminal decision.
    #[error("proof ended without reaching a terminal node")]
    IncompleteProof,

    /// The header's hash does not match the trusted hash for its claimed
    /// block number, or no trusted hash is known for that number.
    #[error("header hash does not match the trusted hash for its block number")]
    UnverifiableBlock,
}
