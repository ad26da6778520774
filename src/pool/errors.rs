//! Errors surfaced by pool admission.

use crate::types::hash::Hash;
use txpool_derive::Error;

/// Reasons a transaction is not admitted.
///
/// `NonceTooLow` is distinct from `BufferFull`: a stale transaction is the
/// sender's problem and is not counted against the pool's discard metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxPoolError {
    /// A transaction with the same fingerprint is already pooled.
    #[error("transaction {0} is already in the pool")]
    Duplicate(Hash),
    /// The transaction nonce is behind the sender's on-chain nonce.
    #[error("transaction nonce {nonce} is below the chain nonce {chain_nonce}")]
    NonceTooLow { nonce: u64, chain_nonce: u64 },
    /// The pool is at capacity and no eviction victim could be found.
    #[error("transaction pool is full")]
    BufferFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            format!("{}", TxPoolError::Duplicate(Hash::zero())),
            format!("transaction {} is already in the pool", Hash::zero())
        );
        assert_eq!(
            format!(
                "{}",
                TxPoolError::NonceTooLow {
                    nonce: 1,
                    chain_nonce: 5
                }
            ),
            "transaction nonce 1 is below the chain nonce 5"
        );
        assert_eq!(
            format!("{}", TxPoolError::BufferFull),
            "transaction pool is full"
        );
    }
}
