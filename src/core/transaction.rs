//! Transaction structure with reference-counted payload storage.

use crate::types::address::Address;
use crate::types::bytes::Bytes;
use crate::types::encoding::Encode;
use crate::types::hash::{Hash, HashCache};
use crate::types::signature::Signature;
use txpool_derive::BinaryCodec;

/// A signed transaction as seen by the pool.
///
/// The pool interprets only `from`, `nonce`, and the cached fingerprint;
/// every other field is payload that rides along to the block producer.
/// Uses `Bytes` for zero-copy sharing - transactions are immutable after
/// admission and are referenced by both pool indices at once.
#[derive(Debug, Clone, PartialEq, Eq, BinaryCodec)]
pub struct Transaction {
    /// Sender address the nonce sequence belongs to.
    pub from: Address,
    /// Recipient account for value transfer or call execution.
    pub recipient: Address,
    /// Arbitrary transaction payload (e.g., contract call data).
    pub payload: Bytes,

    /// Native token amount to transfer to the recipient.
    pub amount: u128,
    /// Price per gas unit offered by the sender.
    pub gas_price: u128,
    /// Maximum gas the sender authorizes for execution.
    pub gas_limit: u64,
    /// Monotonic counter preventing replay for this sender.
    pub nonce: u64,

    /// Signature over the transaction contents; opaque to the pool.
    pub signature: Signature,

    /// Cached fingerprint, computed lazily on first access, do not use directly.
    cached_hash: HashCache,
}

impl Transaction {
    /// Creates a new transaction.
    ///
    /// The signature is carried verbatim; the pool performs no verification.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        from: Address,
        recipient: Address,
        payload: impl Into<Bytes>,
        amount: u128,
        gas_price: u128,
        gas_limit: u64,
        nonce: u64,
        signature: Signature,
    ) -> Self {
        Transaction {
            from,
            recipient,
            payload: payload.into(),
            amount,
            gas_price,
            gas_limit,
            nonce,
            signature,
            cached_hash: HashCache::new(),
        }
    }

    /// Returns the unique transaction fingerprint.
    ///
    /// Computed as SHA3-256 over the domain-tagged canonical encoding of the
    /// full transaction, signature included, ensuring uniqueness even for
    /// identical payloads signed by different senders. The result is cached
    /// so repeated calls are O(1).
    pub fn hash(&self) -> Hash {
        self.cached_hash.get_or_compute(|| {
            let mut h = Hash::sha3();
            h.update(b"TX");
            self.encode(&mut h);
            h.finalize()
        })
    }
}
