//! Opaque 64-byte transaction signatures.
//!
//! The pool never verifies signatures; they travel with the transaction as
//! payload and participate in the canonical encoding (so two transactions
//! that differ only in signature have distinct fingerprints).

use txpool_derive::BinaryCodec;

/// Signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Raw signature bytes carried on a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BinaryCodec)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    /// Creates a zero-valued signature, useful for tests and unsigned
    /// placeholder transactions.
    pub const fn zero() -> Signature {
        Signature([0u8; SIGNATURE_LEN])
    }

    /// Returns the signature as a byte slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::zero()
    }
}
