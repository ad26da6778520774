//! Reference-counted byte buffer with copy-on-write semantics.

use crate::types::encoding::{Decode, DecodeError, Encode, EncodeSink};
use std::ops::Deref;
use std::sync::Arc;

/// A reference-counted, immutable byte buffer.
///
/// Wraps `Arc<Vec<u8>>` to provide cheap cloning and shared ownership.
/// Transaction payloads are immutable after admission and may be referenced
/// by the pool and by event subscribers at the same time; sharing the
/// allocation keeps those clones O(1). Mutations trigger copy-on-write via
/// `Arc::make_mut`.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Bytes(Arc<Vec<u8>>);

impl Bytes {
    /// Creates a new buffer from any type convertible to `Vec<u8>`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(data.into()))
    }

    /// Creates an empty buffer with the specified capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self(Arc::new(Vec::with_capacity(cap)))
    }

    /// Returns the number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the buffer contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Appends bytes to the buffer, cloning the backing storage if other
    /// references exist (copy-on-write).
    pub fn extend_from_slice(&mut self, s: &[u8]) {
        Arc::make_mut(&mut self.0).extend_from_slice(s);
    }
}

impl Clone for Bytes {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Deref for Bytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl Encode for Bytes {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.0.len().encode(out);
        out.write(self.as_slice());
    }
}

impl Decode for Bytes {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let vec = Vec::<u8>::decode(input)?;
        Ok(Bytes::new(vec))
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self::new(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(s: &[u8]) -> Self {
        Self::new(s)
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(arr: [u8; N]) -> Self {
        Self::new(arr)
    }
}

impl<const N: usize> From<&[u8; N]> for Bytes {
    fn from(arr: &[u8; N]) -> Self {
        Self::new(arr.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_allocation() {
        let a = Bytes::new(b"payload");
        let b = a.clone();
        assert_eq!(a.as_slice(), b.as_slice());
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn extend_copies_on_write() {
        let a = Bytes::new(b"pay");
        let mut b = a.clone();
        b.extend_from_slice(b"load");

        assert_eq!(a.as_slice(), b"pay");
        assert_eq!(b.as_slice(), b"payload");
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = Bytes::new(b"arbitrary payload");
        let encoded = original.to_bytes();
        let decoded = Bytes::from_bytes(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn empty_buffer() {
        let empty = Bytes::default();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }
}
