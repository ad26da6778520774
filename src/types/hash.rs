//! 32-byte SHA3-256 hash type with zero-allocation operations.

use crate::types::encoding::{Decode, DecodeError, EncodeSink};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::sync::Mutex;
use txpool_derive::BinaryCodec;

/// SHA3-256 hash length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte hash used as the transaction fingerprint.
///
/// This type is `Copy` for performance - hashes are passed frequently during
/// admission and lookup and should live on the stack to avoid heap
/// allocations. At 32 bytes, copying is cheaper than reference indirection
/// on modern CPUs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BinaryCodec, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    ///
    /// Used as a sentinel value for uninitialized slots in tests.
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates a hash from a byte slice.
    ///
    /// Returns `None` if the slice length is not exactly [`HASH_LEN`] bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Hash> {
        if slice.len() != HASH_LEN {
            return None;
        }
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(slice);
        Some(Hash(bytes))
    }

    /// Creates a new SHA3-256 hash builder for incremental hashing.
    ///
    /// Use this for streaming data or when computing hashes over multiple
    /// inputs without intermediate allocations.
    pub fn sha3() -> HashBuilder {
        HashBuilder::new()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Incremental SHA3-256 hash builder.
///
/// Allows feeding data in chunks and finalizing to produce a [`Hash`].
/// Implements [`EncodeSink`] so encodable types can be hashed directly
/// without intermediate byte buffers.
pub struct HashBuilder {
    hasher: Sha3_256,
}

impl HashBuilder {
    pub fn new() -> Self {
        Self {
            hasher: Sha3_256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    pub fn chain(mut self, data: &[u8]) -> Self {
        self.hasher.update(data);
        self
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for HashBuilder {
    fn write(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }
}

/// Lazily-computed hash cache.
///
/// Stores the fingerprint of an immutable value after the first computation
/// so repeated lookups are O(1). The cache never participates in the
/// canonical encoding or in value equality: two values with identical
/// content are the same transaction whether or not either has been hashed.
#[derive(Debug)]
pub struct HashCache {
    cached: Mutex<Option<Hash>>,
}

impl HashCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached hash, computing and storing it via `f` on the
    /// first call.
    pub fn get_or_compute(&self, f: impl FnOnce() -> Hash) -> Hash {
        let mut guard = self.cached.lock().unwrap();
        match *guard {
            Some(hash) => hash,
            None => {
                let hash = f();
                *guard = Some(hash);
                hash
            }
        }
    }

    /// Returns the cached hash without computing.
    pub fn get(&self) -> Option<Hash> {
        *self.cached.lock().unwrap()
    }
}

impl Default for HashCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HashCache {
    fn clone(&self) -> Self {
        let cached = *self.cached.lock().unwrap();
        HashCache {
            cached: Mutex::new(cached),
        }
    }
}

// Cache state does not affect value equality.
impl PartialEq for HashCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HashCache {}

// The cache is not part of the canonical form: encoding writes nothing and
// decoding yields an empty cache.
impl crate::types::encoding::Encode for HashCache {
    fn encode<S: EncodeSink>(&self, _out: &mut S) {}
}

impl Decode for HashCache {
    fn decode(_input: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(HashCache::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_hash(seed: u8) -> Hash {
        let mut h = Hash::sha3();
        h.update(&[seed]);
        h.finalize()
    }

    #[test]
    fn sha3_is_deterministic() {
        assert_eq!(make_hash(7), make_hash(7));
        assert_ne!(make_hash(7), make_hash(8));
    }

    #[test]
    fn chain_matches_update() {
        let chained = Hash::sha3().chain(b"ab").chain(b"cd").finalize();
        let mut h = Hash::sha3();
        h.update(b"abcd");
        assert_eq!(chained, h.finalize());
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(Hash::from_slice(&[0u8; HASH_LEN]).is_some());
        assert!(Hash::from_slice(&[0u8; HASH_LEN - 1]).is_none());
        assert!(Hash::from_slice(&[0u8; HASH_LEN + 1]).is_none());
    }

    #[test]
    fn display_is_lowercase_hex() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = 0xAB;
        let rendered = format!("{}", Hash(bytes));
        assert_eq!(rendered.len(), HASH_LEN * 2);
        assert!(rendered.starts_with("ab"));
    }

    #[test]
    fn hash_cache_computes_on_first_call() {
        let cache = HashCache::new();
        let mut called = false;

        let hash = cache.get_or_compute(|| {
            called = true;
            make_hash(1)
        });

        assert!(called);
        assert_eq!(hash, make_hash(1));
    }

    #[test]
    fn hash_cache_returns_cached_value() {
        let cache = HashCache::new();
        let mut call_count = 0;

        let hash1 = cache.get_or_compute(|| {
            call_count += 1;
            make_hash(1)
        });

        let hash2 = cache.get_or_compute(|| {
            call_count += 1;
            make_hash(99) // Different hash, but should not be called
        });

        assert_eq!(call_count, 1);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn hash_cache_get_without_compute() {
        let cache = HashCache::new();
        assert!(cache.get().is_none());

        cache.get_or_compute(|| make_hash(42));
        assert_eq!(cache.get(), Some(make_hash(42)));
    }

    #[test]
    fn hash_cache_clone_preserves_cached_value() {
        let cache = HashCache::new();
        let _ = cache.get_or_compute(|| make_hash(42));

        let cloned = cache.clone();
        assert_eq!(cloned.get(), Some(make_hash(42)));
    }

    #[test]
    fn hash_cache_equality_ignores_state() {
        let empty = HashCache::new();
        let filled = HashCache::new();
        filled.get_or_compute(|| make_hash(3));
        assert_eq!(empty, filled);
    }
}
