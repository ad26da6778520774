//! 20-byte account addresses.

use std::fmt;
use txpool_derive::BinaryCodec;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-size 20-byte address identifying the sender or recipient of a
/// transaction.
///
/// This type is `Copy` for efficient passing in admission and lookup
/// operations, and hashes cheaply as a `HashMap` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BinaryCodec)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Creates a zero-valued address (all bytes are 0x00).
    pub const fn zero() -> Address {
        Address([0u8; ADDRESS_LEN])
    }

    /// Returns the address as a byte slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates an address from a byte slice.
    ///
    /// Returns `None` if the slice length is not exactly [`ADDRESS_LEN`]
    /// bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Address> {
        if slice.len() != ADDRESS_LEN {
            return None;
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(slice);
        Some(Address(bytes))
    }

    /// Creates an address whose trailing 8 bytes hold `value` big-endian.
    ///
    /// Handy for tests and benchmarks that need many distinct senders.
    pub fn from_low_u64(value: u64) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
