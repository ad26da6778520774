//! Chain-state collaborator interfaces.
//!
//! The pool never owns chain state. It reads sender nonces through a
//! [`ChainStateView`] obtained from a [`ChainStateProvider`], and re-acquires
//! a fresh view whenever a block is committed or written, so admission and
//! selection always compare against the canonical chain rather than a
//! drifting cache.

use crate::types::address::Address;
use std::sync::Arc;
use txpool_derive::Error;

/// Read-only view of account state at the canonical chain tip.
///
/// Implementations must be thread-safe and must not call back into the
/// pool: the pool invokes `nonce` while holding its coordination lock.
pub trait ChainStateView: Send + Sync {
    /// Returns the next expected nonce for `address`.
    fn nonce(&self, address: Address) -> u64;
}

/// Produces a view of the latest canonical chain state.
///
/// The pool calls `latest_view` once at first use and again after every
/// block-committed / block-written event.
pub trait ChainStateProvider: Send + Sync {
    /// Returns a read-only view of the current chain tip state.
    fn latest_view(&self) -> Result<Arc<dyn ChainStateView>, StateError>;
}

/// Errors surfaced by chain-state acquisition.
#[derive(Debug, Error)]
pub enum StateError {
    /// The latest chain state could not be obtained.
    #[error("latest chain state is unavailable: {0}")]
    Unavailable(String),
}
