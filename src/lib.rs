//! Transaction pool library.
//!
//! Buffers signed transactions between ingress and the block producer:
//! deduplicates by fingerprint, keeps each sender's transactions in nonce
//! order, bounds total capacity with timeout-aware eviction, and hands out
//! block-sized batches of executable transactions on request.

pub mod chain;
pub mod core;
pub mod events;
pub mod pool;
pub mod types;
pub mod utils;
