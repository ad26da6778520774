//! Transaction pool: admission, selection, and eviction of pending
//! transactions.

pub mod buffer;
pub mod config;
pub mod errors;
pub mod group;
pub mod txpool;

pub use config::TxPoolConfig;
pub use errors::TxPoolError;
pub use txpool::TxPool;
