//! Pool configuration and sanitization.

use crate::warn;
use std::time::Duration;

/// Default maximum number of pooled transactions.
pub const DEFAULT_GLOBAL_SLOTS: u64 = 40_960;
/// Default maximum number of transactions handed out per block.
pub const DEFAULT_MAX_TXS_PER_BLOCK: u64 = 20_480;
/// Default seconds a transaction may sit in the pool before it becomes an
/// eviction candidate.
pub const DEFAULT_TX_MAX_CACHE_TIME: u64 = 600;

/// Configuration parameters of the transaction pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxPoolConfig {
    /// Maximum number of transaction slots in the pool.
    pub global_slots: u64,
    /// Maximum number of transactions returned for one block.
    pub max_txs_per_block: u64,
    /// Seconds before a pooled transaction is considered stale, in (0, 600].
    pub tx_max_cache_time: u64,
}

impl Default for TxPoolConfig {
    fn default() -> Self {
        Self {
            global_slots: DEFAULT_GLOBAL_SLOTS,
            max_txs_per_block: DEFAULT_MAX_TXS_PER_BLOCK,
            tx_max_cache_time: DEFAULT_TX_MAX_CACHE_TIME,
        }
    }
}

impl TxPoolConfig {
    /// Replaces unreasonable or unworkable values with the defaults.
    ///
    /// Each field is clamped to its documented range; out-of-range values
    /// are logged and reset rather than rejected, so a partially bad config
    /// still yields a working pool.
    pub(crate) fn sanitize(&mut self) {
        if self.global_slots < 1 || self.global_slots > DEFAULT_GLOBAL_SLOTS {
            warn!(
                "sanitizing invalid pool global slots {}, using {}",
                self.global_slots, DEFAULT_GLOBAL_SLOTS
            );
            self.global_slots = DEFAULT_GLOBAL_SLOTS;
        }
        if self.max_txs_per_block < 1 || self.max_txs_per_block > DEFAULT_MAX_TXS_PER_BLOCK {
            warn!(
                "sanitizing invalid max transactions per block {}, using {}",
                self.max_txs_per_block, DEFAULT_MAX_TXS_PER_BLOCK
            );
            self.max_txs_per_block = DEFAULT_MAX_TXS_PER_BLOCK;
        }
        if self.tx_max_cache_time < 1 || self.tx_max_cache_time > DEFAULT_TX_MAX_CACHE_TIME {
            warn!(
                "sanitizing invalid transaction cache time {}, using {}",
                self.tx_max_cache_time, DEFAULT_TX_MAX_CACHE_TIME
            );
            self.tx_max_cache_time = DEFAULT_TX_MAX_CACHE_TIME;
        }
    }

    /// Returns the cache time as a [`Duration`].
    pub fn max_cache_duration(&self) -> Duration {
        Duration::from_secs(self.tx_max_cache_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_already_sane() {
        let mut config = TxPoolConfig::default();
        let before = config;
        config.sanitize();
        assert_eq!(config, before);
    }

    #[test]
    fn in_range_values_are_kept() {
        let mut config = TxPoolConfig {
            global_slots: 2,
            max_txs_per_block: 2,
            tx_max_cache_time: 1,
        };
        config.sanitize();
        assert_eq!(config.global_slots, 2);
        assert_eq!(config.max_txs_per_block, 2);
        assert_eq!(config.tx_max_cache_time, 1);
    }

    #[test]
    fn zero_values_reset_to_defaults() {
        let mut config = TxPoolConfig {
            global_slots: 0,
            max_txs_per_block: 0,
            tx_max_cache_time: 0,
        };
        config.sanitize();
        assert_eq!(config.global_slots, DEFAULT_GLOBAL_SLOTS);
        assert_eq!(config.max_txs_per_block, DEFAULT_MAX_TXS_PER_BLOCK);
        assert_eq!(config.tx_max_cache_time, DEFAULT_TX_MAX_CACHE_TIME);
    }

    #[test]
    fn oversized_values_reset_to_defaults() {
        let mut config = TxPoolConfig {
            global_slots: DEFAULT_GLOBAL_SLOTS + 1,
            max_txs_per_block: DEFAULT_MAX_TXS_PER_BLOCK + 1,
            tx_max_cache_time: DEFAULT_TX_MAX_CACHE_TIME + 1,
        };
        config.sanitize();
        assert_eq!(config.global_slots, DEFAULT_GLOBAL_SLOTS);
        assert_eq!(config.max_txs_per_block, DEFAULT_MAX_TXS_PER_BLOCK);
        assert_eq!(config.tx_max_cache_time, DEFAULT_TX_MAX_CACHE_TIME);
    }

    #[test]
    fn boundary_values_are_kept() {
        let mut config = TxPoolConfig {
            global_slots: DEFAULT_GLOBAL_SLOTS,
            max_txs_per_block: DEFAULT_MAX_TXS_PER_BLOCK,
            tx_max_cache_time: DEFAULT_TX_MAX_CACHE_TIME,
        };
        config.sanitize();
        assert_eq!(config.global_slots, DEFAULT_GLOBAL_SLOTS);
        assert_eq!(config.max_txs_per_block, DEFAULT_MAX_TXS_PER_BLOCK);
        assert_eq!(config.tx_max_cache_time, DEFAULT_TX_MAX_CACHE_TIME);
    }

    #[test]
    fn max_cache_duration_converts_seconds() {
        let config = TxPoolConfig {
            tx_max_cache_time: 3,
            ..TxPoolConfig::default()
        };
        assert_eq!(config.max_cache_duration(), Duration::from_secs(3));
    }
}
