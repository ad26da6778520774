//! Pool facade coordinating admission, selection, and chain synchronization.

use crate::chain::{ChainStateProvider, ChainStateView};
use crate::core::transaction::Transaction;
use crate::events::{Event, EventBus, EventType};
use crate::pool::buffer::TxBuffer;
use crate::pool::config::TxPoolConfig;
use crate::pool::errors::TxPoolError;
use crate::types::address::Address;
use crate::types::hash::Hash;
use crate::{error, info, warn};
use std::sync::{Arc, RwLock, Weak};

/// State guarded by the pool's coordination lock.
///
/// One coarse lock covers both the buffer and the chain-state handle: the
/// selection sweep needs a consistent snapshot across every sender, and the
/// handle swap on block commit must not interleave with admission checks.
struct PoolInner {
    buffer: TxBuffer,
    /// Current chain-state view; acquired lazily and replaced on every
    /// block-committed / block-written event.
    chain: Option<Arc<dyn ChainStateView>>,
}

/// Pool of pending transactions awaiting block inclusion.
///
/// Transactions enter the pool when they are received from the network or
/// submitted locally, and leave when the block that includes them commits,
/// when they time out, or when capacity pressure evicts them. The block
/// producer drains the executable prefix of each sender's nonce sequence
/// through [`get_txs`](Self::get_txs).
///
/// All operations are linearizable with respect to the internal
/// readers-writer lock. Event notifications fire outside that lock;
/// subscribers must not synchronously call back into the pool from the
/// notify path.
pub struct TxPool {
    config: TxPoolConfig,
    inner: RwLock<PoolInner>,
    provider: Arc<dyn ChainStateProvider>,
    events: Arc<dyn EventBus>,
}

impl TxPool {
    /// Creates a pool and subscribes it to block lifecycle events.
    ///
    /// The configuration is sanitized first, so out-of-range values fall
    /// back to the documented defaults. Both `BlockCommitted` and
    /// `BlockWritten` trigger a chain-state refresh; the subscriptions hold
    /// a weak reference so the bus does not keep a dropped pool alive.
    pub fn new(
        config: TxPoolConfig,
        provider: Arc<dyn ChainStateProvider>,
        events: Arc<dyn EventBus>,
    ) -> Arc<TxPool> {
        let mut config = config;
        config.sanitize();

        let pool = Arc::new(TxPool {
            config,
            inner: RwLock::new(PoolInner {
                buffer: TxBuffer::new(config.global_slots, config.max_cache_duration()),
                chain: None,
            }),
            provider,
            events: Arc::clone(&events),
        });

        for event_type in [EventType::BlockCommitted, EventType::BlockWritten] {
            let weak: Weak<TxPool> = Arc::downgrade(&pool);
            events.subscribe(
                event_type,
                Arc::new(move |_event| {
                    if let Some(pool) = weak.upgrade() {
                        pool.refresh_chain_view();
                    }
                }),
            );
        }

        pool
    }

    /// Returns the sanitized configuration the pool runs with.
    pub fn config(&self) -> &TxPoolConfig {
        &self.config
    }

    /// Returns the number of pooled transactions.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Admits a transaction to the pool.
    ///
    /// Rejects duplicates, transactions whose nonce is behind the sender's
    /// on-chain nonce, and transactions that cannot be given a slot. On
    /// success a [`Event::TxAdded`] notification is published after the
    /// pool lock is released.
    pub fn add_tx(&self, tx: Arc<Transaction>) -> Result<(), TxPoolError> {
        let hash = tx.hash();
        metrics::counter!("txpool.ingress").increment(1);

        let mut inner = self.inner.write().unwrap();

        let chain = self.chain_view(&mut inner);
        let chain_nonce = chain.nonce(tx.from);
        if tx.nonce < chain_nonce {
            warn!(
                "rejecting stale transaction {}: nonce {} below chain nonce {}",
                hash, tx.nonce, chain_nonce
            );
            return Err(TxPoolError::NonceTooLow {
                nonce: tx.nonce,
                chain_nonce,
            });
        }

        let pre_len = inner.buffer.len();
        match inner.buffer.add_tx(Arc::clone(&tx)) {
            Err(err @ TxPoolError::Duplicate(_)) => {
                metrics::counter!("txpool.duplicate").increment(1);
                info!("transaction {} already pooled", hash);
                return Err(err);
            }
            Err(err) => {
                warn!("transaction {} rejected: {}", hash, err);
                return Err(err);
            }
            Ok(()) => {
                if inner.buffer.len() <= pre_len {
                    // Admission displaced another entry instead of growing
                    // the pool.
                    metrics::counter!("txpool.discarded").increment(1);
                } else {
                    metrics::counter!("txpool.pooled").increment(1);
                }
            }
        }
        drop(inner);

        // Outside the lock: subscribers may take their own locks in turn.
        self.events.notify(&Event::TxAdded(tx));
        Ok(())
    }

    /// Returns a block-sized batch of currently executable transactions.
    ///
    /// Per sender, emits the maximal contiguous nonce run starting at the
    /// sender's chain nonce; a nonce gap ends the sender's run. Entries that
    /// fell behind the chain nonce are pruned in the same critical section.
    /// Selected transactions stay pooled until [`del_txs`](Self::del_txs)
    /// confirms their inclusion.
    pub fn get_txs(&self) -> Vec<Arc<Transaction>> {
        let max_txs = self.config.max_txs_per_block as usize;
        let mut batch = Vec::new();

        let mut inner = self.inner.write().unwrap();
        let chain = self.chain_view(&mut inner);

        let senders = inner.buffer.senders();
        for sender in senders {
            let mut expected = chain.nonce(sender);
            let mut stale: Vec<Hash> = Vec::new();
            let mut batch_full = false;

            if let Some(group) = inner.buffer.group(sender) {
                for timed in group.iter() {
                    if timed.tx.nonce == expected {
                        batch.push(Arc::clone(&timed.tx));
                        expected += 1;
                        if batch.len() == max_txs {
                            batch_full = true;
                            break;
                        }
                    } else if timed.tx.nonce < expected {
                        stale.push(timed.tx.hash());
                    } else {
                        // Nonce gap: nothing further in this group can
                        // execute yet.
                        break;
                    }
                }
            }

            for hash in stale {
                info!("pruning stale transaction {} during selection", hash);
                inner.buffer.remove_tx(hash);
            }
            if batch_full {
                break;
            }
        }
        drop(inner);

        info!("handing {} transactions to the block producer", batch.len());
        metrics::counter!("txpool.outgoing").increment(batch.len() as u64);
        batch
    }

    /// Removes committed transactions from the pool.
    ///
    /// For every transaction in the committed block, the sender's whole
    /// nonce prefix up to and including the committed nonce is dropped -
    /// lower-nonce leftovers that missed inclusion can never execute again.
    pub fn del_txs(&self, txs: &[Arc<Transaction>]) {
        let mut inner = self.inner.write().unwrap();
        for tx in txs {
            inner.buffer.remove_older_tx(tx.from, tx.nonce);
        }
    }

    /// Returns the pooled transaction with the given fingerprint.
    pub fn get_tx_by_hash(&self, hash: Hash) -> Option<Arc<Transaction>> {
        self.inner.read().unwrap().buffer.get(hash)
    }

    /// Returns the sender's highest pooled nonce, or 0 if the sender has no
    /// pooled transactions.
    pub fn get_pool_nonce(&self, address: Address) -> u64 {
        self.inner.read().unwrap().buffer.nonce_in_buffer(address)
    }

    /// Replaces the chain-state view with a freshly acquired one.
    ///
    /// Runs on every block-committed / block-written event so admission and
    /// selection always compare against the canonical chain tip.
    fn refresh_chain_view(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.chain = Some(self.acquire_latest_view());
    }

    /// Returns the current chain-state view, acquiring one if absent.
    fn chain_view(&self, inner: &mut PoolInner) -> Arc<dyn ChainStateView> {
        match &inner.chain {
            Some(view) => Arc::clone(view),
            None => {
                let view = self.acquire_latest_view();
                inner.chain = Some(Arc::clone(&view));
                view
            }
        }
    }

    /// Acquires the latest chain-state view from the provider.
    ///
    /// Acquisition failure is fatal: without a chain view the pool can
    /// neither admit nor select safely, so there is no degraded mode.
    fn acquire_latest_view(&self) -> Arc<dyn ChainStateView> {
        match self.provider.latest_view() {
            Ok(view) => view,
            Err(err) => {
                error!("failed to acquire the latest chain state view: {}", err);
                panic!("transaction pool cannot operate without chain state: {}", err);
            }
        }
    }
}
