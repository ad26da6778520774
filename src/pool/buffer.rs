//! Dual-index transaction buffer with capacity and timeout eviction.

use crate::core::transaction::Transaction;
use crate::pool::errors::TxPoolError;
use crate::pool::group::{InsertOutcome, NonceOrderedGroup, TimedTransaction};
use crate::types::address::Address;
use crate::types::hash::Hash;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Buffer holding every pooled transaction under two indices: a hash index
/// for existence checks and lookups, and a per-sender nonce-ordered group
/// index for selection and eviction.
///
/// Both indices reference the same `Arc<Transaction>`; removal updates both
/// in the same call so the indices never disagree. The cached `len` always
/// equals the hash-index size and the summed group sizes.
///
/// Not thread-safe on its own: the owning pool serializes access behind its
/// coordination lock.
pub struct TxBuffer {
    /// Primary existence index.
    by_hash: HashMap<Hash, Arc<Transaction>>,
    /// Selection/eviction index, one group per active sender.
    by_sender: HashMap<Address, NonceOrderedGroup>,
    /// Cached transaction count.
    len: usize,
    /// Maximum number of pooled transactions.
    limit: u64,
    /// Age of a group's oldest entry beyond which the group yields a slot.
    max_cache_time: Duration,
}

impl TxBuffer {
    pub fn new(limit: u64, max_cache_time: Duration) -> Self {
        Self {
            by_hash: HashMap::new(),
            by_sender: HashMap::new(),
            len: 0,
            limit,
            max_cache_time,
        }
    }

    /// Returns the number of pooled transactions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the pooled transaction with the given fingerprint.
    pub fn get(&self, hash: Hash) -> Option<Arc<Transaction>> {
        self.by_hash.get(&hash).cloned()
    }

    /// Returns the sender's group, if the sender has pooled transactions.
    pub fn group(&self, sender: Address) -> Option<&NonceOrderedGroup> {
        self.by_sender.get(&sender)
    }

    /// Returns the addresses that currently have pooled transactions.
    pub fn senders(&self) -> Vec<Address> {
        self.by_sender.keys().copied().collect()
    }

    /// Returns the highest pooled nonce for `sender`, or 0 if the sender has
    /// no pooled transactions.
    pub fn nonce_in_buffer(&self, sender: Address) -> u64 {
        match self.by_sender.get(&sender).and_then(|group| group.back()) {
            Some(timed) => timed.tx.nonce,
            None => 0,
        }
    }

    /// Admits a transaction into both indices.
    ///
    /// Admission order: duplicate check, insert, capacity check, then
    /// overflow resolution. Overflow frees exactly one slot, preferring a
    /// timed-out entry of the submitting sender, then a timed-out entry of
    /// any sender, and finally the submitting sender's own highest nonce.
    /// Only when that last victim turns out to be the transaction just
    /// inserted does admission fail with `BufferFull`.
    pub fn add_tx(&mut self, tx: Arc<Transaction>) -> Result<(), TxPoolError> {
        let hash = tx.hash();
        if self.by_hash.contains_key(&hash) {
            return Err(TxPoolError::Duplicate(hash));
        }
        self.by_hash.insert(hash, Arc::clone(&tx));

        let sender = tx.from;
        let group = self.by_sender.entry(sender).or_default();
        match group.insert_or_replace(TimedTransaction::new(tx)) {
            InsertOutcome::Replaced(old) => {
                // Same (sender, nonce) slot reused: the displaced transaction
                // leaves the hash index and the count stays unchanged.
                self.by_hash.remove(&old.tx.hash());
            }
            InsertOutcome::Inserted => {
                self.len += 1;
            }
        }

        if self.len as u64 <= self.limit {
            return Ok(());
        }

        // The submitting sender's own timed-out slot goes first.
        if self.remove_timed_out_for(sender) {
            return Ok(());
        }

        // Any other sender's timed-out slot recycles next.
        if self.remove_timed_out() {
            return Ok(());
        }

        // No stale slot anywhere: the submitting sender loses its highest
        // nonce. If that is the transaction we just inserted, the pool had no
        // room for it at all.
        let victim = self
            .by_sender
            .get(&sender)
            .and_then(|group| group.back())
            .map(|timed| timed.tx.hash());
        if let Some(victim) = victim {
            self.remove_tx(victim);
            if victim == hash {
                return Err(TxPoolError::BufferFull);
            }
        }
        Ok(())
    }

    /// Removes the transaction with the given fingerprint from both indices.
    ///
    /// Unknown fingerprints are a no-op.
    pub fn remove_tx(&mut self, hash: Hash) {
        let Some(tx) = self.by_hash.remove(&hash) else {
            return;
        };
        if let Some(group) = self.by_sender.get_mut(&tx.from) {
            group.remove_by_nonce(tx.nonce);
            if group.is_empty() {
                self.by_sender.remove(&tx.from);
            }
        }
        self.len -= 1;
    }

    /// Removes every transaction of `sender` with nonce less than or equal
    /// to `nonce`.
    ///
    /// Called when a block commits: the committed nonce and any lower-nonce
    /// leftovers that missed inclusion are all gone from the chain's point
    /// of view.
    pub fn remove_older_tx(&mut self, sender: Address, nonce: u64) {
        let removed = match self.by_sender.get_mut(&sender) {
            Some(group) => {
                let removed = group.remove_le_nonce(nonce);
                if group.is_empty() {
                    self.by_sender.remove(&sender);
                }
                removed
            }
            None => return,
        };

        for timed in &removed {
            self.by_hash.remove(&timed.tx.hash());
        }
        self.len -= removed.len();
    }

    /// Evicts the newest entry of the first group whose oldest entry has
    /// timed out. Returns true if a slot was freed.
    pub fn remove_timed_out(&mut self) -> bool {
        let victim = self
            .by_sender
            .values()
            .find(|group| self.group_expired(group))
            .and_then(|group| group.back())
            .map(|timed| timed.tx.hash());
        match victim {
            Some(hash) => {
                self.remove_tx(hash);
                true
            }
            None => false,
        }
    }

    /// Like [`remove_timed_out`](Self::remove_timed_out), but only considers
    /// the given sender's group.
    fn remove_timed_out_for(&mut self, sender: Address) -> bool {
        let victim = self
            .by_sender
            .get(&sender)
            .filter(|group| self.group_expired(group))
            .and_then(|group| group.back())
            .map(|timed| timed.tx.hash());
        match victim {
            Some(hash) => {
                self.remove_tx(hash);
                true
            }
            None => false,
        }
    }

    /// A group has expired when its oldest entry has been pooled longer
    /// than the configured cache time.
    fn group_expired(&self, group: &NonceOrderedGroup) -> bool {
        match group.front() {
            Some(front) => front.timestamp.elapsed() > self.max_cache_time,
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let group_total: usize = self.by_sender.values().map(|g| g.len()).sum();
        assert_eq!(self.len, self.by_hash.len(), "len vs hash index");
        assert_eq!(self.len, group_total, "len vs group total");
        assert!(self.len as u64 <= self.limit, "capacity exceeded");
        for group in self.by_sender.values() {
            assert!(!group.is_empty(), "empty group retained");
            let nonces: Vec<u64> = group.iter().map(|t| t.tx.nonce).collect();
            for pair in nonces.windows(2) {
                assert!(pair[0] < pair[1], "nonces not strictly ascending");
            }
            for timed in group.iter() {
                let indexed = self
                    .by_hash
                    .get(&timed.tx.hash())
                    .expect("group entry missing from hash index");
                assert!(Arc::ptr_eq(indexed, &timed.tx), "indices disagree");
            }
        }
    }
}
