//! Per-sender nonce-ordered transaction group.

use crate::core::transaction::Transaction;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

/// A pooled transaction together with its admission time.
///
/// The timestamp drives timeout eviction: a group whose oldest entry has
/// outlived the configured cache time gives up its newest entry first.
#[derive(Clone)]
pub struct TimedTransaction {
    /// The admitted transaction.
    pub tx: Arc<Transaction>,
    /// When the transaction entered (or re-entered) the group.
    pub timestamp: Instant,
}

impl TimedTransaction {
    pub fn new(tx: Arc<Transaction>) -> Self {
        Self {
            tx,
            timestamp: Instant::now(),
        }
    }
}

/// Result of [`NonceOrderedGroup::insert_or_replace`].
///
/// `Replaced` hands back the displaced entry so the owning buffer can drop
/// its hash-index record; only `Inserted` grows the buffer.
pub enum InsertOutcome {
    Inserted,
    Replaced(TimedTransaction),
}

/// Transactions of a single sender, sorted by strictly ascending nonce.
///
/// At most one transaction is stored per nonce. The owning buffer deletes a
/// group as soon as it becomes empty, so an existing group is never empty
/// between buffer operations.
pub struct NonceOrderedGroup {
    entries: VecDeque<TimedTransaction>,
}

impl NonceOrderedGroup {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry with the lowest nonce.
    pub fn front(&self) -> Option<&TimedTransaction> {
        self.entries.front()
    }

    /// Returns the entry with the highest nonce.
    pub fn back(&self) -> Option<&TimedTransaction> {
        self.entries.back()
    }

    /// Iterates entries in ascending nonce order.
    pub fn iter(&self) -> impl Iterator<Item = &TimedTransaction> {
        self.entries.iter()
    }

    /// Inserts `timed` at its nonce position, or replaces the entry already
    /// holding that nonce.
    ///
    /// Scans from the back: senders overwhelmingly submit nonces in
    /// ascending order, so the insertion point is almost always within the
    /// last few entries. A replacement carries the fresh timestamp of
    /// `timed`.
    pub fn insert_or_replace(&mut self, timed: TimedTransaction) -> InsertOutcome {
        let nonce = timed.tx.nonce;

        for i in (0..self.entries.len()).rev() {
            let existing = self.entries[i].tx.nonce;
            if existing == nonce {
                let old = std::mem::replace(&mut self.entries[i], timed);
                return InsertOutcome::Replaced(old);
            }
            if existing < nonce {
                self.entries.insert(i + 1, timed);
                return InsertOutcome::Inserted;
            }
        }

        self.entries.push_front(timed);
        InsertOutcome::Inserted
    }

    /// Removes and returns the entry with exactly `nonce`.
    ///
    /// Scans from the front and stops early once the scanned nonce exceeds
    /// the target, relying on the ascending order invariant.
    pub fn remove_by_nonce(&mut self, nonce: u64) -> Option<TimedTransaction> {
        for i in 0..self.entries.len() {
            let existing = self.entries[i].tx.nonce;
            if existing > nonce {
                return None;
            }
            if existing == nonce {
                return self.entries.remove(i);
            }
        }
        None
    }

    /// Removes and returns every entry with nonce less than or equal to
    /// `nonce`.
    pub fn remove_le_nonce(&mut self, nonce: u64) -> Vec<TimedTransaction> {
        let cut = self
            .entries
            .iter()
            .take_while(|timed| timed.tx.nonce <= nonce)
            .count();
        self.entries.drain(..cut).collect()
    }
}

impl Default for NonceOrderedGroup {
    fn default() -> Self {
        Self::new()
    }
}
