//! Test utilities for pool testing.

#[cfg(test)]
pub mod utils {
    use crate::chain::{ChainStateProvider, ChainStateView, StateError};
    use crate::core::transaction::Transaction;
    use crate::types::address::Address;
    use crate::types::signature::Signature;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};

    /// Builds a deterministic address from a single byte.
    pub fn addr(byte: u8) -> Address {
        Address([byte; crate::types::address::ADDRESS_LEN])
    }

    /// Builds a transaction from `from` with the given nonce.
    ///
    /// The sender and nonce fully determine the fingerprint, so two calls
    /// with the same arguments produce equal transactions and two calls with
    /// different arguments produce distinct ones.
    pub fn new_tx(from: Address, nonce: u64) -> Arc<Transaction> {
        Arc::new(Transaction::new(
            from,
            Address::zero(),
            Vec::new(),
            0,
            1,
            21_000,
            nonce,
            Signature::zero(),
        ))
    }

    /// Chain-state view with programmable per-address nonces.
    ///
    /// Shared mutable so a test can advance the chain mid-scenario while the
    /// pool keeps reading through the same view.
    pub struct MockChainView {
        nonces: RwLock<HashMap<Address, u64>>,
    }

    impl MockChainView {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                nonces: RwLock::new(HashMap::new()),
            })
        }

        /// Sets the chain nonce reported for `address`.
        pub fn set_nonce(&self, address: Address, nonce: u64) {
            self.nonces.write().unwrap().insert(address, nonce);
        }
    }

    impl ChainStateView for MockChainView {
        fn nonce(&self, address: Address) -> u64 {
            self.nonces
                .read()
                .unwrap()
                .get(&address)
                .copied()
                .unwrap_or(0)
        }
    }

    /// Provider handing out a shared [`MockChainView`], optionally failing.
    pub struct MockStateProvider {
        view: Arc<MockChainView>,
        fail: AtomicBool,
        acquisitions: AtomicUsize,
    }

    impl MockStateProvider {
        pub fn new(view: Arc<MockChainView>) -> Arc<Self> {
            Arc::new(Self {
                view,
                fail: AtomicBool::new(false),
                acquisitions: AtomicUsize::new(0),
            })
        }

        /// Makes every subsequent `latest_view` call fail.
        pub fn fail_next_acquisition(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        /// Number of successful `latest_view` calls so far.
        pub fn acquisitions(&self) -> usize {
            self.acquisitions.load(Ordering::SeqCst)
        }
    }

    impl ChainStateProvider for MockStateProvider {
        fn latest_view(&self) -> Result<Arc<dyn ChainStateView>, StateError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StateError::Unavailable("mock provider failure".into()));
            }
            self.acquisitions.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::clone(&self.view) as Arc<dyn ChainStateView>)
        }
    }
}
