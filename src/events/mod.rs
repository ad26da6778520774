//! In-process event bus connecting the pool to the rest of the node.
//!
//! The pool subscribes to block lifecycle events (to refresh its chain-state
//! view) and publishes an event for every admitted transaction (so the
//! network layer can propagate it). The bus is an injected capability: any
//! [`EventBus`] implementation works, and [`EventCenter`] is the in-process
//! default.
//!
//! Dispatch is synchronous: `notify` invokes every subscriber on the calling
//! thread before returning. Publishers therefore call `notify` outside their
//! own locks, and subscribers must not call back into the publisher from the
//! notify path.

use crate::core::transaction::Transaction;
use crate::types::hash::Hash;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Kinds of events carried by the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A block was committed to the canonical chain.
    BlockCommitted,
    /// A block was written to storage.
    BlockWritten,
    /// A transaction was admitted to the pool.
    TxAdded,
}

/// An event instance with its payload.
#[derive(Clone, Debug)]
pub enum Event {
    BlockCommitted(Hash),
    BlockWritten(Hash),
    TxAdded(Arc<Transaction>),
}

impl Event {
    /// Returns the [`EventType`] this event is dispatched under.
    pub fn event_type(&self) -> EventType {
        match self {
            Event::BlockCommitted(_) => EventType::BlockCommitted,
            Event::BlockWritten(_) => EventType::BlockWritten,
            Event::TxAdded(_) => EventType::TxAdded,
        }
    }
}

/// Callback invoked for every event of a subscribed type.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle identifying one subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriberId(u64);

/// Publish/subscribe capability.
pub trait EventBus: Send + Sync {
    /// Registers `handler` for all events of `event_type`.
    fn subscribe(&self, event_type: EventType, handler: EventHandler) -> SubscriberId;

    /// Removes a previously registered subscription. Unknown ids are a no-op.
    fn unsubscribe(&self, event_type: EventType, id: SubscriberId);

    /// Delivers `event` to every subscriber of its type.
    fn notify(&self, event: &Event);
}

/// Default in-process event bus.
///
/// Handlers run on the notifying thread, in subscription order. The
/// subscriber table lock is released before any handler runs, so handlers
/// may subscribe or unsubscribe, but must not notify recursively into a
/// publisher that holds its own lock.
pub struct EventCenter {
    subscribers: RwLock<HashMap<EventType, Vec<(SubscriberId, EventHandler)>>>,
    next_id: AtomicU64,
}

impl EventCenter {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Removes every subscription for every event type.
    pub fn unsubscribe_all(&self) {
        self.subscribers.write().unwrap().clear();
    }
}

impl Default for EventCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for EventCenter {
    fn subscribe(&self, event_type: EventType, handler: EventHandler) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap()
            .entry(event_type)
            .or_default()
            .push((id, handler));
        id
    }

    fn unsubscribe(&self, event_type: EventType, id: SubscriberId) {
        let mut subscribers = self.subscribers.write().unwrap();
        if let Some(handlers) = subscribers.get_mut(&event_type) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                subscribers.remove(&event_type);
            }
        }
    }

    fn notify(&self, event: &Event) {
        // Snapshot the handlers so the table lock is not held during dispatch.
        let handlers: Vec<EventHandler> = {
            let subscribers = self.subscribers.read().unwrap();
            match subscribers.get(&event.event_type()) {
                Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => return,
            }
        };

        for handler in handlers {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_handler(log: &Arc<Mutex<Vec<EventType>>>) -> EventHandler {
        let log = Arc::clone(log);
        Arc::new(move |event| log.lock().unwrap().push(event.event_type()))
    }

    #[test]
    fn notify_reaches_subscriber() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        center.subscribe(EventType::BlockCommitted, recording_handler(&log));

        center.notify(&Event::BlockCommitted(Hash::zero()));

        assert_eq!(*log.lock().unwrap(), vec![EventType::BlockCommitted]);
    }

    #[test]
    fn notify_skips_other_event_types() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        center.subscribe(EventType::BlockCommitted, recording_handler(&log));

        center.notify(&Event::BlockWritten(Hash::zero()));

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn notify_without_subscribers_is_a_noop() {
        let center = EventCenter::new();
        center.notify(&Event::BlockWritten(Hash::zero()));
    }

    #[test]
    fn multiple_subscribers_all_run() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        center.subscribe(EventType::BlockWritten, recording_handler(&log));
        center.subscribe(EventType::BlockWritten, recording_handler(&log));

        center.notify(&Event::BlockWritten(Hash::zero()));

        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = center.subscribe(EventType::BlockCommitted, recording_handler(&log));

        center.notify(&Event::BlockCommitted(Hash::zero()));
        center.unsubscribe(EventType::BlockCommitted, id);
        center.notify(&Event::BlockCommitted(Hash::zero()));

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_unknown_id_is_a_noop() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        center.subscribe(EventType::TxAdded, recording_handler(&log));

        center.unsubscribe(EventType::BlockCommitted, SubscriberId(999));
        center.unsubscribe(EventType::TxAdded, SubscriberId(999));

        let tx = crate::utils::test_utils::utils::new_tx(
            crate::utils::test_utils::utils::addr(1),
            0,
        );
        center.notify(&Event::TxAdded(tx));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_all_clears_every_type() {
        let center = EventCenter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        center.subscribe(EventType::BlockCommitted, recording_handler(&log));
        center.subscribe(EventType::BlockWritten, recording_handler(&log));

        center.unsubscribe_all();
        center.notify(&Event::BlockCommitted(Hash::zero()));
        center.notify(&Event::BlockWritten(Hash::zero()));

        assert!(log.lock().unwrap().is_empty());
    }
}
