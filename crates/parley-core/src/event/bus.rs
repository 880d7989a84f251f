//! Change notifications for the session cache.
//!
//! The snapshot channel says *that* the cache changed; the bus says *what*
//! changed. A subscriber that falls behind the bus loses individual events
//! and is told to re-read the snapshot instead.

use parley_types::event::CacheEvent;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

/// Events buffered per subscriber.
///
/// A streamed reply adds one `MessageAdded` per message, and a session switch
/// publishes at most three events, so this holds several long replies for a
/// renderer that only drains once per frame.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out of [`CacheEvent`]s. Clones publish on the same channel.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<CacheEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> CacheEvents {
        CacheEvents {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish to current subscribers; returns how many will see it.
    pub fn publish(&self, event: CacheEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// What a subscriber pulls off the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Event(CacheEvent),
    /// `skipped` events were overwritten before this subscriber read them.
    /// Rebuild from [`SessionCache::snapshot`](crate::chat::cache::SessionCache::snapshot).
    Resync { skipped: u64 },
}

/// Receiving end of an [`EventBus`].
#[derive(Debug)]
pub struct CacheEvents {
    receiver: broadcast::Receiver<CacheEvent>,
}

impl CacheEvents {
    /// Wait for the next delivery. `None` once every bus handle is dropped.
    pub async fn recv(&mut self) -> Option<Delivery> {
        match self.receiver.recv().await {
            Ok(event) => Some(Delivery::Event(event)),
            Err(RecvError::Lagged(skipped)) => Some(lagged(skipped)),
            Err(RecvError::Closed) => None,
        }
    }

    /// Next delivery if one is already queued.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Delivery::Event(event)),
            Err(TryRecvError::Lagged(skipped)) => Some(lagged(skipped)),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }
}

fn lagged(skipped: u64) -> Delivery {
    warn!(skipped, "Cache event subscriber lagged; resync from snapshot");
    Delivery::Resync { skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(id: &str) -> CacheEvent {
        CacheEvent::MessageAdded {
            message_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_each_event() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(CacheEvent::MessagesCleared), 2);

        assert_eq!(
            first.recv().await,
            Some(Delivery::Event(CacheEvent::MessagesCleared))
        );
        assert_eq!(
            second.recv().await,
            Some(Delivery::Event(CacheEvent::MessagesCleared))
        );
    }

    #[test]
    fn test_publish_without_subscribers_reaches_nobody() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(added("m1")), 0);
    }

    #[test]
    fn test_slow_subscriber_is_told_to_resync() {
        let bus = EventBus::new(4);
        let mut events = bus.subscribe();

        for i in 0..10 {
            bus.publish(added(&format!("m{i}")));
        }

        assert_eq!(events.try_recv(), Some(Delivery::Resync { skipped: 6 }));
        assert_eq!(events.try_recv(), Some(Delivery::Event(added("m6"))));
    }

    #[test]
    fn test_default_capacity_holds_a_long_streamed_reply() {
        let bus = EventBus::default();
        let mut events = bus.subscribe();

        for i in 0..DEFAULT_CAPACITY {
            bus.publish(added(&format!("m{i}")));
        }

        assert_eq!(events.try_recv(), Some(Delivery::Event(added("m0"))));
    }

    #[tokio::test]
    async fn test_recv_ends_when_bus_is_dropped() {
        let bus = EventBus::new(4);
        let clone = bus.clone();
        let mut events = bus.subscribe();

        clone.publish(CacheEvent::MessagesCleared);
        drop(bus);
        drop(clone);

        assert_eq!(
            events.recv().await,
            Some(Delivery::Event(CacheEvent::MessagesCleared))
        );
        assert_eq!(events.recv().await, None);
        assert!(events.try_recv().is_none());
    }
}
