//! Typed event bus with RAII subscriber tokens. Each event type gets its own
//! per-type subscriber list; dispatch can run immediately or be deferred to
//! the next frame boundary via a queue drained once per frame, covering both
//! immediate internal signals and queued cross-system events.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Callback = Box<dyn FnMut(&dyn Any) + Send>;

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

struct Subscription {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct TypedSlot {
    subscriptions: Vec<Subscription>,
}

/// Dropping the token removes its callback from the bus.
pub struct SubscriberToken {
    id: u64,
    type_id: TypeId,
    bus: Arc<Mutex<HashMap<TypeId, TypedSlot>>>,
}

impl Drop for SubscriberToken {
    fn drop(&mut self) {
        if let Ok(mut slots) = self.bus.lock() {
            if let Some(slot) = slots.get_mut(&self.type_id) {
                slot.subscriptions.retain(|s| s.id != self.id);
            }
        }
    }
}

#[derive(Default, Clone)]
pub struct EventBus {
    slots: Arc<Mutex<HashMap<TypeId, TypedSlot>>>,
    deferred: Arc<Mutex<Vec<Box<dyn FnOnce(&EventBus) + Send>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `E`; dropping the returned token
    /// unsubscribes.
    pub fn subscribe<E: 'static>(&self, mut callback: impl FnMut(&E) + Send + 'static) -> SubscriberToken {
        let id = NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed);
        let type_id = TypeId::of::<E>();
        let wrapped: Callback = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.slots
            .lock()
            .unwrap()
            .entry(type_id)
            .or_default()
            .subscriptions
            .push(Subscription { id, callback: wrapped });
        SubscriberToken { id, type_id, bus: Arc::clone(&self.slots) }
    }

    /// Dispatches `event` synchronously to every current subscriber.
    pub fn publish_now<E: 'static>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        if let Some(slot) = self.slots.lock().unwrap().get_mut(&type_id) {
            for sub in &mut slot.subscriptions {
                (sub.callback)(&event);
            }
        }
    }

    /// Queues `event` for dispatch at the next call to `drain_deferred`.
    pub fn publish_deferred<E: 'static + Send>(&self, event: E) {
        self.deferred.lock().unwrap().push(Box::new(move |bus| bus.publish_now(event)));
    }

    /// Drains the deferred queue, dispatching each event in FIFO order.
    /// Called once per frame at the event-queue-drain step of the
    /// application loop.
    pub fn drain_deferred(&self) {
        let queued: Vec<_> = std::mem::take(&mut *self.deferred.lock().unwrap());
        for dispatch in queued {
            dispatch(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    struct Ping(u32);

    #[test]
    fn synchronous_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let received = Arc::new(AtomicU32::new(0));
        let received_clone = Arc::clone(&received);
        let _token = bus.subscribe::<Ping>(move |p| received_clone.store(p.0, Ordering::SeqCst));

        bus.publish_now(Ping(42));
        assert_eq!(received.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn dropping_token_unsubscribes() {
        let bus = EventBus::new();
        let received = Arc::new(AtomicU32::new(0));
        let received_clone = Arc::clone(&received);
        let token = bus.subscribe::<Ping>(move |p| received_clone.store(p.0, Ordering::SeqCst));
        drop(token);

        bus.publish_now(Ping(7));
        assert_eq!(received.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn deferred_events_wait_for_drain() {
        let bus = EventBus::new();
        let received = Arc::new(AtomicU32::new(0));
        let received_clone = Arc::clone(&received);
        let _token = bus.subscribe::<Ping>(move |p| received_clone.store(p.0, Ordering::SeqCst));

        bus.publish_deferred(Ping(5));
        assert_eq!(received.load(Ordering::SeqCst), 0);
        bus.drain_deferred();
        assert_eq!(received.load(Ordering::SeqCst), 5);
    }
}
