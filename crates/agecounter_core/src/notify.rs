//! Typed in-process change notification.
//!
//! # Responsibility
//! - Deliver one event type to every registered callback, synchronously.
//! - Hand out subscription handles that unregister on drop.
//!
//! # Invariants
//! - Each `publish` reaches each subscriber registered at that moment once.
//! - Callbacks may subscribe or unsubscribe while an event is being
//!   delivered; the in-flight delivery uses the earlier snapshot.
//! - A handle outliving its channel is inert.
//!
//! Delivery is single-threaded; channel and handles are `!Send`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    subscribers: BTreeMap<u64, Callback<E>>,
}

trait Unregister {
    fn unregister(&self, id: u64);
}

impl<E> Unregister for RefCell<Registry<E>> {
    fn unregister(&self, id: u64) {
        self.borrow_mut().subscribers.remove(&id);
    }
}

/// Publish/subscribe channel carrying events of type `E`.
pub struct ChangeChannel<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> ChangeChannel<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                subscribers: BTreeMap::new(),
            })),
        }
    }

    /// Registers `callback` until the returned handle is dropped.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.insert(id, Rc::new(callback));
            id
        };

        let registry: Rc<dyn Unregister> = self.registry.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&registry),
        }
    }

    /// Delivers `event` to current subscribers and returns how many were called.
    pub fn publish(&self, event: &E) -> usize {
        let snapshot: Vec<Callback<E>> =
            self.registry.borrow().subscribers.values().cloned().collect();
        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }
}

impl<E: 'static> Default for ChangeChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration handle returned by [`ChangeChannel::subscribe`].
///
/// Dropping the handle unregisters the callback.
#[must_use = "dropping a subscription unregisters its callback immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unregister>,
}

impl Subscription {
    /// Unregisters explicitly; same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &(self.registry.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeChannel;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn publish_reaches_every_subscriber_once() {
        let channel = ChangeChannel::<u32>::new();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let first_seen = first.clone();
        let _a = channel.subscribe(move |value| first_seen.set(first_seen.get() + value));
        let second_seen = second.clone();
        let _b = channel.subscribe(move |value| second_seen.set(second_seen.get() + value));

        assert_eq!(channel.publish(&5), 2);
        assert_eq!(first.get(), 5);
        assert_eq!(second.get(), 5);
    }

    #[test]
    fn dropped_handle_stops_delivery() {
        let channel = ChangeChannel::<()>::new();
        let calls = Rc::new(Cell::new(0));

        let seen = calls.clone();
        let handle = channel.subscribe(move |_| seen.set(seen.get() + 1));
        channel.publish(&());
        drop(handle);
        channel.publish(&());

        assert_eq!(calls.get(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn explicit_unsubscribe_matches_drop() {
        let channel = ChangeChannel::<()>::new();
        let handle = channel.subscribe(|_| {});
        assert_eq!(channel.subscriber_count(), 1);
        handle.unsubscribe();
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn handle_outliving_channel_is_inert() {
        let channel = ChangeChannel::<()>::new();
        let handle = channel.subscribe(|_| {});
        drop(channel);
        drop(handle);
    }

    #[test]
    fn subscribing_during_delivery_does_not_join_current_event() {
        let channel = Rc::new(ChangeChannel::<()>::new());
        let late_calls = Rc::new(Cell::new(0));
        let late_handles = Rc::new(RefCell::new(Vec::new()));

        let inner_channel = Rc::downgrade(&channel);
        let inner_calls = late_calls.clone();
        let inner_handles = late_handles.clone();
        let _outer = channel.subscribe(move |_| {
            if let Some(channel) = inner_channel.upgrade() {
                let calls = inner_calls.clone();
                let handle = channel.subscribe(move |_| calls.set(calls.get() + 1));
                inner_handles.borrow_mut().push(handle);
            }
        });

        assert_eq!(channel.publish(&()), 1);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(channel.subscriber_count(), 2);

        channel.publish(&());
        assert_eq!(late_calls.get(), 1);
    }
}
