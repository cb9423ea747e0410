// SPDX-License-Identifier: MPL-2.0
//! Snapshot delivery to the rendering surface.
//!
//! After every mutation the toaster builds an immutable [`Snapshot`] of the
//! ordered collection (Exiting entries included) and hands it to each
//! registered listener. Listeners are removed by dropping the
//! [`Subscription`] returned from `subscribe`.

use super::notification::{Notification, NotificationId, Position};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Immutable view of the collection at one revision.
///
/// Cloning is cheap: the entries are shared.
#[derive(Debug)]
pub struct Snapshot<M = String> {
    revision: u64,
    notifications: Arc<[Notification<M>]>,
}

impl<M> Clone for Snapshot<M> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            notifications: Arc::clone(&self.notifications),
        }
    }
}

impl<M> Default for Snapshot<M> {
    fn default() -> Self {
        Self {
            revision: 0,
            notifications: Arc::from(Vec::new()),
        }
    }
}

impl<M> Snapshot<M> {
    pub(crate) fn new(revision: u64, notifications: Vec<Notification<M>>) -> Self {
        Self {
            revision,
            notifications: notifications.into(),
        }
    }

    /// Monotonic revision; higher means newer.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn notifications(&self) -> &[Notification<M>] {
        &self.notifications
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification<M>> {
        self.notifications.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<&Notification<M>> {
        self.iter().find(|notification| notification.id() == id)
    }

    /// Active entries only.
    pub fn active(&self) -> impl Iterator<Item = &Notification<M>> {
        self.iter().filter(|notification| notification.is_active())
    }

    /// Entries displayed in one screen zone, in insertion order.
    pub fn at(&self, position: Position) -> impl Iterator<Item = &Notification<M>> {
        self.iter()
            .filter(move |notification| notification.position() == position)
    }
}

type Listener<M> = Arc<dyn Fn(&Snapshot<M>) + Send + Sync>;

/// Registered snapshot listeners.
pub(crate) struct Listeners<M> {
    inner: Mutex<ListenerList<M>>,
}

struct ListenerList<M> {
    next_key: u64,
    entries: Vec<(u64, Listener<M>)>,
}

impl<M> Listeners<M> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(ListenerList {
                next_key: 0,
                entries: Vec::new(),
            }),
        }
    }

    pub(crate) fn insert(self: &Arc<Self>, listener: Listener<M>) -> Subscription
    where
        M: 'static,
    {
        let mut list = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let key = list.next_key;
        list.next_key += 1;
        list.entries.push((key, listener));

        let weak: Weak<Self> = Arc::downgrade(self);
        Subscription {
            key,
            remove: Some(Box::new(move |key| {
                if let Some(listeners) = weak.upgrade() {
                    listeners.remove(key);
                }
            })),
        }
    }

    fn remove(&self, key: u64) {
        let mut list = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        list.entries.retain(|(k, _)| *k != key);
    }

    /// Calls every listener with `snapshot`.
    ///
    /// The list is copied first so a listener may subscribe or unsubscribe
    /// from inside its callback.
    pub(crate) fn notify(&self, snapshot: &Snapshot<M>) {
        let listeners: Vec<Listener<M>> = {
            let list = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            list.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(snapshot);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// Handle of a registered listener. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the listener"]
pub struct Subscription {
    key: u64,
    remove: Option<Box<dyn FnOnce(u64) + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribes explicitly.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Listener<String> {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &Snapshot<String>| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn listeners_receive_every_notify() {
        let listeners = Arc::new(Listeners::<String>::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let _subscription = listeners.insert(counting_listener(&counter));

        listeners.notify(&Snapshot::default());
        listeners.notify(&Snapshot::default());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let listeners = Arc::new(Listeners::<String>::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = listeners.insert(counting_listener(&counter));
        let _other = listeners.insert(counting_listener(&counter));
        assert_eq!(listeners.len(), 2);

        subscription.unsubscribe();
        assert_eq!(listeners.len(), 1);

        listeners.notify(&Snapshot::default());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_outliving_listeners_is_harmless() {
        let listeners = Arc::new(Listeners::<String>::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = listeners.insert(counting_listener(&counter));
        drop(listeners);
        drop(subscription);
    }

    #[test]
    fn default_snapshot_is_empty() {
        let snapshot: Snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.revision(), 0);
        assert_eq!(snapshot.active().count(), 0);
        assert!(snapshot.get(&NotificationId::new("missing")).is_none());
    }
}
