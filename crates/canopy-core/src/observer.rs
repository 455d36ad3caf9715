#![forbid(unsafe_code)]

//! Change notification plumbing.
//!
//! # Design
//!
//! Two kinds of listeners exist:
//!
//! - [`TreeObserver`]: registered on a [`Tree`] and called synchronously after
//!   every structural edit with read access to the updated tree. The tree
//!   holds observers weakly; dropping the last `Rc` is enough to stop
//!   delivery, and [`Tree::unsubscribe`](crate::Tree::unsubscribe) stops it
//!   explicitly.
//! - [`Broadcast`]: a subscriber list for derived events (for example the
//!   insert/remove deltas a flattener publishes). Callbacks are stored as
//!   `Weak` and kept alive by the returned [`Subscription`] guard.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dead subscribers are pruned lazily during notification.
//! 3. No `RefCell` borrow is held while a callback runs, so callbacks may
//!    subscribe or query the broadcaster's owner.

use crate::tree::{Tree, TreeEvent};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Receives structural change notifications from a [`Tree`].
///
/// Observers see the tree *after* the change was applied. They get shared
/// access only, so an observer can never mutate the tree it is watching.
pub trait TreeObserver<T> {
    /// Called once per structural change.
    fn on_tree_event(&self, tree: &Tree<T>, event: &TreeEvent);
}

/// Registration handle returned by [`Tree::subscribe`](crate::Tree::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

impl ObserverId {
    /// Raw numeric id (diagnostics only).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// A subscriber list for events of type `E`.
///
/// Cloning a `Broadcast` creates a new handle to the **same** subscriber
/// list.
pub struct Broadcast<E> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<E>>>>,
}

impl<E> Clone for Broadcast<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E> Default for Broadcast<E> {
    fn default() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E> fmt::Debug for Broadcast<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<E: 'static> Broadcast<E> {
    /// Create an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. Dropping the returned guard unsubscribes it.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Deliver `event` to every live subscriber.
    pub fn notify(&self, event: &E) {
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subs = self.subscribers.borrow_mut();
            subs.retain(|w| w.strong_count() > 0);
            subs.iter().filter_map(Weak::upgrade).collect()
        };
        if callbacks.is_empty() {
            return;
        }
        trace!(
            message = "broadcast.notify",
            subscribers = callbacks.len() as u64
        );
        for cb in &callbacks {
            cb(event);
        }
    }
}

/// RAII guard for a [`Broadcast`] subscriber.
///
/// Dropping the guard drops the only strong reference to the callback, so the
/// broadcaster's weak entry stops upgrading and is pruned on the next
/// notification.
#[must_use = "dropping a Subscription unsubscribes the callback"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let b: Broadcast<u32> = Broadcast::new();
        let l1 = Rc::clone(&log);
        let _s1 = b.subscribe(move |v| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let _s2 = b.subscribe(move |v| l2.borrow_mut().push(("second", *v)));

        b.notify(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn dropped_subscription_stops_delivery_and_is_pruned() {
        let hits = Rc::new(Cell::new(0));
        let b: Broadcast<()> = Broadcast::new();
        let h = Rc::clone(&hits);
        let sub = b.subscribe(move |()| h.set(h.get() + 1));

        b.notify(&());
        drop(sub);
        b.notify(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_subscribe_reentrantly() {
        let b: Broadcast<u8> = Broadcast::new();
        let inner = b.clone();
        let keep = Rc::new(RefCell::new(Vec::new()));
        let keep2 = Rc::clone(&keep);
        let _s = b.subscribe(move |_| {
            keep2.borrow_mut().push(inner.subscribe(|_| {}));
        });
        b.notify(&1);
        assert_eq!(b.subscriber_count(), 2);
    }

    #[test]
    fn clones_share_subscribers() {
        let hits = Rc::new(Cell::new(0));
        let a: Broadcast<()> = Broadcast::new();
        let h = Rc::clone(&hits);
        let _s = a.subscribe(move |()| h.set(h.get() + 1));
        a.clone().notify(&());
        assert_eq!(hits.get(), 1);
    }
}
