// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscription handles and delivery targets.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use ripple_core::{Event, RippleError};

use crate::stream::StreamCore;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a subscription.
///
/// Identity is independent of the subscribed payload type; two
/// subscriptions compare equal exactly when their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity token used for bulk unsubscription.
///
/// Streams expose their own token through `Stream::owner_token`; any other
/// `Arc` works as well. Subscriptions hold it weakly, so an owner going
/// away never keeps a registration alive.
pub type OwnerToken = Arc<dyn Any + Send + Sync>;

/// Options for the full-control subscribe forms.
pub struct SubscribeOptions {
    /// Identity used by `Stream::unsubscribe_owner`; held weakly.
    pub owner: Option<OwnerToken>,
    /// When `true` (the default), subscribing immediately drains any
    /// backlogged events to every current subscriber.
    pub send_now: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            owner: None,
            send_now: true,
        }
    }
}

impl SubscribeOptions {
    /// Subscribe on behalf of `owner`, replaying the backlog.
    pub fn owned_by(owner: OwnerToken) -> Self {
        Self {
            owner: Some(owner),
            send_now: true,
        }
    }

    /// Subscribe without replaying the backlog; only future appends are
    /// delivered.
    pub fn deferred() -> Self {
        Self {
            owner: None,
            send_now: false,
        }
    }

    /// Sets the owner token.
    pub fn with_owner(mut self, owner: OwnerToken) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// The delivery target of a registered subscription: one generic event
/// handler, or a split value/error/completion triple.
pub(crate) enum Action<T> {
    Event(Arc<dyn Fn(&Event<T>) + Send + Sync>),
    Split {
        on_value: Arc<dyn Fn(&T) + Send + Sync>,
        on_error: Arc<dyn Fn(&RippleError) + Send + Sync>,
        on_completed: Arc<dyn Fn() + Send + Sync>,
    },
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        match self {
            Action::Event(f) => Action::Event(Arc::clone(f)),
            Action::Split {
                on_value,
                on_error,
                on_completed,
            } => Action::Split {
                on_value: Arc::clone(on_value),
                on_error: Arc::clone(on_error),
                on_completed: Arc::clone(on_completed),
            },
        }
    }
}

/// A registered subscription as the stream stores it.
pub(crate) struct SubscriptionEntry<T> {
    pub(crate) id: SubscriptionId,
    pub(crate) owner: Option<Weak<dyn Any + Send + Sync>>,
    pub(crate) action: Action<T>,
}

impl<T> Clone for SubscriptionEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            owner: self.owner.clone(),
            action: self.action.clone(),
        }
    }
}

impl<T> SubscriptionEntry<T> {
    /// Routes an event to the matching handler.
    pub(crate) fn dispatch(&self, event: &Event<T>) {
        match &self.action {
            Action::Event(handler) => handler(event),
            Action::Split {
                on_value,
                on_error,
                on_completed,
            } => match event {
                Event::Value(value) => on_value(value),
                Event::Error(error) => on_error(error),
                Event::Completed => on_completed(),
            },
        }
    }

    /// `true` if the weak owner token has decayed or matches `owner`.
    pub(crate) fn owned_by(&self, owner: &OwnerToken) -> bool {
        match &self.owner {
            None => false,
            Some(weak) => match weak.upgrade() {
                None => true,
                Some(held) => {
                    std::ptr::addr_eq(Arc::as_ptr(&held), Arc::as_ptr(owner))
                }
            },
        }
    }
}

/// Handle to a registered subscription.
///
/// Holds only a weak reference back to the stream it is registered on, so
/// a retained handle never keeps a dead stream alive; cancelling after the
/// stream is gone is an inert no-op.
pub struct Subscription<T> {
    id: SubscriptionId,
    core: Weak<StreamCore<T>>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(id: SubscriptionId, core: Weak<StreamCore<T>>) -> Self {
        Self { id, core }
    }

    /// The unique id this subscription is registered under.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes this subscription from its stream, if the stream still
    /// exists.
    pub fn cancel(&self) {
        if let Some(core) = self.core.upgrade() {
            core.remove_subscription(self.id);
        }
    }
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            core: self.core.clone(),
        }
    }
}

impl<T> PartialEq for Subscription<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Subscription<T> {}

impl<T> Hash for Subscription<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_monotonic() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert!(b > a);
    }

    #[test]
    fn handles_compare_by_id_only() {
        let id = SubscriptionId::next();
        let a = Subscription::<i32>::new(id, Weak::<StreamCore<i32>>::new());
        let b = a.clone();
        assert_eq!(a, b);
    }
}
