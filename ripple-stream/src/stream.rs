// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The push-based stream engine.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::{Event, RippleError};
use ripple_runtime::{primary, QueueHandle};

use crate::logging::{debug, trace};
use crate::subscription::{
    Action, OwnerToken, SubscribeOptions, Subscription, SubscriptionEntry, SubscriptionId,
};

/// Delivery state of a stream.
///
/// `Active` and `Paused` convert into each other through `pause`/`resume`;
/// `Failed` and `Completed` are terminal, and no operation ever leaves them.
#[derive(Debug, Clone)]
pub enum StreamState {
    /// Dispatching events to subscribers.
    Active,
    /// Retaining appended events for delivery on resume.
    Paused,
    /// An error event was dispatched; nothing further is delivered.
    Failed(RippleError),
    /// The completion marker was dispatched; nothing further is delivered.
    Completed,
}

impl StreamState {
    /// Returns `true` while the stream dispatches events.
    pub const fn is_active(&self) -> bool {
        matches!(self, StreamState::Active)
    }

    /// Returns `true` while delivery is suspended by `pause`.
    pub const fn is_paused(&self) -> bool {
        matches!(self, StreamState::Paused)
    }

    /// Returns `true` once an error event has been dispatched.
    pub const fn is_failed(&self) -> bool {
        matches!(self, StreamState::Failed(_))
    }

    /// Returns `true` once the completion marker has been dispatched.
    pub const fn is_completed(&self) -> bool {
        matches!(self, StreamState::Completed)
    }

    /// Returns `true` in either terminal state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, StreamState::Failed(_) | StreamState::Completed)
    }

    fn fail(&mut self, error: RippleError) {
        if !self.is_terminal() {
            *self = StreamState::Failed(error);
        }
    }

    fn complete(&mut self) {
        if !self.is_terminal() {
            *self = StreamState::Completed;
        }
    }
}

struct Inner<T> {
    backlog: VecDeque<Event<T>>,
    subscriptions: Vec<SubscriptionEntry<T>>,
    state: StreamState,
    dispatching: bool,
}

pub(crate) struct StreamCore<T> {
    inner: Mutex<Inner<T>>,
    queue: QueueHandle,
}

impl<T> StreamCore<T> {
    fn new(queue: QueueHandle, backlog: VecDeque<Event<T>>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                backlog,
                subscriptions: Vec::new(),
                state: StreamState::Active,
                dispatching: false,
            }),
            queue,
        }
    }

    /// Dispatches up to `max_count` backlogged events to every current
    /// subscription.
    ///
    /// One event is popped at a time and the subscription set snapshotted
    /// with it, so handlers run without the state lock held. A handler may
    /// re-enter this stream: appends land in the shared backlog and are
    /// picked up by the pass already running (a re-entrant `send` returns
    /// immediately), so each event is delivered exactly once and in
    /// backlog order even under re-entrancy.
    fn send(&self, max_count: usize) {
        let mut sent = 0;
        loop {
            let (event, snapshot) = {
                let mut inner = self.inner.lock();
                if inner.dispatching {
                    // Re-entrant send; the active pass drains the backlog
                    return;
                }
                if sent >= max_count
                    || !inner.state.is_active()
                    || inner.subscriptions.is_empty()
                {
                    return;
                }
                match inner.backlog.pop_front() {
                    Some(event) => {
                        inner.dispatching = true;
                        (event, inner.subscriptions.clone())
                    }
                    None => return,
                }
            };
            for entry in &snapshot {
                entry.dispatch(&event);
            }
            sent += 1;
            let mut inner = self.inner.lock();
            inner.dispatching = false;
            match event {
                Event::Error(error) => {
                    debug!("stream failed: {error}");
                    inner.state.fail(error);
                    return;
                }
                Event::Completed => {
                    debug!("stream completed");
                    inner.state.complete();
                    return;
                }
                Event::Value(_) => {}
            }
        }
    }

    pub(crate) fn remove_subscription(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock();
        inner.subscriptions.retain(|entry| entry.id != id);
    }
}

/// A typed, push-based event stream.
///
/// A stream holds a FIFO backlog of pending events, a set of
/// subscriptions, a delivery state and a bound execution queue. Producers
/// `append` events; the stream dispatches the backlog synchronously to
/// every current subscriber. Combinators subscribe internally and re-append
/// transformed events onto a fresh downstream stream, forming an eagerly
/// evaluated pipeline graph.
///
/// `Stream` is a cheap handle; clones share the same engine.
///
/// # Examples
///
/// ```
/// use parking_lot::Mutex;
/// use ripple_stream::Stream;
/// use std::sync::Arc;
///
/// let received = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&received);
///
/// let stream = Stream::from_values([1, 2, 3]);
/// let _sub = stream.map(|v| v * 2).subscribe(move |event| {
///     if let Some(v) = event.value() {
///         sink.lock().push(*v);
///     }
/// });
///
/// assert_eq!(*received.lock(), vec![2, 4, 6]);
/// ```
pub struct Stream<T> {
    core: Arc<StreamCore<T>>,
}

impl<T: Send + 'static> Stream<T> {
    /// Creates an empty stream bound to the primary queue.
    pub fn new() -> Self {
        Self::with_queue(primary())
    }

    /// Creates an empty stream bound to `queue`.
    pub fn with_queue(queue: QueueHandle) -> Self {
        Self {
            core: Arc::new(StreamCore::new(queue, VecDeque::new())),
        }
    }

    /// Creates a stream seeded with `values`, each wrapped as a `Value`
    /// event.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_events(values.into_iter().map(Event::Value))
    }

    /// Creates a stream seeded with raw `events`, which may include
    /// `Error`/`Completed`.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event<T>>,
    {
        Self {
            core: Arc::new(StreamCore::new(primary(), events.into_iter().collect())),
        }
    }

    /// Appends `event` to the backlog and dispatches the pending backlog.
    ///
    /// When the stream is not `Active` the event is retained, not
    /// discarded: a paused stream delivers it on resume, while a failed or
    /// completed stream keeps it forever undelivered. Appending after a
    /// terminal state is deliberately inert rather than an error.
    pub fn append(&self, event: Event<T>) {
        self.core.inner.lock().backlog.push_back(event);
        self.send(usize::MAX);
    }

    /// Appends every event of a sequence, then dispatches once.
    ///
    /// Equivalent to repeated [`append`](Self::append) but atomic with
    /// respect to a single dispatch pass.
    pub fn append_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event<T>>,
    {
        self.core.inner.lock().backlog.extend(events);
        self.send(usize::MAX);
    }

    /// Appends a single value event.
    pub fn append_value(&self, value: T) {
        self.append(Event::Value(value));
    }

    /// Inserts events at the backlog head, ahead of everything pending.
    pub(crate) fn prepend(&self, events: Vec<Event<T>>) {
        let mut inner = self.core.inner.lock();
        for event in events.into_iter().rev() {
            inner.backlog.push_front(event);
        }
    }

    /// Dispatches up to `max_count` backlogged events; `usize::MAX` drains
    /// the whole backlog.
    ///
    /// Requires the stream to be `Active` and to have at least one
    /// subscription; dispatching an `Error`/`Completed` event transitions
    /// the state and stops the pass early.
    pub fn send(&self, max_count: usize) {
        self.core.send(max_count);
    }

    /// Subscribes a generic event handler, replaying any backlogged
    /// events.
    pub fn subscribe<F>(&self, handler: F) -> Subscription<T>
    where
        F: Fn(&Event<T>) + Send + Sync + 'static,
    {
        self.subscribe_with(SubscribeOptions::default(), handler)
    }

    /// Subscribes a generic event handler with explicit options.
    pub fn subscribe_with<F>(&self, options: SubscribeOptions, handler: F) -> Subscription<T>
    where
        F: Fn(&Event<T>) + Send + Sync + 'static,
    {
        self.register(options, Action::Event(Arc::new(handler)))
    }

    /// Subscribes a value/error/completion handler triple, replaying any
    /// backlogged events.
    pub fn subscribe_split<V, E, C>(
        &self,
        on_value: V,
        on_error: E,
        on_completed: C,
    ) -> Subscription<T>
    where
        V: Fn(&T) + Send + Sync + 'static,
        E: Fn(&RippleError) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        self.subscribe_split_with(SubscribeOptions::default(), on_value, on_error, on_completed)
    }

    /// Subscribes a value/error/completion handler triple with explicit
    /// options.
    pub fn subscribe_split_with<V, E, C>(
        &self,
        options: SubscribeOptions,
        on_value: V,
        on_error: E,
        on_completed: C,
    ) -> Subscription<T>
    where
        V: Fn(&T) + Send + Sync + 'static,
        E: Fn(&RippleError) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        self.register(
            options,
            Action::Split {
                on_value: Arc::new(on_value),
                on_error: Arc::new(on_error),
                on_completed: Arc::new(on_completed),
            },
        )
    }

    fn register(&self, options: SubscribeOptions, action: Action<T>) -> Subscription<T> {
        let id = SubscriptionId::next();
        let entry = SubscriptionEntry {
            id,
            owner: options.owner.as_ref().map(Arc::downgrade),
            action,
        };
        self.core.inner.lock().subscriptions.push(entry);
        trace!("subscription {} registered", id);
        self.send(if options.send_now { usize::MAX } else { 0 });
        Subscription::new(id, Arc::downgrade(&self.core))
    }

    /// Removes a subscription by handle.
    pub fn unsubscribe(&self, subscription: &Subscription<T>) {
        trace!("subscription {} removed", subscription.id());
        self.core.remove_subscription(subscription.id());
    }

    /// Removes every subscription whose owner token matches `owner` or has
    /// decayed. Subscriptions registered without an owner are untouched.
    pub fn unsubscribe_owner(&self, owner: &OwnerToken) {
        let mut inner = self.core.inner.lock();
        inner.subscriptions.retain(|entry| !entry.owned_by(owner));
    }

    /// Suspends delivery; a no-op unless the stream is `Active`.
    pub fn pause(&self) {
        let mut inner = self.core.inner.lock();
        if inner.state.is_active() {
            trace!("stream paused");
            inner.state = StreamState::Paused;
        }
    }

    /// Resumes delivery and dispatches the retained backlog; a no-op
    /// unless the stream is `Paused`.
    pub fn resume(&self) {
        {
            let mut inner = self.core.inner.lock();
            if !inner.state.is_paused() {
                return;
            }
            trace!("stream resumed");
            inner.state = StreamState::Active;
        }
        self.send(usize::MAX);
    }

    /// The current delivery state.
    pub fn state(&self) -> StreamState {
        self.core.inner.lock().state.clone()
    }

    /// Number of backlogged events not yet dispatched.
    pub fn pending_len(&self) -> usize {
        self.core.inner.lock().backlog.len()
    }

    /// Number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.core.inner.lock().subscriptions.len()
    }

    /// The execution queue this stream is bound to.
    pub fn queue(&self) -> QueueHandle {
        Arc::clone(&self.core.queue)
    }

    /// This stream's identity as an owner token, for registering
    /// subscriptions on other streams on its behalf.
    pub fn owner_token(&self) -> OwnerToken {
        let token: Arc<StreamCore<T>> = Arc::clone(&self.core);
        token
    }
}

impl<T: Clone + Send + 'static> Stream<T> {
    /// Creates a stream carrying another stream's pending backlog and
    /// subscriptions, rebound to `queue`.
    pub fn from_stream(other: &Stream<T>, queue: QueueHandle) -> Self {
        let inner = other.core.inner.lock();
        let core = StreamCore {
            // The copy starts Active regardless of the source's state
            inner: Mutex::new(Inner {
                backlog: inner.backlog.clone(),
                subscriptions: inner.subscriptions.clone(),
                state: StreamState::Active,
                dispatching: false,
            }),
            queue,
        };
        Self {
            core: Arc::new(core),
        }
    }
}

impl<T: Send + 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.core.inner.lock();
        f.debug_struct("Stream")
            .field("state", &inner.state)
            .field("pending", &inner.backlog.len())
            .field("subscriptions", &inner.subscriptions.len())
            .finish()
    }
}
