// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stateless operators.
//!
//! Each operator allocates a fresh downstream stream bound to the source's
//! queue, registers exactly one subscription on the source (owned by the
//! downstream) that re-encodes each received event onto the downstream, and
//! returns the downstream.

use std::time::Duration;

use ripple_core::{Event, Result};
use ripple_runtime::{QueueHandle, TaskQueue};

use crate::stream::Stream;
use crate::subscription::SubscribeOptions;

impl<T: Send + 'static> Stream<T> {
    /// Wires `reaction` between this stream and `downstream`, returning
    /// the downstream. The subscription replays the source backlog and is
    /// owned by the downstream, so an operator chain can be detached from
    /// its source via `unsubscribe_owner`.
    fn propagate<V, F>(&self, downstream: Stream<V>, reaction: F) -> Stream<V>
    where
        V: Send + 'static,
        F: Fn(&Event<T>, &Stream<V>) + Send + Sync + 'static,
    {
        let target = downstream.clone();
        let options = SubscribeOptions::owned_by(downstream.owner_token());
        let _ = self.subscribe_with(options, move |event| reaction(event, &target));
        downstream
    }

    /// Forwards events onto `downstream`, mapping value payloads through
    /// `transform`; a failed transform drops the event.
    fn forward<V, F>(&self, downstream: Stream<V>, transform: F) -> Stream<V>
    where
        V: Send + 'static,
        F: Fn(&T) -> Result<V> + Send + Sync + 'static,
    {
        self.propagate(downstream, move |event, stream| match event {
            Event::Value(value) => {
                if let Ok(mapped) = transform(value) {
                    stream.append(Event::Value(mapped));
                }
            }
            Event::Error(error) => stream.append(Event::Error(error.clone())),
            Event::Completed => stream.append(Event::Completed),
        })
    }

    /// Transforms each value; errors and completion are forwarded
    /// unchanged.
    pub fn map<V, F>(&self, transform: F) -> Stream<V>
    where
        V: Send + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.try_map(move |value| Ok(transform(value)))
    }

    /// Transforms each value with a fallible transform.
    ///
    /// A value whose transform fails is dropped silently; the failure is
    /// not forwarded as an error event. Errors and completion from the
    /// source are forwarded unchanged.
    pub fn try_map<V, F>(&self, transform: F) -> Stream<V>
    where
        V: Send + 'static,
        F: Fn(&T) -> Result<V> + Send + Sync + 'static,
    {
        self.forward(Stream::with_queue(self.queue()), transform)
    }

    /// Maps each value to an inner stream.
    ///
    /// The downstream's element type is itself a stream; nothing is
    /// flattened automatically. Feed the result to a [`Wave`] to merge or
    /// switch between the produced inner streams.
    ///
    /// [`Wave`]: crate::Wave
    pub fn flat_map<V, F>(&self, transform: F) -> Stream<Stream<V>>
    where
        V: Send + 'static,
        F: Fn(&T) -> Stream<V> + Send + Sync + 'static,
    {
        self.try_flat_map(move |value| Ok(transform(value)))
    }

    /// Maps each value to an inner stream with a fallible transform; a
    /// value whose transform fails is dropped silently.
    pub fn try_flat_map<V, F>(&self, transform: F) -> Stream<Stream<V>>
    where
        V: Send + 'static,
        F: Fn(&T) -> Result<Stream<V>> + Send + Sync + 'static,
    {
        self.forward(Stream::with_queue(self.queue()), transform)
    }
}

impl<T: Clone + Send + 'static> Stream<T> {
    /// Forwards only the values matching `predicate`; errors and
    /// completion always pass through.
    pub fn filter<F>(&self, predicate: F) -> Stream<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_filter(move |value| Ok(predicate(value)))
    }

    /// Filters with a fallible predicate; a predicate failure is treated
    /// as `false`.
    pub fn try_filter<F>(&self, predicate: F) -> Stream<T>
    where
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        self.propagate(
            Stream::with_queue(self.queue()),
            move |event, stream| match event {
                Event::Value(value) => {
                    if predicate(value).unwrap_or(false) {
                        stream.append(event.clone());
                    }
                }
                _ => stream.append(event.clone()),
            },
        )
    }

    /// Defers values and completion by `duration` on the stream's bound
    /// queue; errors are forwarded immediately.
    pub fn delay(&self, duration: Duration) -> Stream<T> {
        self.propagate(
            Stream::with_queue(self.queue()),
            move |event, stream| match event {
                Event::Error(_) => stream.append(event.clone()),
                _ => {
                    let target = stream.clone();
                    let event = event.clone();
                    stream
                        .queue()
                        .enqueue_after(duration, Box::new(move || target.append(event)));
                }
            },
        )
    }

    /// Forwards every event unchanged onto a downstream bound to `queue`,
    /// so operators chained after it schedule in that context.
    pub fn run_on(&self, queue: QueueHandle) -> Stream<T> {
        self.propagate(Stream::with_queue(queue), |event, stream| {
            stream.append(event.clone())
        })
    }

    /// Prepends `initial` ahead of the pending backlog, dispatches, and
    /// returns an identity-forwarding downstream.
    pub fn start_with<I>(&self, initial: I) -> Stream<T>
    where
        I: IntoIterator<Item = T>,
    {
        self.prepend(Event::values(initial));
        self.send(usize::MAX);
        self.propagate(Stream::with_queue(self.queue()), |event, stream| {
            stream.append(event.clone())
        })
    }
}
