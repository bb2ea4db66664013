// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Streams of streams: dynamic fan-in and fan-out replacement.

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::Event;
use ripple_runtime::QueueHandle;

use crate::logging::debug;
use crate::stream::Stream;
use crate::subscription::{SubscribeOptions, Subscription};

type LiveUpstreams<T> = Arc<Mutex<Vec<(Stream<T>, Subscription<T>)>>>;

/// A stream whose element type is itself a stream.
///
/// `Wave` adds dynamic subscription management on top of
/// `Stream<Stream<T>>`: [`merge`](Wave::merge) fans in every inner stream
/// it is handed, [`switch_latest`](Wave::switch_latest) keeps exactly one
/// inner stream live and replaces it on each new value. Every inner
/// subscription is tracked together with the stream it was registered on,
/// and torn down when the wave is dropped.
///
/// `Wave` derefs to its underlying `Stream<Stream<T>>`, so inner streams
/// are supplied with `append_value` like any other payload.
pub struct Wave<T> {
    stream: Stream<Stream<T>>,
    live_upstreams: LiveUpstreams<T>,
}

impl<T: Clone + Send + 'static> Wave<T> {
    /// Creates an empty wave bound to the primary queue.
    pub fn new() -> Self {
        Self::from_stream(Stream::new())
    }

    /// Creates an empty wave bound to `queue`.
    pub fn with_queue(queue: QueueHandle) -> Self {
        Self::from_stream(Stream::with_queue(queue))
    }

    /// Creates a wave seeded with inner streams, each wrapped as a `Value`
    /// event.
    pub fn from_streams<I>(streams: I) -> Self
    where
        I: IntoIterator<Item = Stream<T>>,
    {
        Self::from_stream(Stream::from_values(streams))
    }

    /// Creates a wave seeded with raw events.
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event<Stream<T>>>,
    {
        Self::from_stream(Stream::from_events(events))
    }

    /// Wraps an existing stream of streams, such as the result of
    /// [`flat_map`](Stream::flat_map).
    pub fn from_stream(stream: Stream<Stream<T>>) -> Self {
        Self {
            stream,
            live_upstreams: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fans every supplied inner stream into one downstream.
    ///
    /// Each `Value(inner)` received by the wave subscribes to `inner` and
    /// forwards its values and errors to the downstream, concurrently with
    /// all previously adopted inner streams. An inner stream completing
    /// does not complete the merged downstream; only the wave's own
    /// `Error`/`Completed` terminate it.
    pub fn merge(&self) -> Stream<T> {
        let downstream = Stream::with_queue(self.stream.queue());
        let live = Arc::clone(&self.live_upstreams);
        let target = downstream.clone();
        let options = SubscribeOptions::owned_by(downstream.owner_token());
        let _ = self.stream.subscribe_with(options, move |event| match event {
            Event::Value(inner) => redirect(&live, inner, &target, false),
            Event::Error(error) => target.append(Event::Error(error.clone())),
            Event::Completed => target.append(Event::Completed),
        });
        downstream
    }

    /// Forwards only the most recently supplied inner stream.
    ///
    /// Each `Value(inner)` received by the wave unsubscribes from every
    /// previously tracked inner stream (at most one is ever tracked),
    /// then adopts `inner`, so later events from a superseded stream never
    /// reach the downstream. The wave's own `Error`/`Completed` are
    /// forwarded and terminate the downstream.
    pub fn switch_latest(&self) -> Stream<T> {
        let downstream = Stream::with_queue(self.stream.queue());
        let live = Arc::clone(&self.live_upstreams);
        let target = downstream.clone();
        let options = SubscribeOptions::owned_by(downstream.owner_token());
        let _ = self.stream.subscribe_with(options, move |event| match event {
            Event::Value(inner) => {
                unsubscribe_all(&live);
                redirect(&live, inner, &target, true);
            }
            Event::Error(error) => target.append(Event::Error(error.clone())),
            Event::Completed => target.append(Event::Completed),
        });
        downstream
    }
}

/// Subscribes to `upstream`, forwarding its events onto `downstream`, and
/// tracks the pair for later teardown.
///
/// The subscription is registered deferred and the backlog replayed only
/// after the pair is tracked, so a re-entrant switch during the replay
/// still sees this upstream as cancellable.
fn redirect<T: Clone + Send + 'static>(
    live: &LiveUpstreams<T>,
    upstream: &Stream<T>,
    downstream: &Stream<T>,
    forward_completed: bool,
) {
    debug!("wave adopting upstream {:?}", upstream);
    let forward = downstream.clone();
    let subscription = upstream.subscribe_with(
        SubscribeOptions::deferred().with_owner(downstream.owner_token()),
        move |event| {
            if event.is_completed() && !forward_completed {
                return;
            }
            forward.append(event.clone());
        },
    );
    live.lock().push((upstream.clone(), subscription));
    upstream.send(usize::MAX);
}

fn unsubscribe_all<T>(live: &LiveUpstreams<T>) {
    let drained: Vec<_> = live.lock().drain(..).collect();
    for (_upstream, subscription) in drained {
        subscription.cancel();
    }
}

impl<T: Clone + Send + 'static> Default for Wave<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Wave<T> {
    type Target = Stream<Stream<T>>;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}

impl<T> Drop for Wave<T> {
    // A wave is the one place that registers subscriptions on third-party
    // streams, so dropping it tears every tracked one down
    fn drop(&mut self) {
        unsubscribe_all(&self.live_upstreams);
    }
}
