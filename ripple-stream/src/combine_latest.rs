// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pairing of two streams by their latest values.

use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::Event;

use crate::stream::Stream;
use crate::subscription::SubscribeOptions;

/// One cached "latest value" slot per upstream; a slot stays absent until
/// its upstream has produced a first value.
struct PairCache<T, V> {
    left: Option<T>,
    right: Option<V>,
}

/// Consumes one pending event from each side per round until neither side
/// has deliverable backlog.
///
/// This is the deterministic single-step interleaving the pairing
/// combinators apply to values already backlogged at subscription time;
/// draining one side completely before the other would pair stale values.
pub(crate) fn drain_interleaved<A, B>(left: &Stream<A>, right: &Stream<B>)
where
    A: Send + 'static,
    B: Send + 'static,
{
    loop {
        let left_ready = left.state().is_active() && left.pending_len() > 0;
        let right_ready = right.state().is_active() && right.pending_len() > 0;
        if !left_ready && !right_ready {
            break;
        }
        if left_ready {
            left.send(1);
        }
        if right_ready {
            right.send(1);
        }
    }
}

impl<T: Clone + Send + 'static> Stream<T> {
    /// Pairs this stream with `other`, emitting a tuple of the latest
    /// values.
    ///
    /// See [`combine_latest_with`](Self::combine_latest_with).
    pub fn combine_latest<V>(&self, other: &Stream<V>) -> Stream<(T, V)>
    where
        V: Clone + Send + 'static,
    {
        self.combine_latest_with(other, |left, right| (left.clone(), right.clone()))
    }

    /// Pairs this stream with `other` through `reduce`.
    ///
    /// On each value from either upstream, that side's cached slot is
    /// updated; once both slots are present, every update emits
    /// `reduce(latest_left, latest_right)` downstream. The first
    /// `Error`/`Completed` from either side is forwarded and terminates
    /// the combination; exactly one terminal event reaches the downstream
    /// even if both upstreams terminate.
    ///
    /// Values already backlogged on either upstream are consumed in a
    /// single-step interleaving, one event from each side per round.
    pub fn combine_latest_with<V, W, F>(&self, other: &Stream<V>, reduce: F) -> Stream<W>
    where
        V: Clone + Send + 'static,
        W: Send + 'static,
        F: Fn(&T, &V) -> W + Send + Sync + 'static,
    {
        let downstream = Stream::with_queue(self.queue());
        let cache = Arc::new(Mutex::new(PairCache::<T, V> {
            left: None,
            right: None,
        }));
        let reduce = Arc::new(reduce);

        {
            let cache = Arc::clone(&cache);
            let reduce = Arc::clone(&reduce);
            let target = downstream.clone();
            let options = SubscribeOptions::deferred().with_owner(downstream.owner_token());
            let _ = self.subscribe_with(options, move |event| match event {
                Event::Value(value) => {
                    // Update the cache under its lock; reduce and append
                    // outside it
                    let latest = {
                        let mut cache = cache.lock();
                        cache.left = Some(value.clone());
                        cache.right.clone()
                    };
                    if let Some(right) = latest {
                        target.append(Event::Value(reduce(value, &right)));
                    }
                }
                Event::Error(error) => target.append(Event::Error(error.clone())),
                Event::Completed => target.append(Event::Completed),
            });
        }

        {
            let target = downstream.clone();
            let options = SubscribeOptions::deferred().with_owner(downstream.owner_token());
            let _ = other.subscribe_with(options, move |event| match event {
                Event::Value(value) => {
                    let latest = {
                        let mut cache = cache.lock();
                        cache.right = Some(value.clone());
                        cache.left.clone()
                    };
                    if let Some(left) = latest {
                        target.append(Event::Value(reduce(&left, value)));
                    }
                }
                Event::Error(error) => target.append(Event::Error(error.clone())),
                Event::Completed => target.append(Event::Completed),
            });
        }

        drain_interleaved(self, other);

        downstream
    }
}
