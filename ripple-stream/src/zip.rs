// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pairwise joining of two streams.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::Event;

use crate::combine_latest::drain_interleaved;
use crate::stream::Stream;
use crate::subscription::SubscribeOptions;

/// One FIFO buffer of unconsumed values per upstream.
struct ZipBuffer<T, V> {
    left: VecDeque<T>,
    right: VecDeque<V>,
}

fn take_pair<T, V>(buffer: &mut ZipBuffer<T, V>) -> Option<(T, V)> {
    if buffer.left.is_empty() || buffer.right.is_empty() {
        return None;
    }
    let left = buffer.left.pop_front()?;
    let right = buffer.right.pop_front()?;
    Some((left, right))
}

impl<T: Clone + Send + 'static> Stream<T> {
    /// Joins this stream with `other` pairwise, emitting tuples.
    ///
    /// See [`zip_with`](Self::zip_with).
    pub fn zip<V>(&self, other: &Stream<V>) -> Stream<(T, V)>
    where
        V: Clone + Send + 'static,
    {
        self.zip_with(other, |left, right| (left.clone(), right.clone()))
    }

    /// Joins this stream with `other` pairwise through `reduce`.
    ///
    /// Each upstream's values queue in a FIFO buffer; whenever both
    /// buffers are non-empty, one value is popped from each head and
    /// `reduce(left, right)` is emitted. Excess values on the faster side
    /// stay buffered until a counterpart arrives. `Error`/`Completed` from
    /// either side is forwarded immediately, ahead of any still-buffered
    /// pairs, and terminates the downstream.
    pub fn zip_with<V, W, F>(&self, other: &Stream<V>, reduce: F) -> Stream<W>
    where
        V: Clone + Send + 'static,
        W: Send + 'static,
        F: Fn(&T, &V) -> W + Send + Sync + 'static,
    {
        let downstream = Stream::with_queue(self.queue());
        let buffer = Arc::new(Mutex::new(ZipBuffer::<T, V> {
            left: VecDeque::new(),
            right: VecDeque::new(),
        }));
        let reduce = Arc::new(reduce);

        {
            let buffer = Arc::clone(&buffer);
            let reduce = Arc::clone(&reduce);
            let target = downstream.clone();
            let options = SubscribeOptions::deferred().with_owner(downstream.owner_token());
            let _ = self.subscribe_with(options, move |event| match event {
                Event::Value(value) => {
                    let pair = {
                        let mut buffer = buffer.lock();
                        buffer.left.push_back(value.clone());
                        take_pair(&mut buffer)
                    };
                    if let Some((left, right)) = pair {
                        target.append(Event::Value(reduce(&left, &right)));
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
                    let pair = {
                        let mut buffer = buffer.lock();
                        buffer.right.push_back(value.clone());
                        take_pair(&mut buffer)
                    };
                    if let Some((left, right)) = pair {
                        target.append(Event::Value(reduce(&left, &right)));
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
