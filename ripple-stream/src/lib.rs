// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push-based stream engine and combinators.
//!
//! A [`Stream`] is a typed, pull-free publish/subscribe primitive:
//! producers [`append`](Stream::append) events, the stream dispatches its
//! backlog synchronously to every current subscription. Operators wire a
//! source stream to a freshly allocated downstream via an internal
//! subscription, forming an eagerly evaluated pipeline graph; [`Wave`] is
//! a stream of streams with dynamic fan-in (`merge`) and fan-out
//! replacement (`switch_latest`).
//!
//! # Delivery model
//!
//! Dispatch runs in the producer's context. Each stream guards its state
//! with a mutex and snapshots the subscription set per dispatched event;
//! handlers run without the lock held, so they may freely call back into
//! the stream they were called from. Mutation of one stream from several
//! threads at once is not coordinated beyond that lock: keep each stream
//! on one execution queue and marshal cross-queue pipelines through
//! [`run_on`](Stream::run_on) and [`delay`](Stream::delay).
//!
//! # Example
//!
//! ```
//! use ripple_stream::Stream;
//! use ripple_test_utils::EventRecorder;
//!
//! let numbers = Stream::from_values([0, 1, 2, 3]);
//! let even = numbers.filter(|n| n % 2 == 0).map(|n| n * 10);
//!
//! let recorder = EventRecorder::attach(&even);
//! assert_eq!(recorder.values(), vec![0, 20]);
//! ```

mod combine_latest;
mod logging;
mod operators;
mod stream;
mod subscription;
mod wave;
mod zip;

pub use self::stream::{Stream, StreamState};
pub use self::subscription::{OwnerToken, SubscribeOptions, Subscription, SubscriptionId};
pub use self::wave::Wave;
