// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Ripple
//!
//! A push-based reactive event-stream engine.
//!
//! ## Overview
//!
//! Ripple provides a typed, pull-free publish/subscribe primitive
//! ([`Stream`]) with buffering and pause/resume, an algebra of combinators
//! (map, filter, flat_map, combine_latest, zip, delay, run_on), and a
//! higher-order variant ([`Wave`], a stream of streams) supporting dynamic
//! fan-in (`merge`) and fan-out replacement (`switch_latest`).
//!
//! Producers `append` events; dispatch is synchronous and eager, with
//! explicit scheduler hops only through `delay` and `run_on`. Execution
//! queues are injected through `ripple-runtime`; the default binding runs
//! on tokio.
//!
//! ## Quick start
//!
//! ```
//! use ripple_rx::Stream;
//! use ripple_test_utils::EventRecorder;
//!
//! let first = Stream::from_values([0, 2]);
//! let second = Stream::from_values([1, 3]);
//!
//! let pairs = first.combine_latest(&second);
//! let recorder = EventRecorder::attach(&pairs);
//!
//! second.append_value(5);
//!
//! assert_eq!(recorder.values(), vec![(0, 1), (2, 1), (2, 3), (2, 5)]);
//! ```

// Re-export the event model
pub use ripple_core::{Event, EventKind, Result, RippleError};

// Re-export the engine and combinators
pub use ripple_stream::{
    OwnerToken, Stream, StreamState, SubscribeOptions, Subscription, SubscriptionId, Wave,
};

// Re-export the execution queue seam
pub use ripple_runtime::{primary, QueueHandle, Task, TaskQueue, TokioQueue};

/// Prelude module for convenient imports
pub mod prelude {
    pub use ripple_core::{Event, EventKind, RippleError};
    pub use ripple_runtime::{QueueHandle, TaskQueue};
    pub use ripple_stream::{Stream, StreamState, SubscribeOptions, Subscription, Wave};
}
