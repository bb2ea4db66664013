// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution queues for the ripple reactive stream engine.
//!
//! Every stream is bound to exactly one execution queue at construction.
//! Dispatch itself runs synchronously in the producer's context; the queue
//! is the seam through which the `delay` operator defers re-appends and
//! through which `run_on` rebinds a pipeline to another context.
//!
//! The engine only sees the [`TaskQueue`] trait. The tokio binding
//! ([`TokioQueue`]) and the process-wide default queue ([`primary`]) live
//! here so the core never depends on a concrete runtime.

pub mod queue;
pub mod tokio_queue;

pub use self::queue::{QueueHandle, Task, TaskQueue};
pub use self::tokio_queue::{primary, TokioQueue};
