// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Duration;

/// A unit of work handed off to an execution queue.
pub type Task = Box<dyn FnOnce() + Send>;

/// An execution queue that can run tasks now or after a delay.
///
/// Implementations must run tasks submitted to the same queue one at a
/// time; streams rely on this for their single-writer discipline when a
/// pipeline is marshalled across queues.
pub trait TaskQueue: Send + Sync {
    /// Runs `task` on this queue as soon as possible.
    fn enqueue(&self, task: Task);

    /// Runs `task` on this queue once `delay` has elapsed.
    fn enqueue_after(&self, delay: Duration, task: Task);
}

/// Shared handle to an execution queue.
pub type QueueHandle = Arc<dyn TaskQueue>;
