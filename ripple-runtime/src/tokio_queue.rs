// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use crate::queue::{QueueHandle, Task, TaskQueue};

/// Execution queue backed by a tokio runtime handle.
///
/// Tasks are spawned onto the runtime the handle belongs to; delayed tasks
/// sleep on the tokio timer first.
#[derive(Clone, Debug)]
pub struct TokioQueue {
    handle: tokio::runtime::Handle,
}

impl TokioQueue {
    /// Wraps an explicit runtime handle.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Binds to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, as
    /// `tokio::runtime::Handle::current` does.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl TaskQueue for TokioQueue {
    fn enqueue(&self, task: Task) {
        self.handle.spawn(async move {
            task();
        });
    }

    fn enqueue_after(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

/// Returns the process-wide primary queue.
///
/// Streams constructed without an explicit queue bind to this one. It is
/// lazily spun up on first use: a current-thread tokio runtime driven by a
/// dedicated background thread, so it exists whether or not the caller is
/// inside a runtime of its own.
///
/// # Panics
///
/// Panics if the primary runtime or its driver thread cannot be created;
/// no stream can operate without an execution queue, so this aborts rather
/// than continuing degraded.
pub fn primary() -> QueueHandle {
    static PRIMARY: OnceLock<QueueHandle> = OnceLock::new();
    PRIMARY.get_or_init(spawn_primary).clone()
}

fn spawn_primary() -> QueueHandle {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("primary queue runtime must initialize");
    let handle = runtime.handle().clone();

    thread::Builder::new()
        .name("ripple-primary".into())
        .spawn(move || {
            // Parks forever; spawned tasks and timers run on this thread
            runtime.block_on(future::pending::<()>());
        })
        .expect("primary queue thread must spawn");

    Arc::new(TokioQueue::new(handle))
}
