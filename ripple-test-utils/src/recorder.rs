// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::{Event, EventKind};
use ripple_stream::{Stream, Subscription};

/// Records every event a stream delivers, for later assertion.
///
/// Attaching subscribes a generic event handler (replaying any backlog),
/// so the recorder observes exactly what any other subscriber would.
pub struct EventRecorder<T> {
    events: Arc<Mutex<Vec<Event<T>>>>,
    subscription: Subscription<T>,
}

impl<T: Clone + Send + 'static> EventRecorder<T> {
    /// Subscribes a recorder to `stream`.
    pub fn attach(stream: &Stream<T>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = stream.subscribe(move |event| {
            sink.lock().push(event.clone());
        });
        Self {
            events,
            subscription,
        }
    }

    /// Every recorded event, in delivery order.
    pub fn events(&self) -> Vec<Event<T>> {
        self.events.lock().clone()
    }

    /// Only the recorded value payloads, in delivery order.
    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| event.value().cloned())
            .collect()
    }

    /// The recorded kind sequence.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(Event::kind).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// `true` when nothing has been delivered yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// The subscription this recorder is registered under.
    pub fn subscription(&self) -> &Subscription<T> {
        &self.subscription
    }
}
