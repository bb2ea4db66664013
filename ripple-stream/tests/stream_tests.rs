// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use parking_lot::Mutex;
use ripple_core::Event;
use ripple_stream::{OwnerToken, Stream, SubscribeOptions};
use ripple_test_utils::{events_equal, injected_error, EventRecorder};

#[test]
fn subscriber_with_send_now_receives_seeded_values_once_in_order() {
    // Arrange
    let stream = Stream::from_values([0, 2, 4]);

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert
    assert_eq!(recorder.values(), vec![0, 2, 4]);
    assert_eq!(stream.pending_len(), 0);
}

#[test]
fn empty_stream_delivers_nothing() {
    // Arrange
    let stream = Stream::<i32>::new();

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert
    assert!(recorder.is_empty());
    assert!(stream.state().is_active());
}

#[test]
fn seeded_completion_is_delivered_and_terminal() {
    // Arrange
    let stream = Stream::<i32>::from_events([Event::Completed]);

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert
    assert!(events_equal(
        &recorder.events(),
        &[Event::Completed],
        |a, b| a == b
    ));
    assert!(stream.state().is_completed());
}

#[test]
fn deferred_subscription_skips_immediate_replay() {
    // Arrange
    let stream = Stream::from_values([1, 2]);
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    // Act
    let _sub = stream.subscribe_with(SubscribeOptions::deferred(), move |event| {
        if let Some(v) = event.value() {
            sink.lock().push(*v);
        }
    });

    // Assert - nothing replayed at subscription time
    assert!(received.lock().is_empty());
    assert_eq!(stream.pending_len(), 2);

    // Act - the next append dispatches the retained backlog too
    stream.append_value(3);

    // Assert
    assert_eq!(*received.lock(), vec![1, 2, 3]);
}

#[test]
fn deferred_subscriber_on_drained_stream_sees_only_future_appends() {
    // Arrange
    let stream = Stream::from_values([1, 2]);
    let first = EventRecorder::attach(&stream);
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    // Act
    let _sub = stream.subscribe_with(SubscribeOptions::deferred(), move |event| {
        if let Some(v) = event.value() {
            sink.lock().push(*v);
        }
    });
    stream.append_value(3);

    // Assert
    assert_eq!(first.values(), vec![1, 2, 3]);
    assert_eq!(*received.lock(), vec![3]);
}

#[test]
fn pause_retains_and_resume_redelivers_in_order() {
    // Arrange
    let stream = Stream::new();
    let recorder = EventRecorder::attach(&stream);
    stream.append_value(1);

    // Act
    stream.pause();
    stream.append_value(2);
    stream.append_value(3);

    // Assert - paused interval retained, not delivered
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(stream.pending_len(), 2);
    assert!(stream.state().is_paused());

    // Act
    stream.resume();

    // Assert - no loss, no duplication
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(stream.pending_len(), 0);
    assert!(stream.state().is_active());
}

#[test]
fn pause_and_resume_are_idempotent() {
    // Arrange
    let stream = Stream::new();
    let recorder = EventRecorder::attach(&stream);
    stream.append_value(1);

    // Act - resume while active changes nothing observable
    stream.resume();
    assert!(stream.state().is_active());
    assert_eq!(recorder.values(), vec![1]);

    // Act - pause twice stays paused
    stream.pause();
    stream.pause();
    assert!(stream.state().is_paused());

    stream.resume();
    assert!(stream.state().is_active());
}

#[test]
fn pause_is_a_no_op_after_terminal_state() {
    // Arrange
    let stream = Stream::<i32>::new();
    let _recorder = EventRecorder::attach(&stream);
    stream.append(Event::Error(injected_error()));
    assert!(stream.state().is_failed());

    // Act
    stream.pause();
    stream.resume();

    // Assert - terminal states are monotonic
    assert!(stream.state().is_failed());
}

#[test]
fn error_event_fails_stream_and_stops_the_pass() {
    // Arrange
    let stream = Stream::from_events([
        Event::Value(1),
        Event::Error(injected_error()),
        Event::Value(2),
    ]);

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert - dispatch stopped at the error; the trailing value is retained
    assert!(events_equal(
        &recorder.events(),
        &[Event::Value(1), Event::Error(injected_error())],
        |a, b| a == b
    ));
    assert!(stream.state().is_failed());
    assert_eq!(stream.pending_len(), 1);
}

#[test]
fn completed_event_completes_stream_and_stops_the_pass() {
    // Arrange
    let stream = Stream::from_events([Event::Value(1), Event::Completed, Event::Value(2)]);

    // Act
    let recorder = EventRecorder::attach(&stream);

    // Assert
    assert!(events_equal(
        &recorder.events(),
        &[Event::Value(1), Event::Completed],
        |a, b| a == b
    ));
    assert!(stream.state().is_completed());
    assert_eq!(stream.pending_len(), 1);
}

#[test]
fn appends_after_terminal_state_are_retained_not_delivered() {
    // Arrange
    let stream = Stream::<i32>::from_events([Event::Completed]);
    let recorder = EventRecorder::attach(&stream);
    assert!(stream.state().is_completed());

    // Act
    stream.append_value(9);
    stream.append_value(10);

    // Assert - silently inert, not an error
    assert_eq!(recorder.len(), 1);
    assert_eq!(stream.pending_len(), 2);
    assert!(stream.state().is_completed());
}

#[test]
fn append_all_dispatches_the_whole_sequence_in_order() {
    // Arrange
    let stream = Stream::new();
    let recorder = EventRecorder::attach(&stream);

    // Act
    stream.append_all(Event::values([1, 2, 3]));

    // Assert
    assert_eq!(recorder.values(), vec![1, 2, 3]);
}

#[test]
fn all_subscribers_observe_a_pass_in_the_same_order() {
    // Arrange
    let stream = Stream::new();
    let first = EventRecorder::attach(&stream);
    let second = EventRecorder::attach(&stream);

    // Act
    stream.append_all(Event::values([5, 6, 7]));

    // Assert - each subscriber got each event exactly once, in backlog order
    assert_eq!(first.values(), vec![5, 6, 7]);
    assert_eq!(second.values(), vec![5, 6, 7]);
}

#[test]
fn unsubscribe_by_handle_stops_future_delivery() {
    // Arrange
    let stream = Stream::new();
    let removed = EventRecorder::attach(&stream);
    let kept = EventRecorder::attach(&stream);
    stream.append_value(1);

    // Act
    stream.unsubscribe(removed.subscription());
    stream.append_value(2);

    // Assert
    assert_eq!(removed.values(), vec![1]);
    assert_eq!(kept.values(), vec![1, 2]);
    assert_eq!(stream.subscription_count(), 1);
}

#[test]
fn cancel_through_the_handle_is_equivalent() {
    // Arrange
    let stream = Stream::new();
    let recorder = EventRecorder::attach(&stream);
    let kept = EventRecorder::attach(&stream);

    // Act
    recorder.subscription().cancel();
    stream.append_value(1);

    // Assert
    assert!(recorder.is_empty());
    assert_eq!(kept.values(), vec![1]);
}

#[test]
fn cancel_after_stream_is_gone_is_inert() {
    // Arrange
    let stream = Stream::<i32>::new();
    let recorder = EventRecorder::attach(&stream);
    let subscription = recorder.subscription().clone();

    // Act
    drop(recorder);
    drop(stream);

    // Assert - resolving the weak back-reference fails quietly
    subscription.cancel();
}

#[test]
fn unsubscribe_owner_removes_matching_and_decayed_owners() {
    // Arrange
    let stream = Stream::new();
    let owner_a: OwnerToken = Arc::new("owner-a");
    let owner_b: OwnerToken = Arc::new("owner-b");
    let transient: OwnerToken = Arc::new("transient");

    let by_a = Arc::new(Mutex::new(Vec::new()));
    let by_b = Arc::new(Mutex::new(Vec::new()));
    let anonymous = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&by_a);
    let _a = stream.subscribe_with(
        SubscribeOptions::owned_by(Arc::clone(&owner_a)),
        move |event| {
            if let Some(v) = event.value() {
                sink.lock().push(*v);
            }
        },
    );
    let sink = Arc::clone(&by_b);
    let _b = stream.subscribe_with(
        SubscribeOptions::owned_by(Arc::clone(&owner_b)),
        move |event| {
            if let Some(v) = event.value() {
                sink.lock().push(*v);
            }
        },
    );
    let sink = Arc::clone(&anonymous);
    let _anon = stream.subscribe(move |event| {
        if let Some(v) = event.value() {
            sink.lock().push(*v);
        }
    });
    let _decayed = stream.subscribe_with(
        SubscribeOptions::owned_by(Arc::clone(&transient)),
        |_event| {},
    );
    drop(transient);
    assert_eq!(stream.subscription_count(), 4);

    // Act - removes owner_a's subscription and the decayed one
    stream.unsubscribe_owner(&owner_a);
    stream.append_value(1);

    // Assert
    assert_eq!(stream.subscription_count(), 2);
    assert!(by_a.lock().is_empty());
    assert_eq!(*by_b.lock(), vec![1]);
    assert_eq!(*anonymous.lock(), vec![1]);
}

#[test]
fn reentrant_append_from_a_handler_preserves_order_without_duplication() {
    // Arrange
    let stream = Stream::new();
    let echo = stream.clone();
    let _feedback = stream.subscribe(move |event| {
        if event.value() == Some(&1) {
            echo.append_value(2);
        }
    });
    let recorder = EventRecorder::attach(&stream);

    // Act
    stream.append_value(1);

    // Assert - the in-flight pass picks up the re-entrant append
    assert_eq!(recorder.values(), vec![1, 2]);
}

#[test]
fn unsubscribing_during_dispatch_takes_effect_next_event() {
    // Arrange
    let stream = Stream::new();
    let recorder = EventRecorder::attach(&stream);
    let target = stream.clone();
    let victim = recorder.subscription().clone();
    let _trigger = stream.subscribe(move |event| {
        if event.value() == Some(&1) {
            target.unsubscribe(&victim);
        }
    });

    // Act - both events appended atomically; the recorder is removed while
    // the first is being dispatched
    stream.append_all(Event::values([1, 2]));

    // Assert - the event being delivered completed delivery, the next did
    // not reach the removed subscriber
    assert_eq!(recorder.values(), vec![1]);
}

#[test]
fn from_stream_copies_backlog_and_subscriptions() {
    // Arrange
    let original = Stream::new();
    original.pause();
    original.append_value(1);
    original.append_value(2);
    let recorder = EventRecorder::attach(&original);
    assert!(recorder.is_empty());

    // Act - the copy starts active and delivers the copied backlog to the
    // copied subscriptions
    let copy = Stream::from_stream(&original, original.queue());
    copy.send(usize::MAX);

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);
    // The original is untouched
    assert!(original.state().is_paused());
    assert_eq!(original.pending_len(), 2);
}

#[test]
fn bounded_send_dispatches_at_most_the_requested_count() {
    // Arrange
    let stream = Stream::from_values([1, 2, 3]);
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let _sub = stream.subscribe_with(SubscribeOptions::deferred(), move |event| {
        if let Some(v) = event.value() {
            sink.lock().push(*v);
        }
    });

    // Act
    stream.send(2);

    // Assert
    assert_eq!(*received.lock(), vec![1, 2]);
    assert_eq!(stream.pending_len(), 1);
}

#[test]
fn send_without_subscribers_retains_the_backlog() {
    // Arrange
    let stream = Stream::from_values([1, 2]);

    // Act
    stream.send(usize::MAX);

    // Assert
    assert_eq!(stream.pending_len(), 2);
}
