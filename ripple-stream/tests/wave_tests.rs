// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ripple_core::{Event, EventKind};
use ripple_stream::{Stream, Wave};
use ripple_test_utils::{injected_error, EventRecorder};

#[test]
fn merge_fans_in_seeded_inner_streams() {
    // Arrange
    let first = Stream::from_values([0, 2]);
    let second = Stream::from_values([1, 3]);
    let wave = Wave::from_streams([first, second]);

    // Act
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);

    // Assert - inner backlogs drain in adoption order
    assert_eq!(recorder.values(), vec![0, 2, 1, 3]);
}

#[test]
fn merge_adopts_inner_streams_appended_after_subscribing() {
    // Arrange
    let first = Stream::from_values([0, 2]);
    let second = Stream::from_values([1, 3]);
    let wave = Wave::new();
    wave.append_value(first);

    // Act
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);
    wave.append_value(second);

    // Assert
    assert_eq!(recorder.values(), vec![0, 2, 1, 3]);
}

#[test]
fn merge_forwards_values_appended_to_adopted_streams() {
    // Arrange
    let first = Stream::new();
    let second = Stream::new();
    let wave = Wave::from_streams([first.clone(), second.clone()]);
    first.append_value(4);

    // Act
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);
    second.append_value(5);

    // Assert
    assert_eq!(recorder.values(), vec![4, 5]);
}

#[test]
fn merge_survives_inner_stream_completion() {
    // Arrange
    let first = Stream::new();
    let second = Stream::new();
    let wave = Wave::from_streams([first.clone(), second.clone()]);
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);

    // Act - one inner stream completes, the other keeps producing
    first.append_value(1);
    first.append(Event::Completed);
    second.append_value(2);

    // Assert - the inner completion is not forwarded
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.kinds(), vec![EventKind::Value, EventKind::Value]);
    assert!(merged.state().is_active());
}

#[test]
fn merge_forwards_inner_stream_errors() {
    // Arrange
    let first = Stream::new();
    let second = Stream::new();
    let wave = Wave::from_streams([first.clone(), second.clone()]);
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);

    // Act
    first.append_value(1);
    first.append(Event::Error(injected_error()));
    second.append_value(2);

    // Assert
    assert_eq!(recorder.kinds(), vec![EventKind::Value, EventKind::Error]);
    assert!(merged.state().is_failed());
}

#[test]
fn the_waves_own_completion_terminates_the_merged_stream() {
    // Arrange
    let inner = Stream::new();
    let wave = Wave::from_streams([inner.clone()]);
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);

    // Act
    inner.append_value(1);
    wave.append(Event::Completed);
    inner.append_value(2);

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert!(merged.state().is_completed());
}

#[test]
fn the_waves_own_error_terminates_the_merged_stream() {
    // Arrange
    let wave = Wave::<i32>::new();
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);

    // Act
    wave.append(Event::Error(injected_error()));

    // Assert
    assert_eq!(recorder.kinds(), vec![EventKind::Error]);
    assert!(merged.state().is_failed());
}

#[test]
fn switch_latest_replaces_the_live_inner_stream() {
    // Arrange
    let first = Stream::from_values([0, 2]);
    let second = Stream::from_values([1, 3]);
    let wave = Wave::new();
    wave.append_value(first.clone());

    // Act
    let switched = wave.switch_latest();
    let recorder = EventRecorder::attach(&switched);
    wave.append_value(second.clone());
    first.append_value(4);
    second.append_value(5);

    // Assert - events from the superseded stream are dropped
    assert_eq!(recorder.values(), vec![0, 2, 1, 3, 5]);
}

#[test]
fn switch_latest_keeps_at_most_one_upstream_subscribed() {
    // Arrange
    let first: Stream<i32> = Stream::new();
    let second = Stream::new();
    let wave = Wave::new();
    let switched = wave.switch_latest();
    let _recorder = EventRecorder::attach(&switched);

    // Act
    wave.append_value(first.clone());
    wave.append_value(second.clone());

    // Assert
    assert_eq!(first.subscription_count(), 0);
    assert_eq!(second.subscription_count(), 1);
}

#[test]
fn switch_latest_forwards_the_waves_terminal_events() {
    // Arrange
    let inner = Stream::from_values([1]);
    let wave = Wave::new();
    wave.append_value(inner);
    let switched = wave.switch_latest();
    let recorder = EventRecorder::attach(&switched);

    // Act
    wave.append(Event::Error(injected_error()));

    // Assert
    assert_eq!(recorder.values(), vec![1]);
    assert_eq!(
        recorder.kinds(),
        vec![EventKind::Value, EventKind::Error]
    );
    assert!(switched.state().is_failed());
}

#[test]
fn dropping_a_wave_tears_down_its_inner_subscriptions() {
    // Arrange
    let inner = Stream::new();
    let wave = Wave::from_streams([inner.clone()]);
    let merged = wave.merge();
    let recorder = EventRecorder::attach(&merged);
    inner.append_value(1);
    assert_eq!(inner.subscription_count(), 1);

    // Act
    drop(wave);
    inner.append_value(2);

    // Assert - the redirect subscription was cancelled with the wave
    assert_eq!(inner.subscription_count(), 0);
    assert_eq!(recorder.values(), vec![1]);
}
