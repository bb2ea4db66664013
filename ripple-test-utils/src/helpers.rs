// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::thread;
use std::time::{Duration, Instant};

use ripple_core::Event;

/// Compares two ordered event sequences with a caller-supplied element
/// equality.
///
/// Two events are equal when both are `Value` with payloads equal per
/// `eq`, both are `Error` regardless of payload, or both are `Completed`;
/// mismatched kinds are unequal.
///
/// # Examples
///
/// ```
/// use ripple_core::Event;
/// use ripple_test_utils::events_equal;
///
/// let sent = Event::values([1, 2, 3]);
/// let received = Event::values([1, 2, 3]);
/// assert!(events_equal(&sent, &received, |a, b| a == b));
/// ```
pub fn events_equal<T, F>(lhs: &[Event<T>], rhs: &[Event<T>], eq: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    if lhs.len() != rhs.len() {
        return false;
    }
    lhs.iter().zip(rhs.iter()).all(|(a, b)| match (a, b) {
        (Event::Value(a), Event::Value(b)) => eq(a, b),
        (Event::Error(_), Event::Error(_)) => true,
        (Event::Completed, Event::Completed) => true,
        _ => false,
    })
}

/// Polls `condition` until it holds or `timeout` elapses; returns the
/// final verdict.
///
/// For asserting on deliveries that hop through an execution queue, where
/// arrival is eventual rather than synchronous.
pub fn wait_until<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
