// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The tagged event union delivered by streams.

use crate::error::RippleError;

/// A single stream event: a value, an error, or the completion marker.
///
/// Events are immutable once constructed. `Error` and `Completed` are
/// terminal for the stream that dispatches them: once one has been sent,
/// that stream delivers nothing further.
#[derive(Debug, Clone)]
pub enum Event<T> {
    /// A successful value.
    Value(T),
    /// An error that fails the stream.
    Error(RippleError),
    /// The completion marker that ends the stream.
    Completed,
}

/// Discriminant of an [`Event`], independent of any payload.
///
/// External code (equality helpers, recorders) matches on this instead of
/// reaching into the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Value,
    Error,
    Completed,
}

impl<T> Event<T> {
    /// Wraps each value of a sequence as an `Event::Value`.
    ///
    /// Mirrors seeding a stream from plain values.
    pub fn values<I>(values: I) -> Vec<Event<T>>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(Event::Value).collect()
    }

    /// Returns the kind discriminant of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Event::Value(_) => EventKind::Value,
            Event::Error(_) => EventKind::Error,
            Event::Completed => EventKind::Completed,
        }
    }

    /// Returns `true` if this is a `Value`.
    pub const fn is_value(&self) -> bool {
        matches!(self, Event::Value(_))
    }

    /// Returns `true` if this is an `Error`.
    pub const fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    /// Returns `true` if this is `Completed`.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Event::Completed)
    }

    /// Returns `true` if this event ends further delivery (`Error` or
    /// `Completed`).
    pub const fn is_terminal(&self) -> bool {
        !self.is_value()
    }

    /// Borrows the value payload, if any.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Event::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Borrows the error payload, if any.
    pub const fn error(&self) -> Option<&RippleError> {
        match self {
            Event::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Converts into the value payload, discarding terminal events.
    pub fn into_value(self) -> Option<T> {
        match self {
            Event::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Maps the value payload, re-encoding terminal events unchanged.
    pub fn map<U, F>(self, f: F) -> Event<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Event::Value(v) => Event::Value(f(v)),
            Event::Error(e) => Event::Error(e),
            Event::Completed => Event::Completed,
        }
    }
}

impl<T: PartialEq> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Event::Value(a), Event::Value(b)) => a == b,
            (Event::Completed, Event::Completed) => true,
            // Errors are never equal; compare error sequences through
            // `events_equal`, which only checks the kind
            _ => false,
        }
    }
}

impl<T> From<T> for Event<T> {
    fn from(value: T) -> Self {
        Event::Value(value)
    }
}
