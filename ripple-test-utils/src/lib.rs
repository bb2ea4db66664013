// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the ripple workspace.
//!
//! External comparison of event sequences ([`events_equal`]), a collector
//! subscription for asserting what a stream delivered
//! ([`EventRecorder`]), and error factories for exercising the error
//! channel.

pub mod error_injection;
pub mod helpers;
pub mod recorder;

pub use self::error_injection::{dummy_error, injected_error, DummyError};
pub use self::helpers::{events_equal, wait_until};
pub use self::recorder::EventRecorder;
