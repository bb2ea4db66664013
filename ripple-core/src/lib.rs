// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types for the ripple reactive stream engine.
//!
//! This crate holds the event model shared by every ripple crate:
//! [`Event`], its [`EventKind`] discriminant, and the [`RippleError`]
//! payload carried by error events. The stream engine itself lives in
//! `ripple-stream`; the scheduler seam in `ripple-runtime`.

pub mod error;
pub mod event;

pub use self::error::{Result, RippleError};
pub use self::event::{Event, EventKind};
