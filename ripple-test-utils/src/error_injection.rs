// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ripple_core::RippleError;

/// Placeholder failure for exercising the error channel in tests.
#[derive(Debug, thiserror::Error)]
#[error("dummy failure: {0}")]
pub struct DummyError(pub &'static str);

/// An engine-level error with a recognizable message.
pub fn injected_error() -> RippleError {
    RippleError::stream_error("injected test error")
}

/// A user-payload error wrapping [`DummyError`].
pub fn dummy_error() -> RippleError {
    RippleError::user_error(DummyError("boom"))
}
