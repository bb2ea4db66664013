// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the ripple reactive stream engine.
//!
//! [`RippleError`] is the payload type of `Event::Error`. Errors enter a
//! stream as ordinary events (via `append`) and are forwarded downstream by
//! every combinator unmodified in payload; the engine never produces,
//! retries or suppresses them on its own.

/// Root error type for all ripple operations.
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// Stream processing encountered an error.
    ///
    /// General-purpose variant for failures raised by the engine or by
    /// operator plumbing.
    #[error("stream processing error: {context}")]
    Stream {
        /// Description of what went wrong.
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by producers and fallible transforms so they
    /// can travel the error channel of a stream.
    #[error("user error: {0}")]
    User(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RippleError {
    /// Create a stream processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::Stream {
            context: context.into(),
        }
    }

    /// Wrap a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::User(Box::new(error))
    }
}

/// Specialized `Result` type for ripple operations.
pub type Result<T> = std::result::Result<T, RippleError>;

impl Clone for RippleError {
    fn clone(&self) -> Self {
        match self {
            Self::Stream { context } => Self::Stream {
                context: context.clone(),
            },
            // The boxed error cannot be cloned, so degrade to its message
            Self::User(e) => Self::Stream {
                context: format!("user error: {e}"),
            },
        }
    }
}
