// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message is a plain struct implementing `Display` for the
//! human-readable rendering and [`StructuredLog`] for the structured
//! `tracing` event carrying the same fields.

pub mod pool;
pub mod scheduler;
pub mod tools;

use tracing::Span;

/// A log message that knows how to emit itself as a structured event.
pub trait StructuredLog {
    /// Emit the message at its natural level with structured fields.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
