// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the engine. Message types follow a struct-based
//! pattern with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::scheduler` - event loop lifecycle and per-event progress
//! * `messages::pool` - algorithm instance pool activity
//! * `messages::tools` - tool finalization sweep events

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the standard fmt subscriber with env-filter support.
///
/// Embedders that bring their own subscriber skip this; calling it twice is
/// harmless (the second install fails quietly).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
