// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for algorithm instance pool activity.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The pool created a fresh instance of an algorithm type.
///
/// # Log Level
/// `debug!` - Resource management detail
pub struct InstanceCreated<'a> {
    pub type_name: &'a str,
    pub created: usize,
    pub cap: usize,
}

impl Display for InstanceCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created instance {}/{} of algorithm '{}'",
            self.created, self.cap, self.type_name
        )
    }
}

impl StructuredLog for InstanceCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            type_name = self.type_name,
            created = self.created,
            cap = self.cap,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "instance_created",
            span_name = name,
            type_name = self.type_name,
            created = self.created,
            cap = self.cap,
        )
    }
}

/// No idle instance was available and the per-type cap is reached.
///
/// Not an error: the caller retries on a later scheduling tick.
///
/// # Log Level
/// `trace!` - Hot-path detail
pub struct InstanceMiss<'a> {
    pub type_name: &'a str,
}

impl Display for InstanceMiss<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No instance of algorithm '{}' available",
            self.type_name
        )
    }
}

impl StructuredLog for InstanceMiss<'_> {
    fn log(&self) {
        tracing::trace!(type_name = self.type_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("instance_miss", span_name = name, type_name = self.type_name)
    }
}
