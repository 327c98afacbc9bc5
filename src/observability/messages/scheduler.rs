// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for event-loop lifecycle and per-event progress.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A run is starting with the given concurrency envelope.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunStarted {
    pub max_events: u64,
    pub max_events_in_flight: usize,
    pub max_concurrent_tasks: usize,
    pub algorithm_count: usize,
}

impl Display for RunStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run over {} events: {} algorithms, {} events in flight, {} concurrent tasks",
            self.max_events, self.algorithm_count, self.max_events_in_flight, self.max_concurrent_tasks
        )
    }
}

impl StructuredLog for RunStarted {
    fn log(&self) {
        tracing::info!(
            max_events = self.max_events,
            max_events_in_flight = self.max_events_in_flight,
            max_concurrent_tasks = self.max_concurrent_tasks,
            algorithm_count = self.algorithm_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            max_events = self.max_events,
            max_events_in_flight = self.max_events_in_flight,
            max_concurrent_tasks = self.max_concurrent_tasks,
        )
    }
}

/// An event was admitted into a free processing slot.
///
/// # Log Level
/// `debug!` - Per-event detail
pub struct EventAdmitted {
    pub event_number: u64,
    pub slot_index: usize,
}

impl Display for EventAdmitted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event {} admitted on slot {}",
            self.event_number, self.slot_index
        )
    }
}

impl StructuredLog for EventAdmitted {
    fn log(&self) {
        tracing::debug!(
            event_number = self.event_number,
            slot_index = self.slot_index,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "event",
            span_name = name,
            event_number = self.event_number,
            slot_index = self.slot_index,
        )
    }
}

/// An event finished and its slot was freed.
///
/// # Log Level
/// `debug!` - Per-event detail
pub struct EventRetired {
    pub event_number: u64,
    pub failure_count: usize,
}

impl Display for EventRetired {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.failure_count == 0 {
            write!(f, "Event {} retired cleanly", self.event_number)
        } else {
            write!(
                f,
                "Event {} retired with {} failure(s)",
                self.event_number, self.failure_count
            )
        }
    }
}

impl StructuredLog for EventRetired {
    fn log(&self) {
        tracing::debug!(
            event_number = self.event_number,
            failure_count = self.failure_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "event_retired",
            span_name = name,
            event_number = self.event_number,
            failure_count = self.failure_count,
        )
    }
}

/// An event can make no further progress and is being retired early.
///
/// # Log Level
/// `warn!` - Unexpected but contained
pub struct EventStalled<'a> {
    pub event_number: u64,
    pub never_ran: &'a [String],
}

impl Display for EventStalled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Event {} stalled; algorithms never ran: {}",
            self.event_number,
            self.never_ran.join(", ")
        )
    }
}

impl StructuredLog for EventStalled<'_> {
    fn log(&self) {
        tracing::warn!(
            event_number = self.event_number,
            never_ran_count = self.never_ran.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "event_stalled",
            span_name = name,
            event_number = self.event_number,
            never_ran_count = self.never_ran.len(),
        )
    }
}

/// A run completed or aborted.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted {
    pub events_finished: u64,
    pub events_failed: usize,
    pub aborted: bool,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run {} after {:?}: {} events finished, {} failed",
            if self.aborted { "aborted" } else { "completed" },
            self.duration,
            self.events_finished,
            self.events_failed
        )
    }
}

impl StructuredLog for RunCompleted {
    fn log(&self) {
        tracing::info!(
            events_finished = self.events_finished,
            events_failed = self.events_failed,
            aborted = self.aborted,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            events_finished = self.events_finished,
            events_failed = self.events_failed,
            aborted = self.aborted,
        )
    }
}
