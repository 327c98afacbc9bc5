// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::errors::ExecutionFailure;

/// Everything that went wrong for one event.
#[derive(Debug, Clone)]
pub struct EventFailureRecord {
    pub event_number: u64,
    pub failures: Vec<ExecutionFailure>,
}

/// Per-run summary handed back by the scheduler.
///
/// Separates "N events failed" from "the job aborted before processing any
/// events": an aborted run reports `aborted = true`, and
/// [`aborted_before_processing`](Self::aborted_before_processing) is the
/// stronger claim that nothing finished either.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Events admitted into a slot, whether or not they completed.
    pub events_admitted: u64,
    /// Events that retired with no recorded failure.
    pub events_finished: u64,
    /// Events that retired with at least one recorded failure.
    pub failed_events: Vec<EventFailureRecord>,
    /// Whether the abort flag was raised before the run completed.
    pub aborted: bool,
}

impl RunReport {
    pub fn events_failed(&self) -> usize {
        self.failed_events.len()
    }

    /// Completed with every admitted event finishing cleanly.
    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed_events.is_empty()
    }

    /// The run was cut short before a single event finished.
    pub fn aborted_before_processing(&self) -> bool {
        self.aborted && self.events_finished == 0
    }

    /// The failure record for an event, if it failed.
    pub fn event_failures(&self, event_number: u64) -> Option<&EventFailureRecord> {
        self.failed_events
            .iter()
            .find(|r| r.event_number == event_number)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events admitted, {} finished, {} failed{}",
            self.events_admitted,
            self.events_finished,
            self.failed_events.len(),
            if self.aborted { " (run aborted)" } else { "" }
        )
    }
}
