// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while an event is being processed.
//!
//! Execution failures are confined to their owning event: they are recorded
//! in the run report and never abort the run or corrupt other events' state.

use std::fmt;

/// Error returned by an algorithm body.
///
/// Deliberately just a message: the task wrapper attaches the algorithm type
/// and event when it records the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmError {
    pub message: String,
}

impl AlgorithmError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AlgorithmError {}

impl From<String> for AlgorithmError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for AlgorithmError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<crate::errors::RegistryError> for AlgorithmError {
    fn from(error: crate::errors::RegistryError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// A failure recorded against one event during the run
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionFailure {
    /// An algorithm reported an error from its task body
    AlgorithmError { algorithm: String, message: String },

    /// An algorithm panicked inside its task body
    AlgorithmPanic { algorithm: String, message: String },

    /// The event can make no further progress: nothing running, nothing
    /// data-ready, nothing newly produced. The named algorithms never ran.
    Stalled { never_ran: Vec<String> },
}

impl ExecutionFailure {
    /// The algorithm the failure is attributed to, if any.
    pub fn algorithm(&self) -> Option<&str> {
        match self {
            ExecutionFailure::AlgorithmError { algorithm, .. }
            | ExecutionFailure::AlgorithmPanic { algorithm, .. } => Some(algorithm),
            ExecutionFailure::Stalled { .. } => None,
        }
    }
}

impl fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionFailure::AlgorithmError { algorithm, message } => {
                write!(f, "Algorithm '{}' failed: {}", algorithm, message)
            }
            ExecutionFailure::AlgorithmPanic { algorithm, message } => {
                write!(f, "Algorithm '{}' panicked: {}", algorithm, message)
            }
            ExecutionFailure::Stalled { never_ran } => {
                write!(
                    f,
                    "Event stalled; algorithms never ran: {}",
                    never_ran.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ExecutionFailure {}
