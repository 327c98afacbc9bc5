// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the tool finalization sweep.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The two-phase finalization sweep is starting.
///
/// # Log Level
/// `info!` - Shutdown milestone
pub struct FinalizationStarted {
    pub tool_count: usize,
    pub total_references: usize,
}

impl Display for FinalizationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finalizing {} tools ({} live references)",
            self.tool_count, self.total_references
        )
    }
}

impl StructuredLog for FinalizationStarted {
    fn log(&self) {
        tracing::info!(
            tool_count = self.tool_count,
            total_references = self.total_references,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "tool_finalization",
            span_name = name,
            tool_count = self.tool_count,
            total_references = self.total_references,
        )
    }
}

/// One tool was finalized (still alive, deletion deferred to phase 2).
///
/// # Log Level
/// `debug!` - Per-tool detail
pub struct ToolFinalized<'a> {
    pub tool_name: &'a str,
    pub references: usize,
}

impl Display for ToolFinalized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Finalized tool '{}' (refCount {})",
            self.tool_name, self.references
        )
    }
}

impl StructuredLog for ToolFinalized<'_> {
    fn log(&self) {
        tracing::debug!(
            tool_name = self.tool_name,
            references = self.references,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "tool_finalized",
            span_name = name,
            tool_name = self.tool_name,
            references = self.references,
        )
    }
}

/// A tool's finalize step failed; the sweep continues.
///
/// # Log Level
/// `warn!` - Failure requiring attention, not fatal
pub struct ToolFinalizeFailed<'a> {
    pub tool_name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ToolFinalizeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "FAILURE finalizing tool '{}': {}",
            self.tool_name, self.error
        )
    }
}

impl StructuredLog for ToolFinalizeFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            tool_name = self.tool_name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "tool_finalize_failed",
            span_name = name,
            tool_name = self.tool_name,
            error = %self.error,
        )
    }
}

/// Tools survived the bounded deletion pass.
///
/// # Log Level
/// `error!` - Leaked tools at shutdown
pub struct FinalizationStuck<'a> {
    pub survivors: &'a [String],
}

impl Display for FinalizationStuck<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unable to delete {} tool(s): {}",
            self.survivors.len(),
            self.survivors.join(", ")
        )
    }
}

impl StructuredLog for FinalizationStuck<'_> {
    fn log(&self) {
        tracing::error!(
            survivor_count = self.survivors.len(),
            survivors = ?self.survivors,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "finalization_stuck",
            span_name = name,
            survivor_count = self.survivors.len(),
        )
    }
}
