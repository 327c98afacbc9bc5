// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ToolError;

/// A shared helper component with no single owner.
///
/// Tools are registered in a [`ToolRegistry`](crate::tools::ToolRegistry) and
/// handed out as `Arc<dyn Tool>`; the `Arc` strong count *is* the live
/// reference count the finalizer reasons about. A tool may hold references to
/// other tools (acquired through the registry) and may still call into them
/// from its own `finalize`, which is why finalization and destruction are two
/// separate steps.
pub trait Tool: Send + Sync {
    /// Registered name of this instance.
    fn name(&self) -> &str;

    /// Teardown step of the lifecycle, distinct from destruction.
    ///
    /// Called exactly once per tool during shutdown, while every other tool
    /// is still alive. A tool that releases its references to other tools
    /// should do it here; references it keeps are dropped with the instance.
    fn finalize(&self) -> Result<(), ToolError>;
}
