// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in defaults for run options.

/// Events processed simultaneously when the config does not say otherwise.
pub const DEFAULT_MAX_EVENTS_IN_FLIGHT: usize = 1;

/// Concurrently executing algorithm tasks across all events.
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 1;

/// Worker threads for the shared task runtime.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Instances the pool may create per algorithm type.
pub const DEFAULT_PER_TYPE_INSTANCE_CAP: usize = 1;
