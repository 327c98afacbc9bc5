// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod event_state;

pub use event_state::{EventStateTracker, ExecutionCounters};
