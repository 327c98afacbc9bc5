// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod finalizer;

pub use finalizer::{FinalizationReport, FinalizedEntry, ToolRegistry};
