// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod registry;
mod tool;

pub use config::{ConfigLoadError, ConfigurationError, ValidationError};
pub use execution::{AlgorithmError, ExecutionFailure};
pub use registry::RegistryError;
pub use tool::ToolError;
