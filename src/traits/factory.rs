// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::errors::ConfigurationError;
use crate::traits::{Algorithm, Tool};

/// Name → constructor collaborator for algorithm instances.
///
/// The pool calls `construct` whenever it needs a fresh instance of a type
/// whose idle queue is empty and whose per-type cap is not yet reached. An
/// unknown type name is a configuration error and aborts the run.
pub trait AlgorithmFactory: Send + Sync {
    fn construct(&self, type_name: &str) -> Result<Box<dyn Algorithm>, ConfigurationError>;
}

/// Name → constructor collaborator for tool instances.
pub trait ToolFactory: Send + Sync {
    fn construct(&self, type_name: &str) -> Result<Arc<dyn Tool>, ConfigurationError>;
}
