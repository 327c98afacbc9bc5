// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors from the per-event data registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// The path already holds an object; objects are never replaced mid-event
    AlreadyPresent { path: String },

    /// The path has no non-empty segments
    EmptyPath,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyPresent { path } => {
                write!(f, "Object already registered at '{}'", path)
            }
            RegistryError::EmptyPath => write!(f, "Registry path has no segments"),
        }
    }
}

impl std::error::Error for RegistryError {}
