// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during job configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Two algorithm entries share the same type name
    #[error("Duplicate algorithm type: '{type_name}'")]
    DuplicateAlgorithmType { type_name: String },

    /// An algorithm entry has an empty type name
    #[error("Algorithm entry {index} has an empty type name")]
    EmptyAlgorithmType { index: usize },

    /// A run option that must be at least 1 was configured as 0
    #[error("Run option '{option}' must be at least 1")]
    ZeroRunOption { option: &'static str },
}

/// Fatal startup errors: the run never begins.
///
/// Everything here is detectable before the first event is admitted, either
/// while the dependency table is built or when a factory collaborator is
/// first consulted.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The factory collaborator does not know this algorithm type
    UnknownAlgorithmType { type_name: String },

    /// The factory collaborator does not know this tool type
    UnknownToolType { type_name: String },

    /// A declared-inputs string could not be tokenized
    MalformedDependency {
        type_name: String,
        declaration: String,
    },

    /// The factory knows the type but failed to construct an instance
    ConstructionFailed { type_name: String, reason: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownAlgorithmType { type_name } => {
                write!(f, "Unknown algorithm type: '{}'", type_name)
            }
            ConfigurationError::UnknownToolType { type_name } => {
                write!(f, "Unknown tool type: '{}'", type_name)
            }
            ConfigurationError::MalformedDependency {
                type_name,
                declaration,
            } => {
                write!(
                    f,
                    "Algorithm '{}' declares an input that cannot be tokenized: {:?}",
                    type_name, declaration
                )
            }
            ConfigurationError::ConstructionFailed { type_name, reason } => {
                write!(f, "Failed to construct '{}': {}", type_name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors from reading and validating a job configuration file
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
