// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_MAX_CONCURRENT_TASKS, DEFAULT_MAX_EVENTS_IN_FLIGHT, DEFAULT_PER_TYPE_INSTANCE_CAP,
    DEFAULT_WORKER_COUNT,
};
use crate::errors::ConfigLoadError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main configuration structure for one processing job.
///
/// This struct represents the complete configuration for a run: the
/// concurrency envelope and the algorithm and tool rosters. It is typically
/// loaded from a YAML configuration file.
///
/// # Example
/// ```yaml
/// run:
///   max_events_in_flight: 4
///   max_concurrent_tasks: 8
///   worker_count: 4
///   per_type_instance_cap: 2
/// algorithms:
///   - type: hit_maker
///     kind: cruncher
///     outputs: ["hits"]
///   - type: track_fitter
///     kind: cruncher
///     inputs: ["hits"]
///     outputs: ["tracks"]
///   - type: writer
///     kind: writer
///     stage: output
/// tools:
///   - type: field_map
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub run: RunOptions,
    pub algorithms: Vec<AlgorithmConfig>,
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

/// Concurrency envelope of a run.
///
/// All four knobs are plain integers consumed once at startup. Each defaults
/// to the corresponding constant in [`crate::config::consts`]; a value of 0
/// is rejected by validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RunOptions {
    /// Maximum number of events processed simultaneously.
    #[serde(default = "default_max_events_in_flight")]
    pub max_events_in_flight: usize,

    /// Cap on concurrently executing algorithm tasks, across all events.
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Worker threads of the shared task runtime.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Instances the pool may create per algorithm type.
    #[serde(default = "default_per_type_instance_cap")]
    pub per_type_instance_cap: usize,
}

fn default_max_events_in_flight() -> usize {
    DEFAULT_MAX_EVENTS_IN_FLIGHT
}

fn default_max_concurrent_tasks() -> usize {
    DEFAULT_MAX_CONCURRENT_TASKS
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_per_type_instance_cap() -> usize {
    DEFAULT_PER_TYPE_INSTANCE_CAP
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_events_in_flight: DEFAULT_MAX_EVENTS_IN_FLIGHT,
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            worker_count: DEFAULT_WORKER_COUNT,
            per_type_instance_cap: DEFAULT_PER_TYPE_INSTANCE_CAP,
        }
    }
}

/// Configuration for a single algorithm type in the pipeline.
///
/// # Fields
/// * `type_name` - Unique type name; pooling and factory lookup key
/// * `kind` - Bundled implementation to construct (defaults to `stub`)
/// * `inputs` - Declared input products; free-form strings, tokenized at
///   startup (comma-separated, optional bracket/quote wrapping)
/// * `outputs` - Products the implementation publishes, same token syntax
/// * `stage` - `processing` (scheduled by data flow) or `output` (run
///   synchronously when the event completes)
/// * `options` - Implementation-specific knobs, e.g. `delay_ms`
#[derive(Debug, Clone, Deserialize)]
pub struct AlgorithmConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    pub kind: Option<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

/// Where in the event lifecycle an algorithm runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Dispatched by the scheduler once its declared inputs exist.
    #[default]
    Processing,
    /// Run synchronously on the controlling loop when the event finishes.
    Output,
}

/// Configuration for a shared tool instance created at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<JobConfig, ConfigLoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: JobConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file.
///
/// Validation rejects duplicate or blank algorithm type names and zero-valued
/// run options before anything downstream consumes the config.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<JobConfig, ConfigLoadError> {
    let cfg = load_config(path)?;

    if let Err(validation_errors) = crate::config::validate_job_config(&cfg) {
        return Err(ConfigLoadError::Validation(validation_errors));
    }

    Ok(cfg)
}
