// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for the algorithm roster and run options.
//!
//! Validation runs before anything downstream consumes the config, so the
//! dependency resolver and the pool can assume unique, non-empty type names
//! and a sane concurrency envelope. Checks performed:
//!
//! 1. **Uniqueness**: algorithm type names must be unique (the pool keys its
//!    idle queues by type)
//! 2. **Non-empty names**: a blank type name can never resolve in a factory
//! 3. **Run options**: every concurrency knob must be at least 1
//!
//! All violations are collected and returned together rather than failing on
//! the first one.

use crate::config::JobConfig;
use crate::errors::ValidationError;
use std::collections::HashSet;

/// Validate a job configuration.
///
/// Returns `Ok(())` for a usable config, or every violation found.
pub fn validate_job_config(cfg: &JobConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (index, algorithm) in cfg.algorithms.iter().enumerate() {
        if algorithm.type_name.trim().is_empty() {
            errors.push(ValidationError::EmptyAlgorithmType { index });
            continue;
        }
        if !seen.insert(algorithm.type_name.as_str()) {
            errors.push(ValidationError::DuplicateAlgorithmType {
                type_name: algorithm.type_name.clone(),
            });
        }
    }

    let run = &cfg.run;
    for (value, option) in [
        (run.max_events_in_flight, "max_events_in_flight"),
        (run.max_concurrent_tasks, "max_concurrent_tasks"),
        (run.worker_count, "worker_count"),
        (run.per_type_instance_cap, "per_type_instance_cap"),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroRunOption { option });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmConfig, RunOptions};
    use std::collections::HashMap;

    fn algorithm(type_name: &str) -> AlgorithmConfig {
        AlgorithmConfig {
            type_name: type_name.to_string(),
            kind: None,
            inputs: vec![],
            outputs: vec![],
            stage: Default::default(),
            options: HashMap::new(),
        }
    }

    fn config(algorithms: Vec<AlgorithmConfig>) -> JobConfig {
        JobConfig {
            run: RunOptions::default(),
            algorithms,
            tools: vec![],
        }
    }

    #[test]
    fn accepts_unique_names() {
        let cfg = config(vec![algorithm("a"), algorithm("b")]);
        assert!(validate_job_config(&cfg).is_ok());
    }

    #[test]
    fn rejects_duplicate_type_names() {
        let cfg = config(vec![algorithm("a"), algorithm("a")]);
        let errors = validate_job_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateAlgorithmType {
                type_name: "a".to_string()
            }]
        );
    }

    #[test]
    fn rejects_blank_type_name() {
        let cfg = config(vec![algorithm("  ")]);
        let errors = validate_job_config(&cfg).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyAlgorithmType { index: 0 }]);
    }

    #[test]
    fn rejects_zero_run_options() {
        let mut cfg = config(vec![algorithm("a")]);
        cfg.run.max_concurrent_tasks = 0;
        cfg.run.per_type_instance_cap = 0;
        let errors = validate_job_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::ZeroRunOption {
            option: "max_concurrent_tasks"
        }));
        assert!(errors.contains(&ValidationError::ZeroRunOption {
            option: "per_type_instance_cap"
        }));
    }

    #[test]
    fn collects_all_violations() {
        let mut cfg = config(vec![algorithm(""), algorithm("x"), algorithm("x")]);
        cfg.run.worker_count = 0;
        let errors = validate_job_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
