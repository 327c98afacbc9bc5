// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::algorithms::LocalAlgorithmFactory;
use crate::config::{JobConfig, RunOptions};
use crate::deps::DependencyTable;
use crate::errors::ConfigurationError;
use crate::pool::AlgorithmPool;
use crate::scheduler::Scheduler;
use crate::tools::ToolRegistry;
use crate::traits::{AlgorithmFactory, ToolFactory};

/// Job runtime builder - assembles dependency table, instance pool and
/// scheduler from a validated configuration.
///
/// Everything built here is scoped to one run and passed around explicitly;
/// nothing is a process-wide singleton. Embedders with their own algorithm
/// implementations use [`RuntimeBuilder::with_factory`]; the plain
/// [`RuntimeBuilder::from_config`] wires up the bundled
/// [`LocalAlgorithmFactory`].
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a complete job runtime using the bundled algorithm factory.
    ///
    /// Returns the scheduler plus shared handles to the pool and dependency
    /// table for inspection.
    pub fn from_config(
        cfg: &JobConfig,
    ) -> Result<(Scheduler, Arc<AlgorithmPool>, Arc<DependencyTable>), ConfigurationError> {
        let factory = Arc::new(LocalAlgorithmFactory::from_configs(&cfg.algorithms));
        Self::with_factory(cfg, factory)
    }

    /// Build a job runtime around a caller-provided algorithm factory.
    pub fn with_factory(
        cfg: &JobConfig,
        factory: Arc<dyn AlgorithmFactory>,
    ) -> Result<(Scheduler, Arc<AlgorithmPool>, Arc<DependencyTable>), ConfigurationError> {
        let table = Arc::new(DependencyTable::build(&cfg.algorithms)?);
        let pool = Arc::new(AlgorithmPool::for_table(
            &table,
            cfg.run.per_type_instance_cap,
            factory,
        ));
        let scheduler = Scheduler::new(Arc::clone(&table), Arc::clone(&pool), &cfg.run);
        Ok((scheduler, pool, table))
    }

    /// Create and register every configured tool through the given factory.
    ///
    /// The registry is what [`ToolRegistry::finalize_all`] tears down at
    /// shutdown.
    pub fn build_tools(
        cfg: &JobConfig,
        factory: &dyn ToolFactory,
    ) -> Result<ToolRegistry, ConfigurationError> {
        let mut registry = ToolRegistry::new();
        for tool in &cfg.tools {
            registry.retrieve_or_create(&tool.type_name, factory)?;
        }
        Ok(registry)
    }

    /// Build the shared multi-thread task runtime sized by `worker_count`.
    ///
    /// Embedders already running inside a tokio runtime skip this and call
    /// [`Scheduler::run`] directly.
    pub fn build_runtime(options: &RunOptions) -> std::io::Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(options.worker_count.max(1))
            .enable_all()
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use crate::traits::Tool;

    #[test]
    fn end_to_end_run_from_yaml() {
        let yaml = r#"
run:
  max_events_in_flight: 2
  max_concurrent_tasks: 4
  worker_count: 2
  per_type_instance_cap: 2
algorithms:
  - type: hit_maker
    kind: cruncher
    outputs: ["hits"]
    options:
      delay_ms: 2
  - type: track_fitter
    kind: cruncher
    inputs: ["hits"]
    outputs: ["tracks"]
  - type: writer
    kind: writer
    stage: output
"#;
        let cfg: JobConfig = serde_yaml::from_str(yaml).unwrap();
        crate::config::validate_job_config(&cfg).unwrap();

        let (scheduler, pool, table) = RuntimeBuilder::from_config(&cfg).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.processing_count(), 2);

        let runtime = RuntimeBuilder::build_runtime(&cfg.run).unwrap();
        let report = runtime.block_on(scheduler.run(4)).unwrap();

        assert!(report.is_success(), "{}", report);
        assert_eq!(report.events_finished, 4);
        // bounded pool reuse across events
        assert!(pool.ever_created("hit_maker") <= 2);
        assert_eq!(
            pool.idle_count("hit_maker"),
            pool.ever_created("hit_maker")
        );
    }

    #[test]
    fn malformed_declaration_fails_the_build() {
        let yaml = r#"
algorithms:
  - type: broken
    inputs: ["a;b"]
"#;
        let cfg: JobConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            RuntimeBuilder::from_config(&cfg).unwrap_err(),
            ConfigurationError::MalformedDependency { .. }
        ));
    }

    struct NamedTool(String);

    impl Tool for NamedTool {
        fn name(&self) -> &str {
            &self.0
        }

        fn finalize(&self) -> Result<(), ToolError> {
            Ok(())
        }
    }

    struct NamedToolFactory;

    impl ToolFactory for NamedToolFactory {
        fn construct(
            &self,
            type_name: &str,
        ) -> Result<std::sync::Arc<dyn Tool>, ConfigurationError> {
            if type_name == "unknown" {
                return Err(ConfigurationError::UnknownToolType {
                    type_name: type_name.to_string(),
                });
            }
            Ok(std::sync::Arc::new(NamedTool(type_name.to_string())))
        }
    }

    #[test]
    fn configured_tools_are_created_once() {
        let yaml = r#"
algorithms: []
tools:
  - type: field_map
  - type: geometry
  - type: field_map
"#;
        let cfg: JobConfig = serde_yaml::from_str(yaml).unwrap();
        let registry = RuntimeBuilder::build_tools(&cfg, &NamedToolFactory).unwrap();
        // the duplicate entry resolves to the existing instance
        assert_eq!(registry.len(), 2);
        let report = registry.finalize_all();
        assert!(report.is_clean());
    }

    #[test]
    fn unknown_tool_type_fails_the_build() {
        let yaml = r#"
algorithms: []
tools:
  - type: unknown
"#;
        let cfg: JobConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            RuntimeBuilder::build_tools(&cfg, &NamedToolFactory).unwrap_err(),
            ConfigurationError::UnknownToolType { .. }
        ));
    }
}
