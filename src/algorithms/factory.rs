// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::time::Duration;

use crate::config::AlgorithmConfig;
use crate::deps::tokenize_declaration;
use crate::errors::ConfigurationError;
use crate::traits::{Algorithm, AlgorithmFactory};

use super::cruncher::CruncherAlgorithm;
use super::stub::{FailingAlgorithm, PanickingAlgorithm, StubAlgorithm};
use super::writer::WriterAlgorithm;

/// Factory for the bundled in-process algorithm implementations.
///
/// The `kind` field in the config determines which algorithm to create:
/// - "stub" (or no kind) -> StubAlgorithm
/// - "cruncher" -> CruncherAlgorithm (reads `delay_ms` from options)
/// - "failing" -> FailingAlgorithm
/// - "panicking" -> PanickingAlgorithm
/// - "writer" -> WriterAlgorithm
pub struct LocalAlgorithmFactory {
    configs: HashMap<String, AlgorithmConfig>,
}

impl LocalAlgorithmFactory {
    /// A factory over the configured algorithm roster.
    pub fn from_configs(configs: &[AlgorithmConfig]) -> Self {
        Self {
            configs: configs
                .iter()
                .map(|c| (c.type_name.clone(), c.clone()))
                .collect(),
        }
    }

    /// List all bundled implementation kinds
    pub fn list_available_kinds() -> Vec<&'static str> {
        vec!["stub", "cruncher", "failing", "panicking", "writer"]
    }

    /// Check if an implementation kind is available
    pub fn is_kind_available(kind: &str) -> bool {
        Self::list_available_kinds().contains(&kind)
    }

    fn outputs_of(config: &AlgorithmConfig) -> Result<Vec<String>, ConfigurationError> {
        let mut outputs = Vec::new();
        for declaration in &config.outputs {
            let tokens = tokenize_declaration(declaration).ok_or_else(|| {
                ConfigurationError::MalformedDependency {
                    type_name: config.type_name.clone(),
                    declaration: declaration.clone(),
                }
            })?;
            outputs.extend(tokens);
        }
        Ok(outputs)
    }

    fn delay_of(config: &AlgorithmConfig) -> Duration {
        let millis = config
            .options
            .get("delay_ms")
            .and_then(|value| value.as_u64())
            .unwrap_or(0);
        Duration::from_millis(millis)
    }
}

impl AlgorithmFactory for LocalAlgorithmFactory {
    fn construct(&self, type_name: &str) -> Result<Box<dyn Algorithm>, ConfigurationError> {
        let config = self.configs.get(type_name).ok_or_else(|| {
            ConfigurationError::UnknownAlgorithmType {
                type_name: type_name.to_string(),
            }
        })?;

        let kind = config.kind.as_deref().unwrap_or("stub");
        match kind {
            "stub" => Ok(Box::new(StubAlgorithm::new(
                config.type_name.clone(),
                Self::outputs_of(config)?,
            ))),
            "cruncher" => Ok(Box::new(CruncherAlgorithm::new(
                config.type_name.clone(),
                Self::outputs_of(config)?,
                Self::delay_of(config),
            ))),
            "failing" => Ok(Box::new(FailingAlgorithm::new(config.type_name.clone()))),
            "panicking" => Ok(Box::new(PanickingAlgorithm::new(config.type_name.clone()))),
            "writer" => Ok(Box::new(WriterAlgorithm::new(config.type_name.clone()))),
            other => Err(ConfigurationError::ConstructionFailed {
                type_name: type_name.to_string(),
                reason: format!("unknown implementation kind '{}'", other),
            }),
        }
    }
}
