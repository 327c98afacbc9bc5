// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AlgorithmError;
use crate::registry::RegistrySlot;
use crate::traits::{Algorithm, EventContext};

/// A stub algorithm for testing and placeholder purposes: publishes its
/// configured outputs and does nothing else.
#[derive(Debug)]
pub struct StubAlgorithm {
    type_name: String,
    outputs: Vec<String>,
}

impl StubAlgorithm {
    pub fn new(type_name: String, outputs: Vec<String>) -> Self {
        Self { type_name, outputs }
    }
}

#[async_trait]
impl Algorithm for StubAlgorithm {
    async fn execute(
        &mut self,
        ctx: &EventContext,
        registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError> {
        for output in &self.outputs {
            registry.add_value(output, ctx.event_number)?;
        }
        Ok(())
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// An algorithm that always reports failure, for failure-path scenarios.
#[derive(Debug)]
pub struct FailingAlgorithm {
    type_name: String,
}

impl FailingAlgorithm {
    pub fn new(type_name: String) -> Self {
        Self { type_name }
    }
}

#[async_trait]
impl Algorithm for FailingAlgorithm {
    async fn execute(
        &mut self,
        _ctx: &EventContext,
        _registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError> {
        Err(AlgorithmError::new("simulated algorithm failure"))
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// An algorithm that panics in its task body, for wrapper-containment
/// scenarios.
#[derive(Debug)]
pub struct PanickingAlgorithm {
    type_name: String,
}

impl PanickingAlgorithm {
    pub fn new(type_name: String) -> Self {
        Self { type_name }
    }
}

#[async_trait]
impl Algorithm for PanickingAlgorithm {
    async fn execute(
        &mut self,
        _ctx: &EventContext,
        _registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError> {
        panic!("simulated algorithm panic");
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
