// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AlgorithmError;
use crate::registry::RegistrySlot;
use crate::traits::{Algorithm, EventContext};

/// The standard workload for scheduling demos and tests: holds its execution
/// slot for a configurable time, then publishes its configured outputs.
///
/// The delay makes pool caps and the global task cap observable; with a
/// zero delay every algorithm completes within one tick and nothing ever
/// contends.
#[derive(Debug)]
pub struct CruncherAlgorithm {
    type_name: String,
    outputs: Vec<String>,
    crunch_for: Duration,
}

impl CruncherAlgorithm {
    pub fn new(type_name: String, outputs: Vec<String>, crunch_for: Duration) -> Self {
        Self {
            type_name,
            outputs,
            crunch_for,
        }
    }
}

#[async_trait]
impl Algorithm for CruncherAlgorithm {
    async fn execute(
        &mut self,
        ctx: &EventContext,
        registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError> {
        if !self.crunch_for.is_zero() {
            tokio::time::sleep(self.crunch_for).await;
        }
        for output in &self.outputs {
            registry.add_value(output, ctx.event_number)?;
        }
        Ok(())
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
