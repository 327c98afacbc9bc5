// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AlgorithmError;
use crate::registry::RegistrySlot;
use crate::traits::{Algorithm, EventContext};

/// Output-stage algorithm: snapshots the completed event's registry.
///
/// Runs synchronously on the controlling loop after every data-flow
/// algorithm of the event has finished, standing in for the persistence
/// stage of a real job (actual serialization is a collaborator concern).
#[derive(Debug)]
pub struct WriterAlgorithm {
    type_name: String,
}

impl WriterAlgorithm {
    pub fn new(type_name: String) -> Self {
        Self { type_name }
    }
}

#[async_trait]
impl Algorithm for WriterAlgorithm {
    async fn execute(
        &mut self,
        ctx: &EventContext,
        registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError> {
        let mut paths = registry.object_paths();
        paths.sort();
        tracing::debug!(
            event_number = ctx.event_number,
            object_count = paths.len(),
            objects = ?paths,
            "event output snapshot"
        );
        Ok(())
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}
