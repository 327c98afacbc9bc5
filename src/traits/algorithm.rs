// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::AlgorithmError;
use crate::registry::RegistrySlot;

/// Per-event execution context handed to an algorithm together with the
/// event's registry slot.
///
/// The scheduler owns the context for the lifetime of the event; algorithms
/// receive a shared reference for the duration of one `execute` call.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Monotonic number of the event within the run.
    pub event_number: u64,
    /// Index of the processing slot the event occupies.
    pub slot_index: usize,
}

/// A processing unit with declared data inputs, instantiated from the pool.
///
/// Instances are exclusive: the pool lends an instance to exactly one task at
/// a time, which is why `execute` takes `&mut self`. Implementations publish
/// their products into the event's registry slot and read their inputs from
/// it; they must not hold on to the slot beyond the call.
#[async_trait]
pub trait Algorithm: Send + std::fmt::Debug {
    /// Run the algorithm body for one event.
    async fn execute(
        &mut self,
        ctx: &EventContext,
        registry: Arc<RegistrySlot>,
    ) -> Result<(), AlgorithmError>;

    /// The type name this instance was constructed under.
    fn type_name(&self) -> &str;
}
