// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded pool of reusable algorithm instances.
//!
//! One idle queue exists per algorithm type. The scheduler acquires an
//! instance when it dispatches a task and the task returns it on completion,
//! so an instance is always either *idle* (in the queue) or *assigned* (lent
//! to exactly one task), never both and never neither. When the queue is empty
//! the pool creates a fresh instance through the factory collaborator, up to
//! the per-type cap; past the cap the caller gets [`Acquire::NotAvailable`]
//! and simply retries on a later scheduling tick.
//!
//! The pool is scoped to one run and passed around explicitly; it is not a
//! process-wide singleton.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::deps::DependencyTable;
use crate::errors::ConfigurationError;
use crate::observability::messages::pool::{InstanceCreated, InstanceMiss};
use crate::observability::messages::StructuredLog;
use crate::traits::{Algorithm, AlgorithmFactory};

/// Outcome of an acquire attempt.
///
/// `NotAvailable` is not an error: the per-type cap is reached and every
/// instance is assigned. The algorithm stays pending for a later tick.
#[derive(Debug)]
pub enum Acquire {
    Acquired(Box<dyn Algorithm>),
    NotAvailable,
}

struct PoolSlot {
    idle: VecDeque<Box<dyn Algorithm>>,
    created: usize,
}

struct PoolEntry {
    slot: Mutex<PoolSlot>,
    cap: usize,
}

/// Per-algorithm-type queues of idle, interchangeable instances.
pub struct AlgorithmPool {
    entries: HashMap<String, PoolEntry>,
    factory: Arc<dyn AlgorithmFactory>,
}

impl std::fmt::Debug for AlgorithmPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmPool")
            .field("types", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl AlgorithmPool {
    /// A pool over explicit `(type name, per-type cap)` pairs.
    pub fn new(
        types: impl IntoIterator<Item = (String, usize)>,
        factory: Arc<dyn AlgorithmFactory>,
    ) -> Self {
        let entries = types
            .into_iter()
            .map(|(type_name, cap)| {
                (
                    type_name,
                    PoolEntry {
                        slot: Mutex::new(PoolSlot {
                            idle: VecDeque::new(),
                            created: 0,
                        }),
                        // a cap of 0 could never dispatch anything
                        cap: cap.max(1),
                    },
                )
            })
            .collect();
        Self { entries, factory }
    }

    /// A pool covering every algorithm type in a dependency table, with one
    /// shared per-type cap.
    pub fn for_table(
        table: &DependencyTable,
        per_type_cap: usize,
        factory: Arc<dyn AlgorithmFactory>,
    ) -> Self {
        Self::new(
            table
                .descriptors()
                .iter()
                .map(|d| (d.type_name.clone(), per_type_cap)),
            factory,
        )
    }

    /// Take an idle instance of `type_name`, creating one if allowed.
    ///
    /// Fails only on configuration problems: a type the pool was never built
    /// for, or a factory that cannot construct it.
    pub fn acquire(
        &self,
        type_name: &str,
        create_if_absent: bool,
    ) -> Result<Acquire, ConfigurationError> {
        let entry = self.entries.get(type_name).ok_or_else(|| {
            ConfigurationError::UnknownAlgorithmType {
                type_name: type_name.to_string(),
            }
        })?;

        let mut slot = entry.slot.lock();
        if let Some(instance) = slot.idle.pop_front() {
            return Ok(Acquire::Acquired(instance));
        }

        if create_if_absent && slot.created < entry.cap {
            let instance = self.factory.construct(type_name)?;
            slot.created += 1;
            InstanceCreated {
                type_name,
                created: slot.created,
                cap: entry.cap,
            }
            .log();
            return Ok(Acquire::Acquired(instance));
        }

        InstanceMiss { type_name }.log();
        Ok(Acquire::NotAvailable)
    }

    /// Return a lent instance to its idle queue.
    ///
    /// Never blocks and never fails for instances the pool handed out; an
    /// instance of an unknown type is dropped with an error log.
    pub fn release(&self, type_name: &str, instance: Box<dyn Algorithm>) {
        match self.entries.get(type_name) {
            Some(entry) => entry.slot.lock().idle.push_back(instance),
            None => {
                tracing::error!(
                    type_name,
                    "released instance of a type the pool does not manage"
                );
            }
        }
    }

    /// Instances ever created for a type.
    pub fn ever_created(&self, type_name: &str) -> usize {
        self.entries
            .get(type_name)
            .map(|e| e.slot.lock().created)
            .unwrap_or(0)
    }

    /// Instances currently idle for a type.
    pub fn idle_count(&self, type_name: &str) -> usize {
        self.entries
            .get(type_name)
            .map(|e| e.slot.lock().idle.len())
            .unwrap_or(0)
    }
}
