// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-driven concurrent event loop.
//!
//! The scheduler admits events into a bounded set of processing slots and
//! dispatches each algorithm only once its declared input products exist for
//! that event. Many events are in flight at once; algorithm bodies run as
//! tasks on the shared tokio worker pool while the loop below stays on a
//! single controlling task that never blocks.
//!
//! # Execution Flow
//!
//! Each run moves through **Admitting** → **Scheduling** → **Retiring** →
//! **Done**, folded into one polling tick:
//!
//! 1. **Admission**: while a slot is free and the event budget allows, bind
//!    a new event context, tracker and registry slot.
//! 2. **Dispatch scan**: for every in-flight event and every not-yet-started
//!    algorithm, compare the event's produced-bitset against the algorithm's
//!    requirement mask; on a match (and below the global task cap) acquire
//!    an instance from the pool and spawn the task. A pool miss is not an
//!    error; the pair is simply retried on a later tick.
//! 3. **Drain**: pop every newly published product path from each event's
//!    registry queue and fold it into that event's produced-bitset.
//! 4. **Retirement**: an event whose tracker reports all algorithms finished
//!    runs its output-stage algorithms synchronously and frees its slot. An
//!    event that can make no further progress (nothing running, nothing
//!    data-ready, nothing drained) is stalled and retired with a failure
//!    record instead of wedging the run.
//! 5. **Yield**: sleep briefly and poll again.
//!
//! The readiness scan is a deliberate O(events × algorithms) poll per tick.
//! For rosters in the tens to low hundreds of algorithms this is cheap,
//! keeps all per-event state single-writer, and avoids any ordering promise
//! among simultaneously ready algorithms.
//!
//! # Concurrency
//!
//! The controlling loop is the only writer of started-vectors and
//! produced-bitsets. Worker tasks touch exactly three shared things: the
//! per-event product queue (multi-producer channel), the per-event atomic
//! completion counters, and the pool's idle queues. Task completion, on the
//! worker thread, records any failure, returns the instance to the pool and
//! decrements the counters; the loop observes the effects on its next tick.
//!
//! # Failure handling
//!
//! A task body that returns an error or panics is caught by the task
//! wrapper and recorded against its event; the event keeps processing
//! whatever does not depend on the missing output and retires through the
//! stall path. Failures never cross events. Only configuration errors (an
//! unknown type name reaching the factory) abort the run itself.
//!
//! # Cancellation
//!
//! [`Scheduler::abort_handle`] exposes a cancellation token. Once cancelled,
//! no further event is admitted and no further algorithm dispatched;
//! already-running tasks complete and every in-flight event is drained to
//! retirement before `run` returns with `aborted` set in the report.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::{RunOptions, Stage};
use crate::deps::DependencyTable;
use crate::errors::{ConfigurationError, ExecutionFailure};
use crate::observability::messages::scheduler::{
    EventAdmitted, EventRetired, EventStalled, RunCompleted, RunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::pool::{Acquire, AlgorithmPool};
use crate::registry::RegistrySlot;
use crate::scheduler::report::{EventFailureRecord, RunReport};
use crate::state::{EventStateTracker, ExecutionCounters};
use crate::traits::{Algorithm, EventContext};

/// Interval between polling ticks of the controlling loop.
const TICK: Duration = Duration::from_millis(1);

/// One in-flight event: context, progress tracking, whiteboard, failures.
struct EventSlot {
    ctx: EventContext,
    tracker: EventStateTracker,
    registry: Arc<RegistrySlot>,
    failures: Arc<Mutex<Vec<ExecutionFailure>>>,
}

impl EventSlot {
    fn new(ctx: EventContext, table: &DependencyTable) -> Self {
        Self {
            ctx,
            tracker: EventStateTracker::with_scheduled(table.len(), table.processing_count()),
            registry: Arc::new(RegistrySlot::new()),
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// The dependency-driven concurrent scheduler.
///
/// Owns one [`EventSlot`] per in-flight event for the duration of a run,
/// consults the [`DependencyTable`] for readiness, and borrows instances
/// from the [`AlgorithmPool`] for dispatch. Scoped to one run configuration;
/// construct another for the next job.
#[derive(Debug)]
pub struct Scheduler {
    table: Arc<DependencyTable>,
    pool: Arc<AlgorithmPool>,
    max_events_in_flight: usize,
    max_concurrent_tasks: usize,
    cancellation: CancellationToken,
    tasks_in_flight: Arc<AtomicUsize>,
}

impl Scheduler {
    pub fn new(
        table: Arc<DependencyTable>,
        pool: Arc<AlgorithmPool>,
        options: &RunOptions,
    ) -> Self {
        Self {
            table,
            pool,
            max_events_in_flight: options.max_events_in_flight.max(1),
            max_concurrent_tasks: options.max_concurrent_tasks.max(1),
            cancellation: CancellationToken::new(),
            tasks_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Token that stops admission and dispatch when cancelled.
    ///
    /// Already-dispatched tasks run to completion; in-flight events are
    /// drained to retirement before `run` returns.
    pub fn abort_handle(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Process up to `max_events` events and report the outcome.
    ///
    /// Fails only on configuration errors surfaced by the pool or factory;
    /// per-event execution failures are recorded in the report instead.
    pub async fn run(&self, max_events: u64) -> Result<RunReport, ConfigurationError> {
        let started_at = Instant::now();
        RunStarted {
            max_events,
            max_events_in_flight: self.max_events_in_flight,
            max_concurrent_tasks: self.max_concurrent_tasks,
            algorithm_count: self.table.len(),
        }
        .log();

        let mut report = RunReport::default();
        let mut slots: Vec<Option<EventSlot>> =
            (0..self.max_events_in_flight).map(|_| None).collect();
        let mut next_event: u64 = 0;

        loop {
            // === ADMISSION ===
            // Bind new events to free slots while the budget allows.
            if !self.cancellation.is_cancelled() {
                for (slot_index, slot) in slots.iter_mut().enumerate() {
                    if next_event >= max_events {
                        break;
                    }
                    if slot.is_none() {
                        let ctx = EventContext {
                            event_number: next_event,
                            slot_index,
                        };
                        EventAdmitted {
                            event_number: next_event,
                            slot_index,
                        }
                        .log();
                        *slot = Some(EventSlot::new(ctx, &self.table));
                        report.events_admitted += 1;
                        next_event += 1;
                    }
                }
            }

            // === DISPATCH SCAN ===
            // Poll every (event × unstarted algorithm) pair for readiness.
            if !self.cancellation.is_cancelled() {
                'events: for slot in slots.iter_mut().flatten() {
                    for descriptor in self.table.descriptors() {
                        if descriptor.stage != Stage::Processing
                            || slot.tracker.has_started(descriptor.index)
                            || !slot.tracker.produced().contains(&descriptor.requirements)
                        {
                            continue;
                        }
                        if self.tasks_in_flight.load(Ordering::Acquire)
                            >= self.max_concurrent_tasks
                        {
                            break 'events;
                        }
                        match self.pool.acquire(&descriptor.type_name, true)? {
                            Acquire::Acquired(instance) => {
                                slot.tracker.algo_starts(descriptor.index);
                                self.tasks_in_flight.fetch_add(1, Ordering::AcqRel);
                                self.spawn_task(
                                    instance,
                                    descriptor.type_name.clone(),
                                    slot.ctx.clone(),
                                    Arc::clone(&slot.registry),
                                    slot.tracker.counters(),
                                    Arc::clone(&slot.failures),
                                );
                            }
                            Acquire::NotAvailable => {
                                // pool cap reached; retry on a later tick
                            }
                        }
                    }
                }
            }

            // === DRAIN & RETIREMENT ===
            for slot_opt in slots.iter_mut() {
                let retire = match slot_opt.as_mut() {
                    None => false,
                    Some(slot) => {
                        // Read in-flight before draining: a completing task
                        // publishes its products before it decrements, so an
                        // idle-then-empty drain proves nothing is pending.
                        let was_idle = slot.tracker.in_flight() == 0;

                        let drained = slot.registry.drain();
                        let progressed = !drained.is_empty();
                        for path in drained {
                            match self.table.product_index(&path) {
                                Some(index) => slot.tracker.update_state(index),
                                None => {
                                    tracing::trace!(path = %path, "product has no declared consumer")
                                }
                            }
                        }

                        if slot.tracker.has_finished() {
                            self.run_output_stage(slot).await?;
                            true
                        } else if was_idle && !progressed {
                            let ready_exists = self.table.descriptors().iter().any(|d| {
                                d.stage == Stage::Processing
                                    && !slot.tracker.has_started(d.index)
                                    && slot.tracker.produced().contains(&d.requirements)
                            });
                            if self.cancellation.is_cancelled() || !ready_exists {
                                // Nothing running, nothing to start, nothing
                                // drained: the event can never finish.
                                let never_ran: Vec<String> = self
                                    .table
                                    .descriptors()
                                    .iter()
                                    .filter(|d| {
                                        d.stage == Stage::Processing
                                            && !slot.tracker.has_started(d.index)
                                    })
                                    .map(|d| d.type_name.clone())
                                    .collect();
                                EventStalled {
                                    event_number: slot.ctx.event_number,
                                    never_ran: &never_ran,
                                }
                                .log();
                                slot.failures
                                    .lock()
                                    .push(ExecutionFailure::Stalled { never_ran });
                                true
                            } else {
                                false
                            }
                        } else {
                            false
                        }
                    }
                };

                if retire {
                    if let Some(slot) = slot_opt.take() {
                        let failures = std::mem::take(&mut *slot.failures.lock());
                        EventRetired {
                            event_number: slot.ctx.event_number,
                            failure_count: failures.len(),
                        }
                        .log();
                        if failures.is_empty() {
                            report.events_finished += 1;
                        } else {
                            report.failed_events.push(EventFailureRecord {
                                event_number: slot.ctx.event_number,
                                failures,
                            });
                        }
                    }
                }
            }

            // === TERMINATION CHECK ===
            let events_in_flight = slots.iter().filter(|s| s.is_some()).count();
            let admission_done =
                next_event >= max_events || self.cancellation.is_cancelled();
            if admission_done && events_in_flight == 0 {
                break;
            }

            // === YIELD ===
            tokio::time::sleep(TICK).await;
        }

        report.aborted = self.cancellation.is_cancelled();
        RunCompleted {
            events_finished: report.events_finished,
            events_failed: report.failed_events.len(),
            aborted: report.aborted,
            duration: started_at.elapsed(),
        }
        .log();
        Ok(report)
    }

    /// Submit one algorithm body to the shared worker pool.
    ///
    /// The tail of the spawned task is the completion callback: it runs on
    /// the worker thread, records any failure, returns the instance to the
    /// pool and only then decrements the counters.
    fn spawn_task(
        &self,
        instance: Box<dyn Algorithm>,
        type_name: String,
        ctx: EventContext,
        registry: Arc<RegistrySlot>,
        counters: Arc<ExecutionCounters>,
        failures: Arc<Mutex<Vec<ExecutionFailure>>>,
    ) {
        let pool = Arc::clone(&self.pool);
        let tasks_in_flight = Arc::clone(&self.tasks_in_flight);

        tokio::spawn(async move {
            let mut instance = instance;
            let outcome = AssertUnwindSafe(instance.execute(&ctx, Arc::clone(&registry)))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    failures.lock().push(ExecutionFailure::AlgorithmError {
                        algorithm: type_name.clone(),
                        message: error.to_string(),
                    });
                }
                Err(payload) => {
                    failures.lock().push(ExecutionFailure::AlgorithmPanic {
                        algorithm: type_name.clone(),
                        message: panic_message(payload),
                    });
                }
            }

            pool.release(&type_name, instance);
            counters.algo_finished();
            tasks_in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }

    /// Run the event's output-stage algorithms on the controlling loop.
    ///
    /// Output algorithms see the completed event; their failures are
    /// recorded like any other. Skipped when the event already failed.
    async fn run_output_stage(&self, slot: &EventSlot) -> Result<(), ConfigurationError> {
        if !slot.failures.lock().is_empty() {
            return Ok(());
        }

        for descriptor in self.table.descriptors() {
            if descriptor.stage != Stage::Output {
                continue;
            }
            match self.pool.acquire(&descriptor.type_name, true)? {
                Acquire::Acquired(mut instance) => {
                    let outcome = AssertUnwindSafe(
                        instance.execute(&slot.ctx, Arc::clone(&slot.registry)),
                    )
                    .catch_unwind()
                    .await;
                    match outcome {
                        Ok(Ok(())) => {}
                        Ok(Err(error)) => {
                            slot.failures.lock().push(ExecutionFailure::AlgorithmError {
                                algorithm: descriptor.type_name.clone(),
                                message: error.to_string(),
                            });
                        }
                        Err(payload) => {
                            slot.failures.lock().push(ExecutionFailure::AlgorithmPanic {
                                algorithm: descriptor.type_name.clone(),
                                message: panic_message(payload),
                            });
                        }
                    }
                    self.pool.release(&descriptor.type_name, instance);
                }
                Acquire::NotAvailable => {
                    // output algorithms only ever run here, sequentially, so
                    // a miss means the cap was consumed elsewhere
                    slot.failures.lock().push(ExecutionFailure::AlgorithmError {
                        algorithm: descriptor.type_name.clone(),
                        message: "no idle instance for output stage".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
