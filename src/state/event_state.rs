// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-event scheduling progress.
//!
//! One tracker exists per in-flight event and is owned by the controlling
//! loop. The started-vector and the produced-bitset are plain fields mutated
//! only from that loop; the in-flight/finished counters are the one piece of
//! per-event state touched from worker threads (a task's completion path),
//! so they live in a separately shared atomic block. Once a flag or bit is
//! set it is never cleared.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::deps::ProductMask;

/// The atomic half of the tracker, shared with worker tasks.
#[derive(Debug)]
pub struct ExecutionCounters {
    total: usize,
    in_flight: AtomicUsize,
    finished: AtomicUsize,
}

impl ExecutionCounters {
    fn new(total: usize) -> Self {
        Self {
            total,
            in_flight: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    /// Record a task completion. Invoked from the worker thread that ran the
    /// algorithm body, which is why this is atomic.
    pub fn algo_finished(&self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        self.finished.fetch_add(1, Ordering::AcqRel);
    }

    /// Number of this event's algorithms currently executing.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of this event's algorithms that have completed.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    /// Whether every scheduled algorithm of the event has completed.
    pub fn all_finished(&self) -> bool {
        self.finished() == self.total
    }

    fn algo_started(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }
}

/// Per-event record of which algorithms have started and which products have
/// appeared.
#[derive(Debug)]
pub struct EventStateTracker {
    started: Vec<bool>,
    produced: ProductMask,
    counters: Arc<ExecutionCounters>,
}

impl EventStateTracker {
    /// A fresh tracker for an event where every algorithm is dispatched by
    /// data flow.
    pub fn new(total_algorithms: usize) -> Self {
        Self::with_scheduled(total_algorithms, total_algorithms)
    }

    /// A tracker sized for `algorithm_count` roster entries of which
    /// `scheduled_count` are dispatched by data flow; completion means all
    /// of the scheduled ones finished. Output-stage algorithms occupy roster
    /// indices but run outside the tracker's lifecycle.
    pub fn with_scheduled(algorithm_count: usize, scheduled_count: usize) -> Self {
        Self {
            started: vec![false; algorithm_count],
            produced: ProductMask::new(),
            counters: Arc::new(ExecutionCounters::new(scheduled_count)),
        }
    }

    /// Mark algorithm `index` started and count it in flight.
    ///
    /// The scheduler must never call this twice for the same index; the
    /// started flag is exactly what it consults before dispatching.
    pub fn algo_starts(&mut self, index: usize) {
        debug_assert!(!self.started[index], "algorithm {} started twice", index);
        self.started[index] = true;
        self.counters.algo_started();
    }

    pub fn has_started(&self, index: usize) -> bool {
        self.started[index]
    }

    /// Whether every scheduled algorithm has completed.
    pub fn has_finished(&self) -> bool {
        self.counters.all_finished()
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight()
    }

    /// Record the appearance of a product for this event.
    pub fn update_state(&mut self, product_index: usize) {
        self.produced.set(product_index);
    }

    pub fn produced(&self) -> &ProductMask {
        &self.produced
    }

    /// Shared handle to the atomic counters for a task's completion path.
    pub fn counters(&self) -> Arc<ExecutionCounters> {
        Arc::clone(&self.counters)
    }
}
