// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Two-phase teardown of the shared tool graph.
//!
//! Tools are jointly owned: every component that retrieved one holds an
//! `Arc`, and tools may hold `Arc`s to each other, including in cycles. A
//! naive finalize-then-drop walk can call into an already-destroyed tool, or
//! orphan tools whose count never reaches the registry-only value through
//! ordinary releases. The sweep below separates finalization from
//! destruction:
//!
//! **Phase 1, finalize without deleting.** Compute the total reference
//! count and the minimum reference count across all unfinalized tools.
//! Finalize every tool whose count is at or below the minimum (arrival order
//! breaks ties) and move it to a finalized-but-alive list; a tool calling
//! into it from its own `finalize` still finds a live object. Recompute and
//! repeat until a full sweep changes neither total nor minimum. Least-
//! referenced tools (the users, not the used) go first.
//!
//! **Phase 2, delete.** Pop the front of the finalized list; a count of
//! exactly 1 means only the registry holds the tool, so dropping the handle
//! destroys it, which may transitively release references to other finalized
//! tools. Any other count sends it to the back for another try. Retries are
//! bounded by the summed reference counts plus one; survivors are reported
//! by name as a stuck condition instead of looping forever.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ConfigurationError;
use crate::observability::messages::tools::{
    FinalizationStarted, FinalizationStuck, ToolFinalizeFailed, ToolFinalized,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Tool, ToolFactory};

/// One finalized tool, with its live reference count at finalize time.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedEntry {
    pub name: String,
    pub references: usize,
}

/// Outcome of a full finalization sweep.
#[derive(Debug, Default)]
pub struct FinalizationReport {
    /// Tools finalized, in finalization order.
    pub finalized: Vec<FinalizedEntry>,
    /// Tools whose finalize step returned an error.
    pub finalize_failed: Vec<String>,
    /// Tools phase 1 never reached (their count never hit the minimum).
    pub never_finalized: Vec<String>,
    /// Tools phase 2 could not delete within the retry bound.
    pub never_deleted: Vec<String>,
}

impl FinalizationReport {
    /// Every tool finalized and deleted, with no finalize errors.
    pub fn is_clean(&self) -> bool {
        self.finalize_failed.is_empty()
            && self.never_finalized.is_empty()
            && self.never_deleted.is_empty()
    }

    /// Whether the phase-2 retry bound was exhausted.
    pub fn stuck(&self) -> bool {
        !self.never_deleted.is_empty()
    }
}

/// Registry of shared tools, scoped to one run.
///
/// Registration order is remembered: it breaks ties in the finalization
/// sweep. `retrieve` hands out a clone of the registered `Arc`, which is
/// exactly what makes the holder a joint owner.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.len())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an externally constructed tool.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Clone out the handle of a registered tool, bumping its live count.
    pub fn retrieve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Retrieve an existing tool or construct and register it on first use.
    pub fn retrieve_or_create(
        &mut self,
        type_name: &str,
        factory: &dyn ToolFactory,
    ) -> Result<Arc<dyn Tool>, ConfigurationError> {
        if let Some(tool) = self.retrieve(type_name) {
            return Ok(tool);
        }
        let tool = factory.construct(type_name)?;
        self.tools.push(Arc::clone(&tool));
        Ok(tool)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run the two-phase sweep, consuming the registry.
    pub fn finalize_all(self) -> FinalizationReport {
        let mut report = FinalizationReport::default();
        let mut remaining: VecDeque<Arc<dyn Tool>> = self.tools.into();

        FinalizationStarted {
            tool_count: remaining.len(),
            total_references: total_references(&remaining),
        }
        .log();

        // Phase 1: finalize in fixed-point sweeps, never deleting, so a tool
        // that calls into another from its finalize still finds it alive.
        let mut finalized_alive: VecDeque<Arc<dyn Tool>> = VecDeque::new();
        let mut start_total = 0usize;
        let mut start_min = 0usize;
        let mut end_total = total_references(&remaining);
        let mut end_min = minimum_references(&remaining);

        while !remaining.is_empty() && (end_total != start_total || end_min != start_min) {
            start_total = end_total;
            start_min = end_min;

            let mut kept = VecDeque::with_capacity(remaining.len());
            while let Some(tool) = remaining.pop_front() {
                let references = Arc::strong_count(&tool);
                if references <= start_min {
                    let name = tool.name().to_string();
                    ToolFinalized {
                        tool_name: &name,
                        references,
                    }
                    .log();
                    // a failing finalize is counted, never aborts the sweep
                    if let Err(error) = tool.finalize() {
                        ToolFinalizeFailed {
                            tool_name: &name,
                            error: &error,
                        }
                        .log();
                        report.finalize_failed.push(name.clone());
                    }
                    report.finalized.push(FinalizedEntry { name, references });
                    finalized_alive.push_back(tool);
                } else {
                    kept.push_back(tool);
                }
            }
            remaining = kept;
            end_total = total_references(&remaining);
            end_min = minimum_references(&remaining);
        }

        report.never_finalized = remaining.iter().map(|t| t.name().to_string()).collect();

        // Phase 2: drop registry handles of tools held by nobody else. Each
        // drop may destroy the tool and transitively release references on
        // still-queued tools, so keep cycling within the bound.
        let mut retries = total_references(&finalized_alive) + 1;
        while retries > 0 && !finalized_alive.is_empty() {
            retries -= 1;
            if let Some(tool) = finalized_alive.pop_front() {
                if Arc::strong_count(&tool) == 1 {
                    drop(tool);
                } else {
                    finalized_alive.push_back(tool);
                }
            }
        }

        report.never_deleted = finalized_alive
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        if report.stuck() {
            FinalizationStuck {
                survivors: &report.never_deleted,
            }
            .log();
        }

        report
    }
}

fn total_references(tools: &VecDeque<Arc<dyn Tool>>) -> usize {
    tools.iter().map(Arc::strong_count).sum()
}

fn minimum_references(tools: &VecDeque<Arc<dyn Tool>>) -> usize {
    tools.iter().map(Arc::strong_count).min().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use parking_lot::Mutex;

    /// Test tool that optionally holds another tool and can call into it /
    /// release it during finalize.
    struct ChainTool {
        name: String,
        held: Mutex<Option<Arc<dyn Tool>>>,
        release_on_finalize: bool,
        fail_finalize: bool,
        touched: Arc<Mutex<Vec<String>>>,
    }

    impl ChainTool {
        fn new(name: &str, touched: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name: name.to_string(),
                held: Mutex::new(None),
                release_on_finalize: true,
                fail_finalize: false,
                touched,
            }
        }

        fn hold(&self, tool: Arc<dyn Tool>) {
            *self.held.lock() = Some(tool);
        }
    }

    impl Tool for ChainTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn finalize(&self) -> Result<(), ToolError> {
            // call into the held tool while it is guaranteed alive
            if let Some(held) = self.held.lock().as_ref() {
                self.touched
                    .lock()
                    .push(format!("{}->{}", self.name, held.name()));
            }
            if self.release_on_finalize {
                *self.held.lock() = None;
            }
            if self.fail_finalize {
                return Err(ToolError::new("deliberate finalize failure"));
            }
            Ok(())
        }
    }

    fn order(report: &FinalizationReport) -> Vec<&str> {
        report.finalized.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn chain_finalizes_holders_before_held() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let c = Arc::new(ChainTool::new("c", Arc::clone(&touched)));
        let b = Arc::new(ChainTool::new("b", Arc::clone(&touched)));
        let a = Arc::new(ChainTool::new("a", Arc::clone(&touched)));
        // a holds b, b holds c
        a.hold(b.clone() as Arc<dyn Tool>);
        b.hold(c.clone() as Arc<dyn Tool>);

        let mut registry = ToolRegistry::new();
        // registration consumes the local handles, so the registry and the
        // chain hold the only references: a=1, b=2, c=2
        registry.register(c as Arc<dyn Tool>);
        registry.register(b as Arc<dyn Tool>);
        registry.register(a as Arc<dyn Tool>);

        let report = registry.finalize_all();

        assert_eq!(order(&report), vec!["a", "b", "c"]);
        // each finalize found its held tool alive
        assert_eq!(*touched.lock(), vec!["a->b", "b->c"]);
        // reference counts at finalize time never increase along the sweep
        let counts: Vec<usize> = report.finalized.iter().map(|e| e.references).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{:?}", counts);
        assert!(report.is_clean());
    }

    #[test]
    fn releasing_cycle_drains_completely() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let tools: Vec<Arc<ChainTool>> = (0..5)
            .map(|i| Arc::new(ChainTool::new(&format!("t{}", i), Arc::clone(&touched))))
            .collect();
        // each holds the next, and the last holds the first
        for (i, tool) in tools.iter().enumerate() {
            tool.hold(tools[(i + 1) % tools.len()].clone() as Arc<dyn Tool>);
        }

        let mut registry = ToolRegistry::new();
        for tool in &tools {
            registry.register(tool.clone() as Arc<dyn Tool>);
        }
        drop(tools);

        let report = registry.finalize_all();

        assert_eq!(report.finalized.len(), 5);
        assert!(report.is_clean());
        assert!(!report.stuck());
    }

    #[test]
    fn unreleased_cycle_is_reported_stuck_not_looped() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let tools: Vec<Arc<ChainTool>> = (0..3)
            .map(|i| {
                let mut tool = ChainTool::new(&format!("t{}", i), Arc::clone(&touched));
                tool.release_on_finalize = false;
                Arc::new(tool)
            })
            .collect();
        for (i, tool) in tools.iter().enumerate() {
            tool.hold(tools[(i + 1) % tools.len()].clone() as Arc<dyn Tool>);
        }

        let mut registry = ToolRegistry::new();
        for tool in &tools {
            registry.register(tool.clone() as Arc<dyn Tool>);
        }
        drop(tools);

        let report = registry.finalize_all();

        // every tool is finalized (counts are uniform), none can be deleted
        assert_eq!(report.finalized.len(), 3);
        let mut stuck = report.never_deleted.clone();
        stuck.sort();
        assert_eq!(stuck, vec!["t0", "t1", "t2"]);
        assert!(report.stuck());
    }

    #[test]
    fn finalize_failure_is_counted_and_sweep_continues() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let good = Arc::new(ChainTool::new("good", Arc::clone(&touched)));
        let mut bad = ChainTool::new("bad", Arc::clone(&touched));
        bad.fail_finalize = true;
        let bad = Arc::new(bad);

        let mut registry = ToolRegistry::new();
        registry.register(bad as Arc<dyn Tool>);
        registry.register(good as Arc<dyn Tool>);

        let report = registry.finalize_all();

        assert_eq!(report.finalized.len(), 2);
        assert_eq!(report.finalize_failed, vec!["bad"]);
        assert!(report.never_deleted.is_empty());
    }

    #[test]
    fn solo_tools_finalize_in_arrival_order() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ToolRegistry::new();
        for name in ["first", "second", "third"] {
            registry.register(Arc::new(ChainTool::new(name, Arc::clone(&touched))));
        }

        let report = registry.finalize_all();
        assert_eq!(order(&report), vec!["first", "second", "third"]);
        assert!(report.is_clean());
    }

    #[test]
    fn retrieve_bumps_the_live_count() {
        let touched = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ChainTool::new("shared", Arc::clone(&touched))));

        let held = registry.retrieve("shared").unwrap();
        assert_eq!(Arc::strong_count(&held), 2);
        assert!(registry.retrieve("absent").is_none());

        // while a component holds the tool, phase 2 cannot delete it
        let report = registry.finalize_all();
        assert_eq!(report.finalized.len(), 1);
        assert_eq!(report.never_deleted, vec!["shared"]);
    }
}
