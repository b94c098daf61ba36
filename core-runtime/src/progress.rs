//! # Run Progress Tracking
//!
//! Per-run identifiers, lock-free phase counters and the [`ProgressReporter`]
//! every stage uses to publish events.
//!
//! Counters are plain `AtomicU64`s. Each stage only ever increments, so a
//! snapshot taken while stages run concurrently may be slightly stale but
//! never loses an increment.

use crate::events::{
    CoreEvent, EventBus, Phase, ProgressEvent, ProgressKind, RunFinished, RunOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the string representation of this ID
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Counters
// ============================================================================

/// Total/done pair for one phase
#[derive(Debug, Default)]
pub struct PhaseCounter {
    total: AtomicU64,
    done: AtomicU64,
}

impl PhaseCounter {
    /// Grow the total, returning the new value
    pub fn add_total(&self, n: u64) -> u64 {
        self.total.fetch_add(n, Ordering::SeqCst) + n
    }

    /// Count one finished item, returning the new done value
    pub fn mark_done(&self) -> u64 {
        self.done.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn done(&self) -> u64 {
        self.done.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

/// Counters of one run, shared by every stage
#[derive(Debug, Default)]
pub struct RunCounters {
    pub scan: PhaseCounter,
    pub copy: PhaseCounter,
    pub metadata: PhaseCounter,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter backing `phase`; run-level events have none
    pub fn phase(&self, phase: Phase) -> Option<&PhaseCounter> {
        match phase {
            Phase::Run => None,
            Phase::Scan => Some(&self.scan),
            Phase::Copy => Some(&self.copy),
            Phase::Metadata => Some(&self.metadata),
        }
    }

    /// `(done, total)` for `phase`
    pub fn snapshot(&self, phase: Phase) -> (u64, u64) {
        self.phase(phase)
            .map(|c| (c.done(), c.total()))
            .unwrap_or((0, 0))
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Publishes the events of a single run.
///
/// Cheap to clone; clones share the bus and the counters. Emitting never
/// fails: with no subscriber attached the event is dropped.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bus: EventBus,
    run_id: RunId,
    counters: Arc<RunCounters>,
}

impl ProgressReporter {
    pub fn new(bus: EventBus, run_id: RunId, counters: Arc<RunCounters>) -> Self {
        Self {
            bus,
            run_id,
            counters,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Informational status line
    pub fn status(&self, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        debug!(run_id = %self.run_id, phase = %phase, "{}", message);
        self.publish(phase, ProgressKind::Status, message, false);
    }

    /// Error not tied to a counted item
    pub fn error(&self, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        warn!(run_id = %self.run_id, phase = %phase, "{}", message);
        self.publish(phase, ProgressKind::Status, message, true);
    }

    /// A skipped file with an unrecognised extension
    pub fn unsupported(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(run_id = %self.run_id, "{}", message);
        self.publish(Phase::Scan, ProgressKind::Unsupported, message, false);
    }

    /// Scan totals line
    pub fn summary(&self, message: impl Into<String>) {
        let message = message.into();
        info!(run_id = %self.run_id, "{}", message);
        self.publish(Phase::Scan, ProgressKind::Summary, message, false);
    }

    /// Grow the phase total by `n`
    pub fn add_total(&self, phase: Phase, n: u64, message: impl Into<String>) {
        if let Some(counter) = self.counters.phase(phase) {
            counter.add_total(n);
        }
        self.publish(phase, ProgressKind::TotalUpdated, message.into(), false);
    }

    /// Count one item of `phase` as done and report it
    pub fn item_completed(&self, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        if let Some(counter) = self.counters.phase(phase) {
            counter.mark_done();
        }
        debug!(run_id = %self.run_id, phase = %phase, "{}", message);
        self.publish(phase, ProgressKind::ItemCompleted, message, false);
    }

    /// Count one item of `phase` as done and report its failure
    pub fn item_failed(&self, phase: Phase, message: impl Into<String>) {
        let message = message.into();
        if let Some(counter) = self.counters.phase(phase) {
            counter.mark_done();
        }
        warn!(run_id = %self.run_id, phase = %phase, "{}", message);
        self.publish(phase, ProgressKind::ItemFailed, message, true);
    }

    /// Emit the terminal event of the run
    pub fn finished(&self, outcome: RunOutcome, message: impl Into<String>) {
        let message = message.into();
        info!(run_id = %self.run_id, outcome = %outcome, "{}", message);
        self.bus
            .emit(CoreEvent::Finished(RunFinished {
                run_id: self.run_id,
                outcome,
                message,
            }))
            .ok();
    }

    fn publish(&self, phase: Phase, kind: ProgressKind, message: String, is_error: bool) {
        let (done, total) = self.counters.snapshot(phase);
        self.bus
            .emit(CoreEvent::Progress(ProgressEvent {
                run_id: self.run_id,
                phase,
                kind,
                message,
                is_error,
                done,
                total,
            }))
            .ok();
    }
}
