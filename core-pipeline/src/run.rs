//! # Run State Machine
//!
//! ```text
//! Idle → Scanning → Transferring → Idle
//!           │                       ↑
//!           └───────────────────────┘  (scan-only, cancellation, fatal error)
//! ```

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the orchestrator is in its run cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    #[default]
    Idle,
    Scanning,
    Transferring,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::Scanning => "scanning",
            RunPhase::Transferring => "transferring",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase with validated transitions
#[derive(Debug, Default)]
pub struct RunTracker {
    phase: RunPhase,
}

impl RunTracker {
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == RunPhase::Idle
    }

    /// Move to `to`, rejecting transitions outside the cycle
    pub fn transition(&mut self, to: RunPhase) -> Result<()> {
        let valid = matches!(
            (self.phase, to),
            (RunPhase::Idle, RunPhase::Scanning)
                | (RunPhase::Scanning, RunPhase::Transferring)
                | (RunPhase::Scanning, RunPhase::Idle)
                | (RunPhase::Transferring, RunPhase::Idle)
        );

        if !valid {
            return Err(PipelineError::InvalidStateTransition {
                from: self.phase.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!("Cannot transition from {} to {}", self.phase, to),
            });
        }

        self.phase = to;
        Ok(())
    }

    /// Return to `Idle` from wherever the run stopped
    pub fn reset(&mut self) {
        self.phase = RunPhase::Idle;
    }
}
