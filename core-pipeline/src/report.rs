//! Run report returned to the caller

use chrono::{DateTime, Utc};
use core_runtime::events::RunOutcome;
use core_runtime::progress::RunId;
use core_scanner::ScanSummary;
use serde::Serialize;
use std::fmt;

/// Counters of the copy stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    pub copied: u64,
    /// Targets left untouched because overwriting was disabled
    pub kept_existing: u64,
    pub failed: u64,
}

/// Counters of the metadata stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetadataStats {
    pub updated: u64,
    pub failed: u64,
    /// Items never sent to the tool: no sidecar, sidecar gone, or not copied
    pub skipped: u64,
}

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub outcome: RunOutcome,
    pub summary: ScanSummary,
    pub copied: u64,
    pub kept_existing: u64,
    pub copy_failed: u64,
    pub updated: u64,
    pub update_failed: u64,
    pub skipped: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub(crate) fn new(
        run_id: RunId,
        outcome: RunOutcome,
        summary: ScanSummary,
        copy: CopyStats,
        metadata: MetadataStats,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            outcome,
            summary,
            copied: copy.copied,
            kept_existing: copy.kept_existing,
            copy_failed: copy.failed,
            updated: metadata.updated,
            update_failed: metadata.failed,
            skipped: metadata.skipped,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn failures(&self) -> u64 {
        self.copy_failed + self.update_failed
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// One-line tally, readable even when item events were missed
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} copied, {} kept, {} updated, {} skipped, {} failed to copy, {} failed to update.",
            self.copied,
            self.kept_existing,
            self.updated,
            self.skipped,
            self.copy_failed,
            self.update_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_failures() {
        let report = RunReport::new(
            RunId::new(),
            RunOutcome::Completed,
            ScanSummary::default(),
            CopyStats {
                copied: 3,
                kept_existing: 1,
                failed: 1,
            },
            MetadataStats {
                updated: 2,
                failed: 2,
                skipped: 1,
            },
            Utc::now(),
        );

        assert_eq!(report.failures(), 3);
        assert_eq!(
            report.to_string(),
            "3 copied, 1 kept, 2 updated, 1 skipped, 1 failed to copy, 2 failed to update."
        );
        assert!(report.elapsed() >= chrono::Duration::zero());
    }
}
