//! # Pipeline Orchestrator
//!
//! Drives one run at a time through scan, copy and metadata update.
//!
//! ## Workflow
//!
//! 1. Validate the config and resolve the metadata tool
//! 2. Scan the input tree into work items
//! 3. Stop here for scan-only runs
//! 4. Run the copy and metadata stages concurrently, joined by a bounded
//!    hand-off queue
//! 5. Emit the terminal [`RunFinished`](core_runtime::events::RunFinished)
//!    event, whatever happened before

use crate::copy_stage::{CopyStage, Handoff};
use crate::error::{PipelineError, Result};
use crate::metadata_stage::MetadataStage;
use crate::report::{CopyStats, MetadataStats, RunReport};
use crate::run::{RunPhase, RunTracker};
use bridge_traits::{FileSystemAccess, ProcessRunner};
use chrono::Utc;
use core_exiftool::ToolInvoker;
use core_runtime::config::FixerConfig;
use core_runtime::events::{EventBus, Phase, RunOutcome};
use core_runtime::progress::{ProgressReporter, RunCounters, RunId};
use core_scanner::{ScanError, ScanOutcome, TreeScanner};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
    reporter: ProgressReporter,
}

/// Runs the takeout fix-up pipeline.
///
/// # Example
///
/// ```ignore
/// let fixer = TakeoutFixer::new(fs, runner, EventBus::new(1024));
/// let mut events = fixer.subscribe();
/// let report = fixer.run(&config).await?;
/// ```
pub struct TakeoutFixer {
    fs: Arc<dyn FileSystemAccess>,
    runner: Arc<dyn ProcessRunner>,
    event_bus: EventBus,
    active: Mutex<Option<ActiveRun>>,
    tracker: Mutex<RunTracker>,
    /// One invoker per tool name, so a resolved path outlives the run
    invokers: Mutex<HashMap<String, Arc<ToolInvoker>>>,
}

impl TakeoutFixer {
    pub fn new(
        fs: Arc<dyn FileSystemAccess>,
        runner: Arc<dyn ProcessRunner>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            fs,
            runner,
            event_bus,
            active: Mutex::new(None),
            tracker: Mutex::new(RunTracker::default()),
            invokers: Mutex::new(HashMap::new()),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<core_runtime::events::CoreEvent> {
        self.event_bus.subscribe()
    }

    pub async fn phase(&self) -> RunPhase {
        self.tracker.lock().await.phase()
    }

    /// Execute one run with `config`.
    ///
    /// Cancellation is not an error: the report comes back with
    /// [`RunOutcome::Cancelled`]. Every error except
    /// [`PipelineError::RunInProgress`] is followed by a terminal event.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] when `config` fails validation
    /// - [`PipelineError::RunInProgress`] while another run is active
    /// - [`PipelineError::Tool`] when the metadata tool cannot be resolved
    /// - [`PipelineError::Scan`] when the input tree cannot be scanned
    #[instrument(skip(self, config), fields(input = %config.input_root.display()))]
    pub async fn run(&self, config: &FixerConfig) -> Result<RunReport> {
        let (run_id, cancel, reporter) = {
            let mut active = self.active.lock().await;
            if let Some(current) = active.as_ref() {
                return Err(PipelineError::RunInProgress {
                    run_id: current.run_id.as_str(),
                });
            }

            let run_id = RunId::new();
            let cancel = CancellationToken::new();
            let reporter =
                ProgressReporter::new(self.event_bus.clone(), run_id, Arc::new(RunCounters::new()));
            *active = Some(ActiveRun {
                run_id,
                cancel: cancel.clone(),
                reporter: reporter.clone(),
            });
            (run_id, cancel, reporter)
        };

        info!(run_id = %run_id, "Run started");
        let started_at = Utc::now();
        let result = self.execute(config, &reporter, &cancel, started_at).await;

        match &result {
            Ok(report) => {
                reporter.finished(report.outcome, "Done.");
            }
            Err(e) => {
                error!(run_id = %run_id, error = %e, "Run aborted");
                if !e.already_reported() {
                    reporter.error(Phase::Run, format!("{}\nAborting now.", e));
                }
                reporter.finished(RunOutcome::Aborted, "Aborting now.");
            }
        }

        self.tracker.lock().await.reset();
        *self.active.lock().await = None;
        result
    }

    /// Ask the active run to stop. Returns false when no run is active.
    pub async fn cancel(&self) -> bool {
        let active = self.active.lock().await;
        match active.as_ref() {
            Some(run) => {
                run.reporter.status(Phase::Run, "Canceling...");
                run.cancel.cancel();
                info!(run_id = %run.run_id, "Cancellation requested");
                true
            }
            None => false,
        }
    }

    async fn invoker_for(&self, tool_name: &str) -> Arc<ToolInvoker> {
        self.invokers
            .lock()
            .await
            .entry(tool_name.to_string())
            .or_insert_with(|| Arc::new(ToolInvoker::new(self.runner.clone(), tool_name)))
            .clone()
    }

    async fn execute(
        &self,
        config: &FixerConfig,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
        started_at: chrono::DateTime<Utc>,
    ) -> Result<RunReport> {
        config.validate()?;
        let run_id = reporter.run_id();
        self.tracker.lock().await.transition(RunPhase::Scanning)?;

        let invoker = self.invoker_for(&config.tool_name).await;
        let tool = invoker.detect().await?;
        reporter.status(
            Phase::Run,
            format!("Using {} at {}.", config.tool_name, tool.display()),
        );

        let scanner = TreeScanner::new(self.fs.clone());
        let ScanOutcome { items, summary } = match scanner
            .scan(&config.input_root, &config.output_root, reporter, cancel)
            .await
        {
            Ok(outcome) => outcome,
            Err(ScanError::Cancelled) => {
                return Ok(RunReport::new(
                    run_id,
                    RunOutcome::Cancelled,
                    Default::default(),
                    CopyStats::default(),
                    MetadataStats::default(),
                    started_at,
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if config.scan_only {
            self.tracker.lock().await.transition(RunPhase::Idle)?;
            return Ok(RunReport::new(
                run_id,
                RunOutcome::ScanOnly,
                summary,
                CopyStats::default(),
                MetadataStats::default(),
                started_at,
            ));
        }

        self.tracker.lock().await.transition(RunPhase::Transferring)?;

        let count = items.len() as u64;
        reporter.add_total(Phase::Copy, count, format!("{} files to copy.", count));
        reporter.add_total(
            Phase::Metadata,
            count,
            format!("{} files to update.", count),
        );

        let (tx, rx) = mpsc::channel::<Handoff>(config.handoff_capacity);
        let copy = CopyStage::new(self.fs.clone(), config.overwrite_existing);
        let metadata = MetadataStage::new(self.fs.clone(), invoker, config.tool_timeout);

        let (copy_stats, metadata_stats) = tokio::join!(
            copy.run(items, tx, reporter, cancel),
            metadata.run(rx, reporter, cancel),
        );

        self.tracker.lock().await.transition(RunPhase::Idle)?;

        let outcome = if cancel.is_cancelled() {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Completed
        };
        info!(
            run_id = %run_id,
            outcome = %outcome,
            copied = copy_stats.copied,
            updated = metadata_stats.updated,
            "Transfer finished"
        );

        Ok(RunReport::new(
            run_id,
            outcome,
            summary,
            copy_stats,
            metadata_stats,
            started_at,
        ))
    }
}
