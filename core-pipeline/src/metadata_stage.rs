//! # Metadata Stage
//!
//! Drains the hand-off queue and rewrites timestamps with the external tool.
//! Items reach this stage only after their copy attempt, so an update never
//! runs ahead of its copy.

use crate::copy_stage::Handoff;
use crate::report::MetadataStats;
use bridge_traits::FileSystemAccess;
use core_exiftool::{timestamp_arguments, ToolInvocationResult, ToolInvoker};
use core_runtime::events::Phase;
use core_runtime::progress::ProgressReporter;
use core_scanner::WorkItem;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

pub struct MetadataStage {
    fs: Arc<dyn FileSystemAccess>,
    invoker: Arc<ToolInvoker>,
    timeout: Option<Duration>,
}

impl MetadataStage {
    /// `timeout` bounds each tool invocation, not the whole stage
    pub fn new(
        fs: Arc<dyn FileSystemAccess>,
        invoker: Arc<ToolInvoker>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            fs,
            invoker,
            timeout,
        }
    }

    /// Process hand-offs until the copy stage closes the queue and it is
    /// drained, or until `cancel` trips.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        mut queue: mpsc::Receiver<Handoff>,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> MetadataStats {
        let mut stats = MetadataStats::default();

        loop {
            let handoff = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Metadata stage cancelled");
                    break;
                }
                next = queue.recv() => match next {
                    Some(handoff) => handoff,
                    None => break,
                },
            };

            match handoff {
                Handoff::Ready(item) => self.process(&item, reporter, &mut stats).await,
                Handoff::CopyFailed(item) => {
                    stats.skipped += 1;
                    reporter.item_completed(
                        Phase::Metadata,
                        format!(
                            "skipped EXIF update of {} (not copied).",
                            item.target_path.display()
                        ),
                    );
                }
            }
        }

        stats
    }

    async fn process(
        &self,
        item: &WorkItem,
        reporter: &ProgressReporter,
        stats: &mut MetadataStats,
    ) {
        let Some(sidecar) = self.existing_sidecar(item).await else {
            stats.skipped += 1;
            reporter.item_completed(
                Phase::Metadata,
                format!("no json file for {}.", item.target_path.display()),
            );
            return;
        };

        let args = timestamp_arguments(sidecar, &item.target_path);
        let result = self.invoker.invoke(&args, self.timeout).await;
        let message = describe(&item.target_path, &result);

        if result.is_error() {
            stats.failed += 1;
            reporter.item_failed(Phase::Metadata, message);
        } else {
            stats.updated += 1;
            reporter.item_completed(Phase::Metadata, message);
        }
    }

    /// Sidecar path when the item has one and it is still on disk
    async fn existing_sidecar<'a>(&self, item: &'a WorkItem) -> Option<&'a Path> {
        let sidecar = item.sidecar_path.as_deref()?;
        match self.fs.exists(sidecar).await {
            Ok(true) => Some(sidecar),
            Ok(false) => {
                debug!(sidecar = ?sidecar, "Sidecar disappeared since the scan");
                None
            }
            Err(e) => {
                warn!(sidecar = ?sidecar, error = %e, "Cannot check sidecar");
                None
            }
        }
    }
}

/// Multi-line report of one invocation
fn describe(target: &Path, result: &ToolInvocationResult) -> String {
    let mut parts = vec![
        format!("updated EXIF of {}.", target.display()),
        format!(
            "Exit Code: {}, Elapsed Time: {:?}",
            result.exit_code, result.elapsed
        ),
    ];
    if !result.stdout.trim().is_empty() {
        parts.push(format!("StdOut: {}", result.stdout));
    }
    if !result.stderr.trim().is_empty() {
        parts.push(format!("StdErr: {}", result.stderr));
    }
    parts.join("\n")
}
