//! # Copy Stage
//!
//! Copies work items into the output tree in scan order and hands each one
//! to the metadata stage once its copy attempt finished.

use crate::report::CopyStats;
use bridge_traits::FileSystemAccess;
use core_runtime::events::Phase;
use core_runtime::progress::ProgressReporter;
use core_scanner::WorkItem;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// What the copy stage passes down the hand-off queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
    /// The target exists in the output tree
    Ready(WorkItem),
    /// The copy failed; the item only needs to be counted
    CopyFailed(WorkItem),
}

pub struct CopyStage {
    fs: Arc<dyn FileSystemAccess>,
    overwrite_existing: bool,
}

impl CopyStage {
    pub fn new(fs: Arc<dyn FileSystemAccess>, overwrite_existing: bool) -> Self {
        Self {
            fs,
            overwrite_existing,
        }
    }

    /// Copy every item, stopping before the next item once `cancel` trips.
    ///
    /// Dropping `queue` when this returns tells the metadata stage that no
    /// more items will arrive.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        queue: mpsc::Sender<Handoff>,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> CopyStats {
        let mut stats = CopyStats::default();

        for item in items {
            if cancel.is_cancelled() {
                info!("Copy stage cancelled");
                break;
            }

            let handoff = match self.copy_one(&item, reporter).await {
                Ok(CopyResult::Copied) => {
                    stats.copied += 1;
                    reporter.item_completed(
                        Phase::Copy,
                        format!("copied {}.", item.target_path.display()),
                    );
                    Handoff::Ready(item)
                }
                Ok(CopyResult::KeptExisting) => {
                    stats.kept_existing += 1;
                    reporter.item_completed(
                        Phase::Copy,
                        format!("kept existing {}.", item.target_path.display()),
                    );
                    Handoff::Ready(item)
                }
                Err(e) => {
                    stats.failed += 1;
                    reporter.item_failed(
                        Phase::Copy,
                        format!(
                            "Failed to copy image: {} to {} ({})",
                            item.source_path.display(),
                            item.target_path.display(),
                            e
                        ),
                    );
                    Handoff::CopyFailed(item)
                }
            };

            if queue.send(handoff).await.is_err() {
                debug!("Metadata stage stopped, ending copy stage");
                break;
            }
        }

        stats
    }

    async fn copy_one(
        &self,
        item: &WorkItem,
        reporter: &ProgressReporter,
    ) -> bridge_traits::error::Result<CopyResult> {
        if let Some(parent) = item.target_path.parent() {
            if !self.fs.is_directory(parent).await? {
                reporter.status(
                    Phase::Copy,
                    format!("Creating output folder: {}.", parent.display()),
                );
                self.fs.create_dir_all(parent).await?;
            }
        }

        if !self.overwrite_existing && self.fs.exists(&item.target_path).await? {
            return Ok(CopyResult::KeptExisting);
        }

        self.fs
            .copy_file(&item.source_path, &item.target_path)
            .await?;
        Ok(CopyResult::Copied)
    }
}

enum CopyResult {
    Copied,
    KeptExisting,
}
