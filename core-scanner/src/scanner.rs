//! # Tree Scanner
//!
//! Depth-first walk of the input root producing the flat work list.
//!
//! Each directory's files are matched before its subdirectories are
//! visited. Pending directories sit on an explicit stack and listings come
//! back sorted, so two scans of the same tree produce the same order.

use crate::error::{Result, ScanError};
use crate::matcher::match_directory;
use crate::models::{ScanOutcome, ScanSummary, UnsupportedFile, WorkItem};
use bridge_traits::FileSystemAccess;
use core_runtime::events::Phase;
use core_runtime::progress::ProgressReporter;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Walks an input tree through the filesystem bridge
pub struct TreeScanner {
    fs: Arc<dyn FileSystemAccess>,
}

impl TreeScanner {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// Scan `input_root` and mirror every eligible file under `output_root`.
    ///
    /// The scan phase counters track directories: the total grows as
    /// subdirectories are discovered and one is marked done per directory
    /// listed.
    ///
    /// # Errors
    ///
    /// - [`ScanError::InputRootMissing`] when the root is not a directory,
    ///   after an error event
    /// - [`ScanError::Cancelled`] when `cancel` trips between directories
    /// - [`ScanError::Bridge`] when a directory cannot be listed
    #[instrument(skip(self, reporter, cancel), fields(run_id = %reporter.run_id()))]
    pub async fn scan(
        &self,
        input_root: &Path,
        output_root: &Path,
        reporter: &ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        reporter.status(Phase::Scan, "Scanning input folder...");

        if !self.fs.is_directory(input_root).await? {
            reporter.error(Phase::Scan, "Input folder does not exist.");
            return Err(ScanError::InputRootMissing(input_root.to_path_buf()));
        }

        let mut outcome = ScanOutcome::default();
        let mut pending = vec![input_root.to_path_buf()];
        let mut visited = HashSet::new();
        reporter.counters().scan.add_total(1);

        while let Some(dir) = pending.pop() {
            if cancel.is_cancelled() {
                info!("Scan cancelled with {} directories pending", pending.len() + 1);
                return Err(ScanError::Cancelled);
            }

            // Links may lead back into a directory already walked
            if !visited.insert(self.fs.canonicalize(&dir).await?) {
                warn!(dir = ?dir, "Skipping directory reached twice through a link");
                reporter.item_completed(
                    Phase::Scan,
                    format!("Skipped {}, already scanned.", dir.display()),
                );
                continue;
            }

            reporter.status(Phase::Scan, format!("Scanning {}...", dir.display()));

            let listing = self.fs.list_directory(&dir).await?;
            let found = self.scan_files(
                &dir,
                &listing.files,
                input_root,
                output_root,
                reporter,
                &mut outcome,
            )?;

            reporter
                .counters()
                .scan
                .add_total(listing.directories.len() as u64);
            reporter.item_completed(
                Phase::Scan,
                format!("Found {} in {}...", found, dir.display()),
            );

            // Reversed so the stack pops subdirectories in name order
            pending.extend(listing.directories.into_iter().rev());
        }

        info!(
            total = outcome.summary.total,
            missing_sidecar = outcome.summary.missing_sidecar,
            unsupported = outcome.summary.unsupported.len(),
            "Scan finished"
        );
        reporter.summary(outcome.summary.to_string());

        Ok(outcome)
    }

    /// Match the files of one directory and append the work items.
    ///
    /// Returns the number of items found.
    fn scan_files(
        &self,
        dir: &Path,
        files: &[PathBuf],
        input_root: &Path,
        output_root: &Path,
        reporter: &ProgressReporter,
        outcome: &mut ScanOutcome,
    ) -> Result<usize> {
        // Names that are not UTF-8 are matched by their lossy form and
        // mapped back so the original bytes reach the output tree.
        let mut by_name: HashMap<String, &PathBuf> = HashMap::with_capacity(files.len());
        let mut names = Vec::with_capacity(files.len());
        for path in files {
            let Some(name) = path.file_name() else {
                continue;
            };
            let name = name.to_string_lossy().into_owned();
            if by_name.contains_key(&name) {
                warn!(path = ?path, "File name collides with another once made readable");
                report_unsupported(reporter, &mut outcome.summary, path.clone(), "");
                continue;
            }
            by_name.insert(name.clone(), path);
            names.push(name);
        }
        let real_path = |name: &str| match by_name.get(name) {
            Some(path) => (*path).clone(),
            None => dir.join(name),
        };

        let matched = match_directory(names.as_slice());

        for unsupported in matched.unsupported {
            report_unsupported(
                reporter,
                &mut outcome.summary,
                real_path(&unsupported.file_name),
                &unsupported.extension,
            );
        }

        let found = matched.media.len();
        for media in matched.media {
            let source_path = real_path(&media.file_name);
            let relative = source_path
                .strip_prefix(input_root)
                .map_err(|_| ScanError::OutsideInputRoot {
                    path: source_path.clone(),
                    root: input_root.to_path_buf(),
                })?;

            let item = WorkItem {
                target_path: output_root.join(relative),
                sidecar_path: media.sidecar.map(|sidecar| real_path(&sidecar)),
                source_path,
                kind: media.kind,
            };
            debug!(source = ?item.source_path, sidecar = ?item.sidecar_path, "Matched");

            outcome.summary.record(&item);
            outcome.items.push(item);
        }

        Ok(found)
    }
}

fn report_unsupported(
    reporter: &ProgressReporter,
    summary: &mut ScanSummary,
    path: PathBuf,
    extension: &str,
) {
    let shown = if extension.is_empty() {
        "(none)".to_string()
    } else {
        format!(".{}", extension)
    };
    reporter.unsupported(format!(
        "Found invalid extension {} in file {}.",
        shown,
        path.display()
    ));
    summary.unsupported.push(UnsupportedFile {
        path,
        extension: extension.to_string(),
    });
}
