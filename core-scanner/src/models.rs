//! Scan result models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of media derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    /// Videos and animations (gif)
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media file to copy and, when a sidecar was found, to re-date.
///
/// `target_path` relative to the output root always equals `source_path`
/// relative to the input root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub sidecar_path: Option<PathBuf>,
    pub kind: MediaKind,
}

impl WorkItem {
    pub fn has_sidecar(&self) -> bool {
        self.sidecar_path.is_some()
    }
}

/// A file skipped because of its extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedFile {
    pub path: PathBuf,
    /// Extension without the dot, empty when the name has none
    pub extension: String,
}

/// Totals of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total: u64,
    pub missing_sidecar: u64,
    pub photos: u64,
    pub videos: u64,
    pub unsupported: Vec<UnsupportedFile>,
}

impl ScanSummary {
    pub fn record(&mut self, item: &WorkItem) {
        self.total += 1;
        if !item.has_sidecar() {
            self.missing_sidecar += 1;
        }
        match item.kind {
            MediaKind::Photo => self.photos += 1,
            MediaKind::Video => self.videos += 1,
        }
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ({} json files missing, {} photos, {} videos).",
            self.total, self.missing_sidecar, self.photos, self.videos
        )
    }
}

/// Work list plus totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub items: Vec<WorkItem>,
    pub summary: ScanSummary,
}
