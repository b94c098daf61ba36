//! # Takeout Scanner
//!
//! Walks an extracted takeout archive and pairs every photo and video with
//! the JSON sidecar the export wrote next to it.
//!
//! ## Overview
//!
//! - [`matcher`] classifies file names and finds sidecars inside one
//!   directory. It is pure and never touches the filesystem.
//! - [`scanner`] walks the tree through the
//!   [`FileSystemAccess`](bridge_traits::FileSystemAccess) bridge and turns
//!   matches into [`WorkItem`]s with mirrored output paths.

pub mod error;
pub mod matcher;
pub mod models;
pub mod scanner;

pub use error::{Result, ScanError};
pub use matcher::{match_directory, DirectoryMatch, FileClass, MatchedMedia, UnsupportedName};
pub use models::{MediaKind, ScanOutcome, ScanSummary, UnsupportedFile, WorkItem};
pub use scanner::TreeScanner;
