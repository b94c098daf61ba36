//! File System Abstractions
//!
//! Provides the platform-agnostic trait the scanner and the copy stage use to
//! walk the takeout archive and populate the mirrored output tree.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Entries of a single directory, split by type
///
/// Symbolic links are resolved: a link to a file is listed under `files`,
/// a link to a directory under `directories`. Dangling links are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Absolute paths of regular files
    pub files: Vec<PathBuf>,
    /// Absolute paths of subdirectories
    pub directories: Vec<PathBuf>,
}

impl DirectoryListing {
    /// Sort both lists by path so repeated listings are reproducible
    pub fn sorted(mut self) -> Self {
        self.files.sort();
        self.directories.sort();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// File system access trait
///
/// Abstracts the handful of file operations the fixer needs so the core can
/// be exercised against an in-memory or instrumented implementation.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn mirror(fs: &dyn FileSystemAccess, from: &Path, to: &Path) -> Result<u64> {
///     if let Some(parent) = to.parent() {
///         fs.create_dir_all(parent).await?;
///     }
///     fs.copy_file(from, to).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Check if the path exists and is a directory
    async fn is_directory(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copy `from` to `to`, replacing `to` if it already exists.
    ///
    /// Returns the number of bytes copied. The parent of `to` must exist.
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64>;

    /// List the files and subdirectories directly inside `path`
    async fn list_directory(&self, path: &Path) -> Result<DirectoryListing>;

    /// Absolute form of `path` with every link resolved
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}
