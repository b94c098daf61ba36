//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{DirectoryListing, FileSystemAccess},
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Tokio-based file system implementation
///
/// Provides async file I/O operations using `tokio::fs`. Symbolic links are
/// followed when classifying directory entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError, keeping the offending path
    fn map_io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BridgeError + '_ {
        move |e| BridgeError::OperationFailed(format!("{}: {}", path.display(), e))
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(Self::map_io_error(path))
    }

    async fn is_directory(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::map_io_error(path)(e)),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
            .await
            .map_err(Self::map_io_error(path))?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64> {
        let bytes = fs::copy(from, to).await.map_err(Self::map_io_error(from))?;
        debug!(from = ?from, to = ?to, bytes, "Copied file");
        Ok(bytes)
    }

    async fn list_directory(&self, path: &Path) -> Result<DirectoryListing> {
        let mut listing = DirectoryListing::default();
        let mut read_dir = fs::read_dir(path).await.map_err(Self::map_io_error(path))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(Self::map_io_error(path))?
        {
            let entry_path = entry.path();
            // fs::metadata follows links, so a dangling link fails here
            match fs::metadata(&entry_path).await {
                Ok(metadata) if metadata.is_dir() => listing.directories.push(entry_path),
                Ok(_) => listing.files.push(entry_path),
                Err(e) => warn!(path = ?entry_path, error = %e, "Skipping unreadable entry"),
            }
        }

        debug!(
            path = ?path,
            files = listing.files.len(),
            directories = listing.directories.len(),
            "Listed directory"
        );
        Ok(listing.sorted())
    }

    async fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path)
            .await
            .map_err(Self::map_io_error(path))
    }
}
