//! # Fixer Configuration Module
//!
//! Provides the run configuration for the takeout fixer.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `FixerConfig`. It enforces fail-fast validation so a run never starts with
//! roots that would make the copy stage read its own output.
//!
//! The core never persists or loads configuration; the host builds one per
//! run.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::FixerConfig;
//! use std::time::Duration;
//!
//! let config = FixerConfig::builder()
//!     .input_root("/data/Takeout/Google Photos")
//!     .output_root("/data/photos-fixed")
//!     .overwrite_existing(false)
//!     .tool_timeout(Duration::from_secs(60))
//!     .build()?;
//! # Ok::<(), core_runtime::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::FixerConfig;
//!
//! // Missing output root
//! let config = FixerConfig::builder()
//!     .input_root("/data/Takeout")
//!     .build()
//!     .expect("Should fail - output root is required");
//! ```

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Default capacity of the queue between the copy and metadata stages
pub const DEFAULT_HANDOFF_CAPACITY: usize = 64;

/// Default external metadata tool
pub const DEFAULT_TOOL_NAME: &str = "exiftool";

/// Configuration for a single run.
///
/// Use [`FixerConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerConfig {
    /// Root of the extracted takeout archive
    pub input_root: PathBuf,

    /// Root of the mirrored output tree
    pub output_root: PathBuf,

    /// Stop after the scan and report what would be processed
    pub scan_only: bool,

    /// Rewrite targets that already exist in the output tree
    pub overwrite_existing: bool,

    /// Bound of the copy → metadata hand-off queue
    pub handoff_capacity: usize,

    /// Name of the metadata tool, resolved on the search path
    pub tool_name: String,

    /// Kill the tool when a single invocation runs longer than this
    pub tool_timeout: Option<Duration>,
}

impl FixerConfig {
    /// Creates a new builder for constructing a `FixerConfig`.
    pub fn builder() -> FixerConfigBuilder {
        FixerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Both roots are set and differ
    /// - The output root does not lie inside the input root
    /// - The hand-off capacity is greater than 0
    /// - The tool name is not empty
    pub fn validate(&self) -> Result<()> {
        if self.input_root.as_os_str().is_empty() {
            return Err(Error::Config("Input root cannot be empty".to_string()));
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(Error::Config("Output root cannot be empty".to_string()));
        }

        let input = normalize(&self.input_root);
        let output = normalize(&self.output_root);

        if input == output {
            return Err(Error::Config(
                "Input and output roots must be different directories".to_string(),
            ));
        }

        if output.starts_with(&input) {
            return Err(Error::Config(format!(
                "Output root {} lies inside the input root {}. \
                 Choose an output directory outside the archive.",
                self.output_root.display(),
                self.input_root.display()
            )));
        }

        if self.handoff_capacity == 0 {
            return Err(Error::Config(
                "Hand-off capacity must be greater than 0".to_string(),
            ));
        }

        if self.tool_name.trim().is_empty() {
            return Err(Error::Config("Tool name cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Lexically normalise a path: drop `.` components and fold `..`.
///
/// The roots may not exist yet, so the filesystem is not consulted.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Builder for [`FixerConfig`].
#[derive(Debug, Default)]
pub struct FixerConfigBuilder {
    input_root: Option<PathBuf>,
    output_root: Option<PathBuf>,
    scan_only: bool,
    overwrite_existing: Option<bool>,
    handoff_capacity: Option<usize>,
    tool_name: Option<String>,
    tool_timeout: Option<Duration>,
}

impl FixerConfigBuilder {
    /// Sets the root of the extracted takeout archive (required).
    pub fn input_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.input_root = Some(path.into());
        self
    }

    /// Sets the root of the mirrored output tree (required).
    pub fn output_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_root = Some(path.into());
        self
    }

    /// Only scan and report.
    ///
    /// Default: false
    pub fn scan_only(mut self, enabled: bool) -> Self {
        self.scan_only = enabled;
        self
    }

    /// Rewrite targets that already exist.
    ///
    /// Default: true
    pub fn overwrite_existing(mut self, enabled: bool) -> Self {
        self.overwrite_existing = Some(enabled);
        self
    }

    /// Default: 64
    pub fn handoff_capacity(mut self, capacity: usize) -> Self {
        self.handoff_capacity = Some(capacity);
        self
    }

    /// Default: `exiftool`
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Default: no timeout
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    /// Builds the final `FixerConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is missing or [`FixerConfig::validate`]
    /// rejects the values.
    pub fn build(self) -> Result<FixerConfig> {
        let input_root = self.input_root.ok_or_else(|| {
            Error::Config("Input root is required. Use .input_root() to set it.".to_string())
        })?;

        let output_root = self.output_root.ok_or_else(|| {
            Error::Config("Output root is required. Use .output_root() to set it.".to_string())
        })?;

        let config = FixerConfig {
            input_root,
            output_root,
            scan_only: self.scan_only,
            overwrite_existing: self.overwrite_existing.unwrap_or(true),
            handoff_capacity: self.handoff_capacity.unwrap_or(DEFAULT_HANDOFF_CAPACITY),
            tool_name: self
                .tool_name
                .unwrap_or_else(|| DEFAULT_TOOL_NAME.to_string()),
            tool_timeout: self.tool_timeout,
        };

        config.validate()?;

        Ok(config)
    }
}
