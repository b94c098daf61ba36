//! Tool resolution and invocation

use crate::error::{Result, ToolError};
use bridge_traits::{ProcessOutput, ProcessRunner};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// Exit code reported when the tool could not be run at all
pub const SENTINEL_EXIT_CODE: i32 = -1;

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocationResult {
    pub exit_code: i32,
    /// Captured stdout, trailing whitespace trimmed
    pub stdout: String,
    /// Captured stderr, trailing whitespace trimmed; holds the fault message
    /// for sentinel results
    pub stderr: String,
    pub elapsed: Duration,
}

impl ToolInvocationResult {
    fn from_output(output: ProcessOutput) -> Self {
        let stderr = output.stderr.trim_end().to_string();
        match output.exit_code {
            Some(exit_code) => Self {
                exit_code,
                stdout: output.stdout.trim_end().to_string(),
                stderr,
                elapsed: output.elapsed,
            },
            None => Self {
                exit_code: SENTINEL_EXIT_CODE,
                stdout: output.stdout.trim_end().to_string(),
                stderr: if stderr.is_empty() {
                    "terminated by signal".to_string()
                } else {
                    stderr
                },
                elapsed: output.elapsed,
            },
        }
    }

    fn fault(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            exit_code: SENTINEL_EXIT_CODE,
            stdout: String::new(),
            stderr: message.into(),
            elapsed,
        }
    }

    /// Non-zero exit or anything written to stderr
    pub fn is_error(&self) -> bool {
        self.exit_code != 0 || !self.stderr.is_empty()
    }
}

/// Resolves the metadata tool once and runs it.
///
/// Resolution is cached for the invoker's lifetime; later `detect` calls
/// return the cached path without spawning `which` again. Hosts keep one
/// invoker per tool for as long as the process runs.
pub struct ToolInvoker {
    runner: Arc<dyn ProcessRunner>,
    tool_name: String,
    resolved: OnceCell<PathBuf>,
}

impl ToolInvoker {
    pub fn new(runner: Arc<dyn ProcessRunner>, tool_name: impl Into<String>) -> Self {
        Self {
            runner,
            tool_name: tool_name.into(),
            resolved: OnceCell::new(),
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Path found by a successful [`detect`](Self::detect)
    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved.get().map(PathBuf::as_path)
    }

    /// Locate the tool on the search path.
    ///
    /// # Errors
    ///
    /// - [`ToolError::UnsupportedPlatform`] on anything but Linux
    /// - [`ToolError::ToolNotFound`] when `which` finds nothing
    /// - [`ToolError::Bridge`] when `which` itself cannot be run
    #[instrument(skip(self), fields(tool = %self.tool_name))]
    pub async fn detect(&self) -> Result<PathBuf> {
        let path = self
            .resolved
            .get_or_try_init(|| self.locate())
            .await?;
        Ok(path.clone())
    }

    async fn locate(&self) -> Result<PathBuf> {
        if !cfg!(target_os = "linux") {
            return Err(ToolError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ));
        }

        let output = self
            .runner
            .run(Path::new("which"), &[OsString::from(&self.tool_name)], None)
            .await?;

        let found = output.stdout.trim();
        if output.exit_code != Some(0) || found.is_empty() {
            warn!(exit_code = ?output.exit_code, "Tool not found on PATH");
            return Err(ToolError::ToolNotFound(self.tool_name.clone()));
        }

        info!(path = %found, "Resolved metadata tool");
        Ok(PathBuf::from(found))
    }

    /// Run the resolved tool with `args`, killing it after `timeout`.
    ///
    /// Never fails: an unresolved tool, a spawn failure or a timeout yields a
    /// result with [`SENTINEL_EXIT_CODE`] and the fault in `stderr`.
    pub async fn invoke(
        &self,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> ToolInvocationResult {
        let Some(program) = self.resolved.get() else {
            return ToolInvocationResult::fault(
                format!("{} has not been resolved", self.tool_name),
                Duration::ZERO,
            );
        };

        let started = std::time::Instant::now();
        match self.runner.run(program, args, timeout).await {
            Ok(output) => {
                let result = ToolInvocationResult::from_output(output);
                debug!(
                    exit_code = result.exit_code,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Tool finished"
                );
                result
            }
            Err(e) => {
                warn!(error = %e, "Tool invocation failed");
                ToolInvocationResult::fault(e.to_string(), started.elapsed())
            }
        }
    }
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker")
            .field("tool_name", &self.tool_name)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}
