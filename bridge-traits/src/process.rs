//! Child Process Abstractions
//!
//! The external metadata tool is a black box: the core hands it an argument
//! list and observes only the exit code, the captured output streams and the
//! elapsed wall-clock time. Hosts provide the actual process launcher.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Everything observed about one finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output, untrimmed and lossily decoded as UTF-8
    pub stdout: String,
    /// Captured standard error, untrimmed and lossily decoded as UTF-8
    pub stderr: String,
    /// Wall-clock time between spawn and exit
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Process launcher trait
///
/// Implementations run `program` with `args` to completion, capturing both
/// output streams in full. A non-zero exit code is *not* an error: it is
/// reported through [`ProcessOutput::exit_code`]. Errors are reserved for
/// execution-layer faults (the binary is missing, spawning failed, the
/// timeout elapsed).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::process::ProcessRunner;
///
/// async fn locate(runner: &dyn ProcessRunner) -> Result<Option<String>> {
///     let output = runner.run(Path::new("which"), &["exiftool".into()], None).await?;
///     Ok(output.success().then(|| output.stdout.trim().to_string()))
/// }
/// ```
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a program and wait for it to exit.
    ///
    /// Arguments are passed through as `OsString`s so paths that are not valid
    /// UTF-8 reach the child unchanged. When `timeout` is set and elapses
    /// first, the child is killed and an error is returned.
    async fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput>;
}
