//! Child Process Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    process::{ProcessOutput, ProcessRunner},
};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Tokio-based process launcher
///
/// Children are spawned with `kill_on_drop`, so a timed out or cancelled
/// invocation never leaves a process behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn map_spawn_error(program: &Path, e: std::io::Error) -> BridgeError {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::NotAvailable(format!("{} not found", program.display()))
        } else {
            BridgeError::OperationFailed(format!("{}: {}", program.display(), e))
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let output = match timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(program = ?program, timeout = ?limit, "Process timed out");
                    return Err(BridgeError::OperationFailed(format!(
                        "{} timed out after {:?}",
                        program.display(),
                        limit
                    )));
                }
            },
            None => command.output().await,
        }
        .map_err(|e| Self::map_spawn_error(program, e))?;
        let elapsed = started.elapsed();

        debug!(
            program = ?program,
            exit_code = ?output.status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Process exited"
        );

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        })
    }
}
