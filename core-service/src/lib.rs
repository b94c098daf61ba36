//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (filesystem and
//! process launcher) into the takeout fixer core. Desktop hosts enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`) and call
//! [`bootstrap_desktop`]; other hosts build [`CoreDependencies`] from their
//! own bridges.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{FileSystemAccess, ProcessRunner};
use core_exiftool::ToolError;
use core_pipeline::{PipelineError, RunPhase, RunReport, TakeoutFixer};
use core_runtime::config::FixerConfig;
use core_runtime::events::{EventBus, EventStream};
use tracing::info;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub filesystem: Arc<dyn FileSystemAccess>,
    pub process_runner: Arc<dyn ProcessRunner>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        filesystem: Arc<dyn FileSystemAccess>,
        process_runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            filesystem,
            process_runner,
        }
    }
}

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones drive the same fixer, so one clone can cancel a
/// run another clone started.
#[derive(Clone)]
pub struct CoreService {
    fixer: Arc<TakeoutFixer>,
}

impl CoreService {
    /// Create a new service publishing on a bus of `event_buffer` events.
    ///
    /// # Errors
    ///
    /// [`CoreError::InitializationFailed`] when `event_buffer` is zero.
    pub fn new(deps: CoreDependencies, event_buffer: usize) -> Result<Self> {
        if event_buffer == 0 {
            return Err(CoreError::InitializationFailed(
                "event buffer size must be greater than 0".to_string(),
            ));
        }

        let fixer = TakeoutFixer::new(
            deps.filesystem,
            deps.process_runner,
            EventBus::new(event_buffer),
        );
        Ok(Self {
            fixer: Arc::new(fixer),
        })
    }

    /// Stream of every event published from now on
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.fixer.subscribe())
    }

    pub fn event_bus(&self) -> &EventBus {
        self.fixer.event_bus()
    }

    pub async fn phase(&self) -> RunPhase {
        self.fixer.phase().await
    }

    /// Execute one run.
    ///
    /// A metadata tool that cannot be resolved surfaces as
    /// [`CoreError::CapabilityMissing`].
    pub async fn run(&self, config: &FixerConfig) -> Result<RunReport> {
        match self.fixer.run(config).await {
            Ok(report) => Ok(report),
            Err(PipelineError::Tool(
                e @ (ToolError::ToolNotFound(_) | ToolError::UnsupportedPlatform(_)),
            )) => {
                info!(tool = %config.tool_name, "Metadata tool unavailable");
                Err(CoreError::CapabilityMissing {
                    capability: config.tool_name.clone(),
                    message: e.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ask the active run to stop. Returns false when nothing is running.
    pub async fn cancel(&self) -> bool {
        self.fixer.cancel().await
    }
}

/// Build a service on the tokio-backed desktop bridges.
///
/// ```ignore
/// let core = core_service::bootstrap_desktop(DEFAULT_EVENT_BUFFER_SIZE)?;
/// let mut events = core.subscribe();
/// let report = core.run(&config).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(event_buffer: usize) -> Result<CoreService> {
    use bridge_desktop::{TokioFileSystem, TokioProcessRunner};

    let deps = CoreDependencies::new(
        Arc::new(TokioFileSystem::new()),
        Arc::new(TokioProcessRunner::new()),
    );
    let service = CoreService::new(deps, event_buffer)?;
    info!(event_buffer, "Desktop core initialised");
    Ok(service)
}
