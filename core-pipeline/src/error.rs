use core_exiftool::ToolError;
use core_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("A run is already in progress ({run_id})")]
    RunInProgress { run_id: String },

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] core_runtime::Error),
}

impl PipelineError {
    /// Whether an error event describing this failure was already emitted
    pub(crate) fn already_reported(&self) -> bool {
        matches!(self, PipelineError::Scan(ScanError::InputRootMissing(_)))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
