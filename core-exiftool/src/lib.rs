//! # External Metadata Tool
//!
//! Locates and runs `exiftool` through the [`ProcessRunner`] bridge.
//!
//! The tool is a black box: the invoker hands it an argument list and keeps
//! only the exit code, the captured output and the elapsed time. Invocation
//! never fails; execution faults come back as a result carrying
//! [`SENTINEL_EXIT_CODE`] so the metadata stage can report them like any
//! other item failure.
//!
//! [`ProcessRunner`]: bridge_traits::ProcessRunner

pub mod arguments;
pub mod error;
pub mod invoker;

pub use arguments::timestamp_arguments;
pub use error::{Result, ToolError};
pub use invoker::{ToolInvocationResult, ToolInvoker, SENTINEL_EXIT_CODE};
