//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host.
//!
//! ## Overview
//!
//! This crate defines the contract between the takeout fixer core and the
//! platform-specific implementations. Each trait represents a capability the
//! core requires but never implements itself:
//!
//! - [`FileSystemAccess`](storage::FileSystemAccess) - directory listing,
//!   directory creation and file copies for the scan and copy stages
//! - [`ProcessRunner`](process::ProcessRunner) - launching the external
//!   metadata tool and capturing its output
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Linux    | `bridge-desktop`    | ✅ Supported |
//! | Others   | `bridge-desktop`    | Filesystem only, tool resolution refuses |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert platform errors to `BridgeError` and keep
//! the offending path in the message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared between the copy and metadata stages.

pub mod error;
pub mod process;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use process::{ProcessOutput, ProcessRunner};
pub use storage::{DirectoryListing, FileSystemAccess};
