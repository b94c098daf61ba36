//! Workspace façade crate.
//!
//! Re-exports the crates a host needs to drive the takeout fixer, so a host
//! can depend on `takeout-fixer-workspace` and toggle the documented features
//! without wiring each crate individually.
//!
//! The `takeout-fixer` binary in this package is the command-line host.

pub use core_runtime as runtime;

#[cfg(feature = "desktop-shims")]
pub use core_service as service;
