//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms.
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge traits
//! on top of Tokio:
//! - `FileSystemAccess` using `tokio::fs`
//! - `ProcessRunner` using `tokio::process`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{TokioFileSystem, TokioProcessRunner};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fs = Arc::new(TokioFileSystem::new());
//!     let runner = Arc::new(TokioProcessRunner::new());
//!
//!     // Hand both to the core service dependencies
//! }
//! ```

mod filesystem;
mod process;

pub use filesystem::TokioFileSystem;
pub use process::TokioProcessRunner;
