//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the takeout fixer:
//! - Logging and tracing infrastructure
//! - Run configuration
//! - Event bus system
//! - Per-run progress counters and reporting
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that every other core crate
//! depends on. It establishes the logging conventions and the event
//! broadcasting mechanism observers use to follow a run.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod progress;

pub use error::{Error, Result};
