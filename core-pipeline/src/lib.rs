//! # Takeout Pipeline
//!
//! Orchestrates a fix-up run: scan the archive, copy every media file into a
//! mirrored output tree and rewrite its timestamps from the JSON sidecar.
//!
//! ## Components
//!
//! - [`TakeoutFixer`]: entry point, one run at a time
//! - [`CopyStage`] and [`MetadataStage`]: the two transfer workers, joined by
//!   a bounded `mpsc` queue of [`Handoff`]s
//! - [`RunTracker`]: validated `Idle → Scanning → Transferring` cycle
//! - [`RunReport`]: per-run counters handed back to the caller
//!
//! Progress is published on the [`EventBus`](core_runtime::events::EventBus)
//! the fixer was built with.

pub mod copy_stage;
pub mod error;
pub mod metadata_stage;
pub mod orchestrator;
pub mod report;
pub mod run;

pub use copy_stage::{CopyStage, Handoff};
pub use error::{PipelineError, Result};
pub use metadata_stage::MetadataStage;
pub use orchestrator::TakeoutFixer;
pub use report::{CopyStats, MetadataStats, RunReport};
pub use run::{RunPhase, RunTracker};
