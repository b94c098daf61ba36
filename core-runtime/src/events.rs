//! # Event Bus System
//!
//! Provides the progress channel between a running fix-up and any number of
//! observers, built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: [`CoreEvent`] with a per-item [`ProgressEvent`] and a
//!   terminal [`RunFinished`] signal
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ Tree Scanner ├────────────>│           │
//! └──────────────┘             │           │    subscribe    ┌────────────┐
//! ┌──────────────┐    emit     │ EventBus  ├────────────────>│    CLI     │
//! │  Copy Stage  ├────────────>│ (broadcast│                 └────────────┘
//! └──────────────┘             │  channel) │    subscribe    ┌────────────┐
//! ┌──────────────┐    emit     │           ├────────────────>│   Tests    │
//! │Metadata Stage├────────────>│           │                 └────────────┘
//! └──────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus};
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match stream.recv().await {
//!             Ok(CoreEvent::Finished(done)) => {
//!                 println!("{}", done.message);
//!                 break;
//!             }
//!             Ok(event) => println!("{}", event.description()),
//!             Err(RecvError::Lagged(n)) => eprintln!("Missed {} events", n),
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Emitting with no subscribers returns an error that publishers ignore with
//! `.ok()`: nobody watching is a normal state.

use crate::progress::RunId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// A scan emits one event per directory and per unsupported file, and the
/// transfer emits two per item, so bursts are large. Subscribers that can't
/// keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 1024;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Status, per-item completion, error or total-count update
    Progress(ProgressEvent),
    /// Terminal signal, emitted exactly once per accepted run
    Finished(RunFinished),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Progress(e) => &e.message,
            CoreEvent::Finished(e) => &e.message,
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Progress(e) if e.is_error => EventSeverity::Error,
            CoreEvent::Progress(e) if e.kind == ProgressKind::ItemCompleted => {
                EventSeverity::Debug
            }
            CoreEvent::Progress(_) => EventSeverity::Info,
            CoreEvent::Finished(e) => match e.outcome {
                RunOutcome::Aborted => EventSeverity::Error,
                RunOutcome::Cancelled => EventSeverity::Warning,
                RunOutcome::Completed | RunOutcome::ScanOnly => EventSeverity::Info,
            },
        }
    }

    pub fn run_id(&self) -> RunId {
        match self {
            CoreEvent::Progress(e) => e.run_id,
            CoreEvent::Finished(e) => e.run_id,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, CoreEvent::Finished(_))
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Progress Events
// ============================================================================

/// Stage of a run that an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Run-level status (tool resolution, cancellation, completion)
    Run,
    Scan,
    Copy,
    Metadata,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Run => "run",
            Phase::Scan => "scan",
            Phase::Copy => "copy",
            Phase::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a progress event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    /// Free-form status line
    Status,
    /// The phase total grew
    TotalUpdated,
    /// One item of the phase finished successfully
    ItemCompleted,
    /// One item of the phase finished with an error
    ItemFailed,
    /// A file with an unrecognised extension was skipped
    Unsupported,
    /// Scan totals
    Summary,
}

/// A single progress notification.
///
/// `done` and `total` are a snapshot of the phase counters taken when the
/// event was emitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEvent {
    pub run_id: RunId,
    pub phase: Phase,
    pub kind: ProgressKind,
    pub message: String,
    pub is_error: bool,
    pub done: u64,
    pub total: u64,
}

// ============================================================================
// Run Completion
// ============================================================================

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Scan, copy and metadata update all ran to the end
    Completed,
    /// Scan-only run finished its scan
    ScanOnly,
    /// Stopped early after a cancellation request
    Cancelled,
    /// A fatal error ended the run
    Aborted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::ScanOnly => "scan_only",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Aborted => "aborted",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed | RunOutcome::ScanOnly)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(RunOutcome::Completed),
            "scan_only" => Ok(RunOutcome::ScanOnly),
            "cancelled" => Ok(RunOutcome::Cancelled),
            "aborted" => Ok(RunOutcome::Aborted),
            other => Err(format!("unknown run outcome: {}", other)),
        }
    }
}

/// Terminal event of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunFinished {
    pub run_id: RunId,
    pub outcome: RunOutcome,
    pub message: String,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future events.
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventSeverity, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let errors = EventStream::new(event_bus.subscribe())
///     .filter(|event| event.severity() >= EventSeverity::Error);
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every event currently buffered, skipping filtered ones.
    pub fn drain(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(event) => events.push(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        events
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
