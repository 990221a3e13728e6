//! # Event Bus System
//!
//! Typed notifications from the gallery core to the presentation layer, carried
//! over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Every operation outcome (refresh, upload, delete, pick) is published as a
//! [`CoreEvent`]. Failures always produce an event with a user-facing message
//! ([`CoreEvent::user_message`]) so nothing is swallowed silently. Only a
//! cancelled pick stays quiet.
//!
//! ```text
//! ┌────────────────────┐   emit    ┌───────────┐  subscribe  ┌──────────────┐
//! │ GalleryReconciler  ├──────────>│           ├────────────>│ Presentation │
//! └────────────────────┘           │ EventBus  │             └──────────────┘
//! ┌────────────────────┐   emit    │           │  subscribe  ┌──────────────┐
//! │SelectionController ├──────────>│           ├────────────>│   Logging    │
//! └────────────────────┘           └───────────┘             └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Gallery(GalleryEvent::Refreshed { count: 3 }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.user_message(), None);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events and can keep going.
//! - **`RecvError::Closed`**: all senders were dropped, so the subscriber should exit.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Gallery reconciliation outcomes
    Gallery(GalleryEvent),
    /// Pending selection changes
    Selection(SelectionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Gallery(e) => e.description(),
            CoreEvent::Selection(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Gallery(GalleryEvent::RefreshFailed { .. })
            | CoreEvent::Gallery(GalleryEvent::UploadFailed { .. })
            | CoreEvent::Gallery(GalleryEvent::DeleteFailed { .. }) => EventSeverity::Error,
            CoreEvent::Selection(SelectionEvent::PickFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Gallery(GalleryEvent::UploadSucceeded { .. })
            | CoreEvent::Gallery(GalleryEvent::Deleted { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }

    /// Message to show the end user, if this event warrants one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            CoreEvent::Gallery(e) => e.user_message(),
            CoreEvent::Selection(e) => e.user_message(),
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Gallery Events
// ============================================================================

/// Outcomes of gallery operations against the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GalleryEvent {
    /// A refresh was issued.
    RefreshStarted,
    /// The gallery was replaced with a fresh listing.
    Refreshed {
        /// Number of assets now in the gallery.
        count: usize,
    },
    /// The listing could not be loaded.
    RefreshFailed {
        /// Technical error message.
        message: String,
        /// Error kind (e.g. "network", "auth").
        kind: String,
        /// Whether retrying unchanged may succeed.
        recoverable: bool,
        /// Whether the gallery was emptied (malformed response) instead of kept.
        cleared: bool,
    },
    /// An upload was handed to the store.
    UploadStarted {
        /// Base name of the local file.
        file_name: String,
    },
    /// The store accepted an upload.
    UploadSucceeded {
        public_id: String,
        url: String,
    },
    /// The upload failed; the pending selection is kept for a retry.
    UploadFailed {
        message: String,
        kind: String,
        recoverable: bool,
    },
    /// An asset is gone from the store.
    Deleted {
        public_id: String,
        /// False when the store reported the asset as already gone.
        confirmed: bool,
    },
    /// A delete failed; the gallery is unchanged.
    DeleteFailed {
        public_id: String,
        message: String,
        kind: String,
        recoverable: bool,
    },
}

impl GalleryEvent {
    fn description(&self) -> &str {
        match self {
            GalleryEvent::RefreshStarted => "Gallery refresh started",
            GalleryEvent::Refreshed { .. } => "Gallery refreshed",
            GalleryEvent::RefreshFailed { .. } => "Gallery refresh failed",
            GalleryEvent::UploadStarted { .. } => "Upload started",
            GalleryEvent::UploadSucceeded { .. } => "Upload succeeded",
            GalleryEvent::UploadFailed { .. } => "Upload failed",
            GalleryEvent::Deleted { .. } => "Asset deleted",
            GalleryEvent::DeleteFailed { .. } => "Delete failed",
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            GalleryEvent::RefreshFailed { .. } => {
                Some("Gallery could not be loaded. Please try again.".to_string())
            }
            GalleryEvent::UploadSucceeded { .. } => Some("Upload Successful".to_string()),
            // Validation messages are written for the user ("Please select an image first")
            GalleryEvent::UploadFailed { kind, message, .. } if kind == "validation" => {
                Some(message.clone())
            }
            GalleryEvent::UploadFailed { .. } => Some("Upload failed. Please try again.".to_string()),
            GalleryEvent::DeleteFailed { .. } => {
                Some("Delete failed. The image was not removed.".to_string())
            }
            _ => None,
        }
    }
}

// ============================================================================
// Selection Events
// ============================================================================

/// Changes to the pending (not yet uploaded) selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SelectionEvent {
    /// A new image is pending, replacing any previous one.
    Picked {
        /// Base name of the local file.
        file_name: String,
    },
    /// The pending selection was dropped.
    Cleared,
    /// The user dismissed the picker.
    PickCancelled,
    /// The picker could not deliver an image.
    PickFailed {
        /// User-facing reason.
        message: String,
    },
}

impl SelectionEvent {
    fn description(&self) -> &str {
        match self {
            SelectionEvent::Picked { .. } => "Image selected",
            SelectionEvent::Cleared => "Selection cleared",
            SelectionEvent::PickCancelled => "Pick cancelled",
            SelectionEvent::PickFailed { .. } => "Pick failed",
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            SelectionEvent::PickFailed { message } => Some(message.clone()),
            _ => None,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when nobody is listening.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
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

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with optional predicate filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let failures = EventStream::new(event_bus.subscribe())
///     .filter(|event| event.user_message().is_some());
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
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

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
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
