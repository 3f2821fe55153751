#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for dlock
//!
//! Analysis runs report what they did through domain events rather than by
//! printing. Every emitted event is also written to `tracing` at the level
//! given by [`AppEvent::log_level`], so a consumer that only installs a
//! subscriber still sees the run.
//!
//! The channel is an unbounded tokio mpsc channel. Sending on it never
//! blocks and needs no runtime, so the synchronous detectors can emit
//! directly.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, DetectionEvent, FailureContext, GeneralEvent, RecoveryEvent};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// An event together with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event, deriving source and level from the event itself.
    #[must_use]
    pub fn new(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }

    /// Attach a correlation identifier
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.meta = self.meta.with_correlation_id(correlation_id);
        self
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Write an event to `tracing` at its own level and target.
pub fn log_event(message: &EventMessage) {
    let event = &message.event;
    let correlation = message.meta.correlation_id.as_deref().unwrap_or("-");
    let fields = serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"));

    match event.log_level() {
        tracing::Level::ERROR => {
            tracing::error!(target: "dlock::events", source = event.log_target(), correlation, "{fields}");
        }
        tracing::Level::WARN => {
            tracing::warn!(target: "dlock::events", source = event.log_target(), correlation, "{fields}");
        }
        tracing::Level::INFO => {
            tracing::info!(target: "dlock::events", source = event.log_target(), correlation, "{fields}");
        }
        tracing::Level::DEBUG => {
            tracing::debug!(target: "dlock::events", source = event.log_target(), correlation, "{fields}");
        }
        _ => {
            tracing::trace!(target: "dlock::events", source = event.log_target(), correlation, "{fields}");
        }
    }
}

/// The unified trait for emitting events throughout dlock
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id attached to every emitted event
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let mut message = EventMessage::new(event);
        if let Some(id) = self.correlation_id() {
            message = message.with_correlation_id(id);
        }
        log_event(&message);
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(message);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }

    /// Emit a detection domain event
    fn emit_detection(&self, event: DetectionEvent) {
        self.emit(AppEvent::Detection(event));
    }

    /// Emit a recovery domain event
    fn emit_recovery(&self, event: RecoveryEvent) {
        self.emit(AppEvent::Recovery(event));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Emitter for callers that want logging but no channel
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

impl EventEmitter for NoopEmitter {
    fn event_sender(&self) -> Option<&EventSender> {
        None
    }
}
