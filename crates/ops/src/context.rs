//! Operations context for dependency injection

use dlock_config::Config;
use dlock_events::{EventEmitter, EventSender};

/// Configuration and event plumbing shared by every operation
#[derive(Debug, Clone, Default)]
pub struct OpsCtx {
    /// Analysis configuration
    pub config: Config,
    /// Event sender; events are still logged through `tracing` without one
    pub tx: Option<EventSender>,
    /// Correlation id stamped on every emitted event
    pub correlation_id: Option<String>,
}

impl OpsCtx {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tx: None,
            correlation_id: None,
        }
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

/// Builder for [`OpsCtx`]
#[derive(Debug, Default)]
pub struct OpsContextBuilder {
    config: Option<Config>,
    tx: Option<EventSender>,
    correlation_id: Option<String>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Build the context; a missing config falls back to defaults.
    #[must_use]
    pub fn build(self) -> OpsCtx {
        OpsCtx {
            config: self.config.unwrap_or_default(),
            tx: self.tx,
            correlation_id: self.correlation_id,
        }
    }
}
