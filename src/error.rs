//! Error types used by the broker, the scheduler and plugin discovery.
//!
//! This module defines four error enums:
//!
//! - [`HandlerError`]: a single event handler failed (or panicked).
//! - [`BrokerError`]: an emission finished with one or more handler failures.
//! - [`TaskError`]: a scheduled callback failed, panicked or was cancelled.
//! - [`PluginError`]: plugin loading, instantiation or event delivery failed.
//!
//! All types provide `as_label` (stable snake_case label for logs) and
//! `as_message` helpers.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by a single event handler.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Handler returned an error.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Handler panicked; the panic was caught.
    #[error("handler panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// Handler was cancelled before completion (runtime shutting down).
    #[error("handler cancelled")]
    Canceled,
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::HandlerError;
    ///
    /// assert_eq!(HandlerError::failed("boom").as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Panicked { .. } => "handler_panicked",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Panicked { info } => format!("panic: {info}"),
            HandlerError::Canceled => "cancelled".to_string(),
        }
    }
}

/// One failed handler invocation within an emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Name of the handler that failed.
    pub handler: String,
    /// Position of the handler in the subscription snapshot.
    pub position: usize,
    /// What went wrong.
    pub error: HandlerError,
}

/// # Errors produced by [`EventBroker::emit`](crate::EventBroker::emit).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BrokerError {
    /// At least one handler failed. Every handler of the emission has
    /// completed by the time this is returned.
    #[error("event {event:?}: {} handler(s) failed", failures.len())]
    HandlersFailed {
        /// Event name that was emitted.
        event: String,
        /// All failures, in subscription order.
        failures: Vec<HandlerFailure>,
    },
}

impl BrokerError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BrokerError::HandlersFailed { .. } => "broker_handlers_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BrokerError::HandlersFailed { event, failures } => {
                let names: Vec<&str> = failures.iter().map(|f| f.handler.as_str()).collect();
                format!("event {event}: failed handlers={names:?}")
            }
        }
    }

    /// Failures carried by this error.
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            BrokerError::HandlersFailed { failures, .. } => failures,
        }
    }
}

/// # Errors produced by scheduled task execution.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Callback returned an error.
    #[error("execution failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Callback panicked; the panic was caught.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// Task was cancelled before it could run its callback.
    #[error("context cancelled")]
    Canceled,
}

impl TaskError {
    /// Shorthand for [`TaskError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        TaskError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Failed { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Failed { error } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
            TaskError::Canceled => "context cancelled".to_string(),
        }
    }
}

/// # Errors produced by plugin loading and delivery.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// A plugin module could not be loaded.
    #[error("failed loading plugin module {module}: {error}")]
    LoadFailed {
        /// Module name.
        module: String,
        /// The underlying error message.
        error: String,
    },

    /// A plugin factory could not build its instance.
    #[error("failed instantiating plugin export {export}: {error}")]
    InstantiateFailed {
        /// Export name.
        export: String,
        /// The underlying error message.
        error: String,
    },

    /// A plugin rejected an event.
    #[error("plugin {plugin} failed on event: {error}")]
    EventFailed {
        /// Plugin name.
        plugin: String,
        /// The underlying error message.
        error: String,
    },
}

impl PluginError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PluginError::LoadFailed { .. } => "plugin_load_failed",
            PluginError::InstantiateFailed { .. } => "plugin_instantiate_failed",
            PluginError::EventFailed { .. } => "plugin_event_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PluginError::LoadFailed { module, error } => format!("module {module}: {error}"),
            PluginError::InstantiateFailed { export, error } => {
                format!("export {export}: {error}")
            }
            PluginError::EventFailed { plugin, error } => format!("plugin {plugin}: {error}"),
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
