//! # EventBroker: named subscriptions with awaited fan-out.
//!
//! [`EventBroker`] keeps, per event name, an ordered list of [`Handler`]s and
//! dispatches each emission to all of them, **awaiting** their completion.
//!
//! ## What it guarantees
//! - `emit` returns only after every handler of that emission has finished.
//! - Handlers are started in subscription order (completion order is free).
//! - Async handlers run concurrently on the emitting task; sync handlers run on
//!   the blocking pool and never stall the runtime.
//! - A failing or panicking handler never prevents its siblings from running.
//! - The subscriber list is snapshotted before dispatch: subscribing or
//!   unsubscribing during an emission affects the next emission only.
//!
//! ## What it does **not** guarantee
//! - No ordering between a sync handler finishing and an async handler starting.
//! - No deduplication: the same handler subscribed twice runs twice.
//!
//! ## Diagram
//! ```text
//!    emit("task.started", payload)
//!        │  snapshot under read lock
//!        ├──► [Async h1] ──┐
//!        ├──► [Sync  h2] ──┼──► join_all ──► failures? ──► ErrorPolicy
//!        └──► [Async h3] ──┘        (spawn_blocking for Sync)
//! ```
//!
//! ## Failure policy
//! Every failure is logged at `warn`. With [`ErrorPolicy::Propagate`] (default)
//! `emit` then returns [`BrokerError::HandlersFailed`] listing **all** failures;
//! with [`ErrorPolicy::LogAndContinue`] it returns `Ok(())`.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{BrokerError, HandlerError, HandlerFailure, panic_message};
use crate::events::handler::{Handler, HandlerKind, Payload};
use crate::policies::ErrorPolicy;

/// Pub/sub broker mixing sync and async handlers.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct EventBroker {
    subscribers: RwLock<HashMap<String, Vec<Handler>>>,
    emit_errors: ErrorPolicy,
}

impl EventBroker {
    /// Creates an empty broker with [`ErrorPolicy::Propagate`].
    pub fn new() -> Self {
        Self::with_error_policy(ErrorPolicy::default())
    }

    /// Creates an empty broker with the given handler failure policy.
    pub fn with_error_policy(emit_errors: ErrorPolicy) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            emit_errors,
        }
    }

    /// Creates an empty broker configured from [`Config::emit_errors`].
    pub fn from_config(cfg: &Config) -> Self {
        Self::with_error_policy(cfg.emit_errors)
    }

    /// Returns the handler failure policy.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.emit_errors
    }

    /// Appends `handler` to the list for `event`, creating the list if absent.
    pub fn subscribe(&self, event: impl Into<String>, handler: Handler) {
        let event = event.into();
        tracing::debug!(
            event = %event,
            handler = handler.name(),
            is_async = handler.is_async(),
            "subscribed"
        );
        self.subscribers
            .write()
            .entry(event)
            .or_default()
            .push(handler);
    }

    /// Removes the first handler identical to `handler` from the list for `event`.
    ///
    /// Returns `true` if a handler was removed; absent handlers are a no-op.
    pub fn unsubscribe(&self, event: &str, handler: &Handler) -> bool {
        let mut subs = self.subscribers.write();
        let Some(list) = subs.get_mut(event) else {
            return false;
        };
        let Some(pos) = list.iter().position(|h| h.same_as(handler)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            subs.remove(event);
        }
        tracing::debug!(event, handler = handler.name(), "unsubscribed");
        true
    }

    /// Number of handlers currently subscribed to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.subscribers.read().get(event).map_or(0, Vec::len)
    }

    /// Sorted list of event names with at least one handler.
    pub fn events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.subscribers.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Drops every handler for `event`; returns how many were removed.
    pub fn clear(&self, event: &str) -> usize {
        self.subscribers
            .write()
            .remove(event)
            .map_or(0, |list| list.len())
    }

    fn snapshot(&self, event: &str) -> Vec<Handler> {
        self.subscribers
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    /// Emits `event` with `payload` to every current subscriber and waits for all of them.
    ///
    /// Handlers receive the event name first, then the payload. Several
    /// positional values can be sent as a JSON array.
    ///
    /// # Errors
    /// With [`ErrorPolicy::Propagate`], returns [`BrokerError::HandlersFailed`]
    /// if at least one handler failed or panicked. The error is produced only
    /// after every handler has completed.
    pub async fn emit(&self, event: &str, payload: Payload) -> Result<(), BrokerError> {
        let handlers = self.snapshot(event);
        if handlers.is_empty() {
            tracing::trace!(event, "no subscribers");
            return Ok(());
        }
        tracing::debug!(event, handlers = handlers.len(), "emitting");

        let name: Arc<str> = Arc::from(event);
        let payload = Arc::new(payload);
        let calls: Vec<BoxFuture<'static, Result<(), HandlerError>>> = handlers
            .iter()
            .map(|h| dispatch(h, Arc::clone(&name), Arc::clone(&payload)))
            .collect();
        let results = join_all(calls).await;

        let failures: Vec<HandlerFailure> = handlers
            .iter()
            .zip(results)
            .enumerate()
            .filter_map(|(position, (handler, res))| {
                res.err().map(|error| HandlerFailure {
                    handler: handler.name().to_string(),
                    position,
                    error,
                })
            })
            .collect();

        if failures.is_empty() {
            return Ok(());
        }
        for f in &failures {
            tracing::warn!(
                event,
                handler = %f.handler,
                position = f.position,
                label = f.error.as_label(),
                error = %f.error,
                "handler failed"
            );
        }
        match self.emit_errors {
            ErrorPolicy::Propagate => Err(BrokerError::HandlersFailed {
                event: event.to_string(),
                failures,
            }),
            ErrorPolicy::LogAndContinue => Ok(()),
        }
    }
}

impl Default for EventBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// Starts one handler invocation.
///
/// Sync handlers are handed to the blocking pool right away; async handlers
/// are polled by the caller's `join_all`.
fn dispatch(
    handler: &Handler,
    event: Arc<str>,
    payload: Arc<Payload>,
) -> BoxFuture<'static, Result<(), HandlerError>> {
    match handler.kind() {
        HandlerKind::Sync(h) => {
            let h = Arc::clone(h);
            let join = tokio::task::spawn_blocking(move || h.call(&event, &payload));
            async move {
                match join.await {
                    Ok(res) => res,
                    Err(je) if je.is_panic() => Err(HandlerError::Panicked {
                        info: panic_message(je.into_panic().as_ref()),
                    }),
                    Err(_) => Err(HandlerError::Canceled),
                }
            }
            .boxed()
        }
        HandlerKind::Async(h) => {
            let h = Arc::clone(h);
            async move {
                let fut = async { h.call(&event, &payload).await };
                match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(res) => res,
                    Err(panic_err) => Err(HandlerError::Panicked {
                        info: panic_message(panic_err.as_ref()),
                    }),
                }
            }
            .boxed()
        }
    }
}
