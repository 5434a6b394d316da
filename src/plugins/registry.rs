//! # PluginRegistry: the host's list of plugins.
//!
//! The registry is filled once at startup (explicit [`register`](PluginRegistry::register)
//! calls or [`discover`](crate::discover) results) and then used to fan events
//! out to plugins, either directly or through an [`EventBroker`].
//!
//! ## Delivery paths
//! ```text
//! broadcast(event, payload) ──► p1.on_event ─┐
//!                           ──► p2.on_event ─┼─► failures logged + collected
//!                           ──► pN.on_event ─┘
//!
//! attach(&broker, event) ──► broker.subscribe(event, Handler::sync(p.on_event)) per plugin
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::error::{HandlerError, PluginError, panic_message};
use crate::events::{EventBroker, Handler, Payload};
use crate::plugins::discover::discover;
use crate::plugins::namespace::Namespace;
use crate::plugins::plugin::PluginRef;

/// Ordered list of plugins.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<PluginRef>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from an explicit list.
    pub fn from_plugins(plugins: Vec<PluginRef>) -> Self {
        Self { plugins }
    }

    /// Creates a registry from everything [`discover`] finds in `namespace`.
    pub fn discover(namespace: &Namespace) -> Self {
        Self::from_plugins(discover(namespace))
    }

    /// Appends a plugin.
    pub fn register(&mut self, plugin: PluginRef) {
        tracing::debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.push(plugin);
    }

    /// Plugins in registration order.
    pub fn plugins(&self) -> &[PluginRef] {
        &self.plugins
    }

    /// Plugin names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// First plugin named `name`.
    pub fn get(&self, name: &str) -> Option<&PluginRef> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// True if there are no plugins.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Calls `on_event` on every plugin in order.
    ///
    /// Failures (errors or panics) are logged at `warn` and returned; they never
    /// stop delivery to the remaining plugins.
    pub fn broadcast(&self, event: &str, payload: &Payload) -> Vec<PluginError> {
        let mut failures = Vec::new();
        for plugin in &self.plugins {
            let res = catch_unwind(AssertUnwindSafe(|| plugin.on_event(event, payload)))
                .unwrap_or_else(|panic_err| {
                    Err(PluginError::EventFailed {
                        plugin: plugin.name().to_string(),
                        error: panic_message(panic_err.as_ref()),
                    })
                });
            if let Err(e) = res {
                tracing::warn!(
                    plugin = plugin.name(),
                    event,
                    label = e.as_label(),
                    error = %e,
                    "plugin error"
                );
                failures.push(e);
            }
        }
        failures
    }

    /// Subscribes every plugin to `event` on `broker` as a sync handler.
    ///
    /// Returns the handlers so the caller can unsubscribe them later.
    pub fn attach(&self, broker: &EventBroker, event: &str) -> Vec<Handler> {
        self.plugins
            .iter()
            .map(|plugin| {
                let handler = plugin_handler(Arc::clone(plugin));
                broker.subscribe(event, handler.clone());
                handler
            })
            .collect()
    }
}

fn plugin_handler(plugin: PluginRef) -> Handler {
    let name = format!("plugin:{}", plugin.name());
    Handler::sync_fn(name, move |event: &str, payload: &Payload| {
        plugin
            .on_event(event, payload)
            .map_err(|e| HandlerError::failed(e.to_string()))
    })
}
