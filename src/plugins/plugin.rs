//! # Plugin capability.
//!
//! [`Plugin`] is the minimal shape an object must expose to be treated as a
//! plugin: a stable name and a synchronous `on_event` hook. [`PluginFn`] wraps a
//! plain closure into a plugin.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::PluginError;
use crate::events::Payload;

/// Shared plugin handle.
pub type PluginRef = Arc<dyn Plugin>;

/// Plugin capability: `{ name, on_event(event, payload) }`.
///
/// `on_event` may be called from the blocking pool when the plugin is attached
/// to a broker, so it may block briefly but must be `Send + Sync`.
pub trait Plugin: Send + Sync + 'static {
    /// Plugin name (for logs and lookups).
    fn name(&self) -> &str;

    /// Reacts to one event.
    fn on_event(&self, event: &str, payload: &Payload) -> Result<(), PluginError>;
}

/// Closure-backed plugin.
///
/// ## Example
/// ```rust
/// use eventvisor::{Payload, Plugin, PluginFn, PluginRef};
///
/// let p: PluginRef = PluginFn::arc("printer", |event: &str, payload: &Payload| {
///     println!("[printer] {event}: {payload}");
///     Ok(())
/// });
/// assert_eq!(p.name(), "printer");
/// ```
pub struct PluginFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> PluginFn<F>
where
    F: Fn(&str, &Payload) -> Result<(), PluginError> + Send + Sync + 'static,
{
    /// Wraps a closure.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Wraps a closure and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Plugin for PluginFn<F>
where
    F: Fn(&str, &Payload) -> Result<(), PluginError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &str, payload: &Payload) -> Result<(), PluginError> {
        (self.f)(event, payload)
    }
}
