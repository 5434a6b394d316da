//! # Plugins: capability trait, explicit namespaces and discovery.
//!
//! A plugin is anything exposing a name and an `on_event(event, payload)` hook
//! ([`Plugin`]). Plugins are not found by scanning: the host composes a
//! [`Namespace`] of [`PluginModule`]s, each a named loader that yields
//! [`Export`]s (plugin factories or ready instances). [`discover`] loads the
//! namespace once at startup and returns the plugins it could build.
//!
//! ## Architecture
//! ```text
//! Namespace "app.plugins"
//!   ├─ PluginModule "sample"  ──load()──► [Factory "SamplePlugin", Instance "plugin_instance"]
//!   └─ PluginModule "broken"  ──load()──► Err ──► warn, skip
//!                     │
//!                     ▼
//!               discover() ──► Vec<PluginRef> ──► PluginRegistry
//!                                                   ├─ broadcast(event, payload)
//!                                                   └─ attach(&broker, event)
//! ```
//!
//! ## Failure isolation
//! A module that fails to load, or a factory that fails (or panics) while
//! building its plugin, is skipped with a `warn` log. Discovery never fails as
//! a whole.

mod discover;
#[cfg(feature = "logging")]
mod log;
mod namespace;
mod plugin;
mod registry;

pub use discover::discover;
#[cfg(feature = "logging")]
pub use log::LogPlugin;
pub use namespace::{Export, Namespace, PluginModule};
pub use plugin::{Plugin, PluginFn, PluginRef};
pub use registry::PluginRegistry;
