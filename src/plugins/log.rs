//! # LogPlugin: simple event logger
//!
//! A minimal plugin that logs every event it receives at `info`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO eventvisor::plugins::log: plugin event plugin="log" event="init" payload={"cfg":{"debug":false}}
//! INFO eventvisor::plugins::log: plugin event plugin="log" event="task.started" payload={"name":"t1"}
//! ```

use crate::error::PluginError;
use crate::events::Payload;
use crate::plugins::plugin::Plugin;

/// Event logging plugin.
#[derive(Default)]
pub struct LogPlugin;

impl LogPlugin {
    /// Construct a new [`LogPlugin`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for LogPlugin {
    fn name(&self) -> &str {
        "log"
    }

    fn on_event(&self, event: &str, payload: &Payload) -> Result<(), PluginError> {
        tracing::info!(plugin = "log", event, payload = %payload, "plugin event");
        Ok(())
    }
}
