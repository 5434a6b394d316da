//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the broker, the scheduler and
//! the plugin registry.
//!
//! Config is used in three ways:
//! 1. **Broker creation**: `EventBroker::from_config(&config)`
//! 2. **Scheduler creation**: `Scheduler::from_config(&config)`
//! 3. **Host decisions**: `plugins_enabled`, `debug`, `app_name`
//!
//! ## Sentinel values
//! - `interval = 0s` → clamped to 1ms by [`Config::interval_clamped`] (a zero interval would spin)

use std::time::Duration;

use crate::policies::ErrorPolicy;

/// Smallest periodic interval the scheduler accepts.
pub(crate) const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Global configuration.
///
/// Config values are immutable once handed out; use the `with_*` methods to
/// derive a modified copy (e.g. a temporary debug override).
///
/// ## Field semantics
/// - `app_name`: Name used in log lines emitted by the host
/// - `debug`: Host-level verbosity toggle
/// - `interval`: Default interval for [`Scheduler::schedule_periodic_default`](crate::Scheduler::schedule_periodic_default)
/// - `plugins_enabled`: Whether the host should run plugin discovery
/// - `emit_errors`: What [`EventBroker::emit`](crate::EventBroker::emit) does with handler failures
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Application name.
    pub app_name: String,

    /// Debug toggle.
    pub debug: bool,

    /// Default periodic interval.
    ///
    /// - `Duration::ZERO` is treated as 1ms
    pub interval: Duration,

    /// Whether plugin discovery should run.
    pub plugins_enabled: bool,

    /// Handler failure policy for emissions.
    ///
    /// - `Propagate`: `emit` returns every failure after all handlers completed
    /// - `LogAndContinue`: failures are only logged
    pub emit_errors: ErrorPolicy,
}

impl Config {
    /// Returns the default interval clamped to a minimum of 1ms.
    #[inline]
    pub fn interval_clamped(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    /// Returns a copy with `debug` replaced.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns a copy with `interval` replaced.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns a copy with `app_name` replaced.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Returns a copy with `plugins_enabled` replaced.
    #[must_use]
    pub fn with_plugins_enabled(mut self, enabled: bool) -> Self {
        self.plugins_enabled = enabled;
        self
    }

    /// Returns a copy with `emit_errors` replaced.
    #[must_use]
    pub fn with_emit_errors(mut self, policy: ErrorPolicy) -> Self {
        self.emit_errors = policy;
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `app_name = "eventvisor"`
    /// - `debug = false`
    /// - `interval = 1s`
    /// - `plugins_enabled = true`
    /// - `emit_errors = ErrorPolicy::Propagate`
    fn default() -> Self {
        Self {
            app_name: "eventvisor".to_string(),
            debug: false,
            interval: Duration::from_secs(1),
            plugins_enabled: true,
            emit_errors: ErrorPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.app_name, "eventvisor");
        assert!(!cfg.debug);
        assert_eq!(cfg.interval, Duration::from_secs(1));
        assert!(cfg.plugins_enabled);
        assert_eq!(cfg.emit_errors, ErrorPolicy::Propagate);
    }

    #[test]
    fn test_override_leaves_original_untouched() {
        let cfg = Config::default();
        let tmp = cfg.clone().with_debug(true).with_app_name("tmp");
        assert!(tmp.debug);
        assert_eq!(tmp.app_name, "tmp");
        assert!(!cfg.debug);
        assert_eq!(cfg.app_name, "eventvisor");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let cfg = Config::default().with_interval(Duration::ZERO);
        assert_eq!(cfg.interval_clamped(), Duration::from_millis(1));

        let cfg = Config::default().with_interval(Duration::from_millis(250));
        assert_eq!(cfg.interval_clamped(), Duration::from_millis(250));
    }
}
