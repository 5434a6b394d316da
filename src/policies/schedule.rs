//! # Schedules for background tasks.
//!
//! [`Schedule`] describes when a scheduled callback fires:
//!
//! ```text
//! Periodic { interval } → run, sleep(interval), run, sleep(interval), ... until cancelled
//! Once { delay }        → sleep(delay), run, exit
//! ```
//!
//! The first periodic run happens immediately; the interval is measured from
//! the end of one run to the start of the next.

use std::time::Duration;

/// Timing of a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Run repeatedly with `interval` between runs until cancelled.
    Periodic {
        /// Pause after each run.
        interval: Duration,
    },
    /// Run once after `delay`.
    Once {
        /// Pause before the single run.
        delay: Duration,
    },
}

impl Schedule {
    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Schedule::Periodic { .. } => "periodic",
            Schedule::Once { .. } => "once",
        }
    }

    /// True for [`Schedule::Periodic`].
    pub fn is_periodic(&self) -> bool {
        matches!(self, Schedule::Periodic { .. })
    }
}
