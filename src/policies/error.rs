//! # Error policies for handlers and scheduled tasks.
//!
//! [`ErrorPolicy`] determines what happens to a failure once it has been observed.
//!
//! - [`ErrorPolicy::LogAndContinue`] the failure is logged and execution goes on.
//! - [`ErrorPolicy::Propagate`] the failure is handed back to whoever awaits the result (default).
//!
//! ## Where it applies
//! ```text
//! Periodic task + LogAndContinue → tick fails → log → sleep → next tick
//! Periodic task + Propagate      → tick fails → loop ends → handle yields Err
//! One-off task  + LogAndContinue → callback fails → log → handle yields Ok
//! One-off task  + Propagate      → callback fails → handle yields Err
//! emit()        + LogAndContinue → all handlers finish → failures logged → Ok
//! emit()        + Propagate      → all handlers finish → failures logged → Err(all)
//! ```

/// Policy controlling what happens after a failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log the failure and keep going.
    LogAndContinue,
    /// Return the failure to the caller (default).
    #[default]
    Propagate,
}

impl ErrorPolicy {
    /// True for [`ErrorPolicy::Propagate`].
    #[inline]
    pub fn propagates(self) -> bool {
        matches!(self, ErrorPolicy::Propagate)
    }
}
