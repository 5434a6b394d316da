//! # Task specification for scheduled execution.
//!
//! Defines [`TaskSpec`] a bundle that describes how a task is scheduled
//! (periodic or once) and what a failure does.
//!
//! A spec can be created:
//! - **Periodic** with [`TaskSpec::periodic`] (failures logged, loop continues)
//! - **Once** with [`TaskSpec::once`] (failure returned to the awaiter)
//! - **Explicitly** with [`TaskSpec::new`] (full control)
//!
//! The spec is then passed to [`Scheduler::schedule`](crate::Scheduler::schedule).

use std::time::Duration;

use crate::policies::{ErrorPolicy, Schedule};
use crate::tasks::task::TaskRef;

/// Specification for running a task under the scheduler.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use eventvisor::{ErrorPolicy, Schedule, TaskError, TaskFn, TaskRef, TaskSpec};
///
/// let tick: TaskRef = TaskFn::arc("tick", |_ctx: CancellationToken| async move {
///     Ok::<(), TaskError>(())
/// });
///
/// let spec = TaskSpec::periodic(tick.clone(), Duration::from_secs(1));
/// assert_eq!(spec.on_error(), ErrorPolicy::LogAndContinue);
///
/// // Stop the loop at the first failure instead:
/// let strict = spec.with_on_error(ErrorPolicy::Propagate);
/// assert_eq!(strict.schedule(), Schedule::Periodic { interval: Duration::from_secs(1) });
///
/// let once = TaskSpec::once(tick, Duration::from_millis(10));
/// assert_eq!(once.on_error(), ErrorPolicy::Propagate);
/// ```
#[derive(Clone)]
pub struct TaskSpec {
    task: TaskRef,
    schedule: Schedule,
    on_error: ErrorPolicy,
}

impl TaskSpec {
    /// Creates a new task specification with explicit parameters.
    ///
    /// ### Parameters
    /// - `task`: Callback to execute
    /// - `schedule`: Periodic or once
    /// - `on_error`: Log-and-continue or propagate
    pub fn new(task: TaskRef, schedule: Schedule, on_error: ErrorPolicy) -> Self {
        Self {
            task,
            schedule,
            on_error,
        }
    }

    /// Periodic spec with [`ErrorPolicy::LogAndContinue`].
    pub fn periodic(task: TaskRef, interval: Duration) -> Self {
        Self::new(
            task,
            Schedule::Periodic { interval },
            ErrorPolicy::LogAndContinue,
        )
    }

    /// One-off spec with [`ErrorPolicy::Propagate`].
    pub fn once(task: TaskRef, delay: Duration) -> Self {
        Self::new(task, Schedule::Once { delay }, ErrorPolicy::Propagate)
    }

    /// Returns reference to the task.
    pub fn task(&self) -> &TaskRef {
        &self.task
    }

    /// Convenience: returns the task name.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Returns the schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Returns the error policy.
    pub fn on_error(&self) -> ErrorPolicy {
        self.on_error
    }

    /// Returns a new spec with updated error policy.
    pub fn with_on_error(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }

    /// Returns a new spec with updated schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }
}
