//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: a named callback the
//! [`Scheduler`](crate::Scheduler) invokes once or periodically. The common
//! handle type is [`TaskRef`], an `Arc<dyn Task>` suitable for sharing across
//! the runtime.
//!
//! Each invocation receives a [`CancellationToken`]. The scheduler never
//! interrupts a running invocation; long callbacks may check the token to stop
//! early after [`Scheduler::cancel_all`](crate::Scheduler::cancel_all).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared task handle.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous, cancelable callback.
///
/// A `Task` has a stable [`name`](Task::name) and produces a **fresh** future
/// per invocation via [`spawn`](Task::spawn).
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use eventvisor::{BoxTaskFuture, Task};
///
/// struct Tick;
///
/// impl Task for Tick {
///     fn name(&self) -> &str { "tick" }
///
///     fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Ok(());
///             }
///             // do work...
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates the future for one invocation.
    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture;
}
