//! # Scheduled callbacks and their specifications.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for async, cancelable callbacks
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskSpec`] - a task bundled with its [`Schedule`](crate::Schedule) and [`ErrorPolicy`](crate::ErrorPolicy)

mod spec;
mod task;
mod task_fn;

pub use spec::TaskSpec;
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
