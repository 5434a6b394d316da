//! # Handle to a scheduled task.
//!
//! [`TaskHandle`] is returned by every scheduling call. It can cancel its task
//! and can be awaited for the task outcome:
//!
//! ```text
//! periodic, cancelled            ──► Ok(())
//! periodic + Propagate, failed   ──► Err(first failure)
//! once, callback ok              ──► Ok(())
//! once + Propagate, failed       ──► Err(failure)
//! once, cancelled before firing  ──► Err(Canceled)
//! ```
//!
//! Dropping a handle does **not** cancel the task; the scheduler keeps tracking it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{TaskError, panic_message};

/// Awaitable, cancelable handle to a scheduled task.
#[derive(Debug)]
pub struct TaskHandle {
    name: String,
    cancel: CancellationToken,
    join: JoinHandle<Result<(), TaskError>>,
}

impl TaskHandle {
    pub(crate) fn new(
        name: String,
        cancel: CancellationToken,
        join: JoinHandle<Result<(), TaskError>>,
    ) -> Self {
        Self { name, cancel, join }
    }

    /// Task name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests cooperative cancellation of this task only.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once cancellation was requested (by this handle or `cancel_all`).
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the task to exit and returns its outcome.
    ///
    /// Same as awaiting the handle directly.
    pub async fn join(self) -> Result<(), TaskError> {
        self.await
    }
}

impl Future for TaskHandle {
    type Output = Result<(), TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.join).poll(cx).map(|res| match res {
            Ok(out) => out,
            Err(je) if je.is_panic() => Err(TaskError::Panicked {
                info: panic_message(je.into_panic().as_ref()),
            }),
            Err(_) => Err(TaskError::Canceled),
        })
    }
}
