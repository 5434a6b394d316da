//! # Drive one scheduled task to completion.
//!
//! [`run`] executes a [`TaskSpec`] according to its [`Schedule`] and applies
//! its [`ErrorPolicy`] to every invocation failure.
//!
//! ## Flow
//! ```text
//! Periodic { interval }:
//!   loop {
//!     ├─► cancelled? ──► exit Ok
//!     ├─► invoke(task)
//!     │     ├─ Ok   ──► continue
//!     │     └─ Err  ──► LogAndContinue: log error, continue
//!     │                 Propagate:      log error, exit Err
//!     └─► sleep(interval) | cancelled ──► exit Ok
//!   }
//!
//! Once { delay }:
//!   sleep(delay) | cancelled ──► exit Err(Canceled)
//!   invoke(task)
//!     ├─ Ok  ──► exit Ok
//!     └─ Err ──► Propagate: exit Err
//!                LogAndContinue: log error, exit Ok
//! ```
//!
//! ## Rules
//! - Invocations run **sequentially** within one task (never overlapping)
//! - Cancellation is observed at **safe points** only: loop head and sleeps
//! - A running invocation is never interrupted; it receives a child token
//! - Panics inside an invocation are caught and treated as failures

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    config::MIN_INTERVAL,
    error::{TaskError, panic_message},
    policies::{ErrorPolicy, Schedule},
    tasks::{Task, TaskSpec},
};

/// Runs `spec` until it completes, fails (per policy) or `token` is cancelled.
pub(crate) async fn run(spec: TaskSpec, token: CancellationToken) -> Result<(), TaskError> {
    match spec.schedule() {
        Schedule::Periodic { interval } => {
            run_periodic(spec.task().as_ref(), interval, spec.on_error(), &token).await
        }
        Schedule::Once { delay } => {
            run_after(spec.task().as_ref(), delay, spec.on_error(), &token).await
        }
    }
}

async fn run_periodic(
    task: &dyn Task,
    interval: Duration,
    on_error: ErrorPolicy,
    token: &CancellationToken,
) -> Result<(), TaskError> {
    let interval = interval.max(MIN_INTERVAL);
    let mut tick: u64 = 0;

    loop {
        if token.is_cancelled() {
            break;
        }
        tick += 1;
        tracing::trace!(task = task.name(), tick, "tick");

        if let Err(e) = invoke(task, token).await {
            tracing::error!(
                task = task.name(),
                tick,
                label = e.as_label(),
                error = %e,
                "scheduled task error"
            );
            if on_error.propagates() {
                return Err(e);
            }
        }

        let sleep = time::sleep(interval);
        tokio::pin!(sleep);
        select! {
            biased;
            _ = token.cancelled() => break,
            _ = &mut sleep => {}
        }
    }

    tracing::debug!(task = task.name(), ticks = tick, "periodic task stopped");
    Ok(())
}

async fn run_after(
    task: &dyn Task,
    delay: Duration,
    on_error: ErrorPolicy,
    token: &CancellationToken,
) -> Result<(), TaskError> {
    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!(task = task.name(), "one-off task cancelled before firing");
            return Err(TaskError::Canceled);
        }
        _ = &mut sleep => {}
    }

    match invoke(task, token).await {
        Ok(()) => Ok(()),
        Err(e) if on_error.propagates() => Err(e),
        Err(e) => {
            tracing::error!(
                task = task.name(),
                label = e.as_label(),
                error = %e,
                "scheduled task error"
            );
            Ok(())
        }
    }
}

/// Runs one invocation with a child token, turning panics into [`TaskError::Panicked`].
async fn invoke(task: &dyn Task, parent: &CancellationToken) -> Result<(), TaskError> {
    let fut = task.spawn(parent.child_token());
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => Err(TaskError::Panicked {
            info: panic_message(panic_err.as_ref()),
        }),
    }
}
