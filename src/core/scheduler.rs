//! # Scheduler: spawns and tracks periodic and one-off tasks.
//!
//! The [`Scheduler`] turns a [`TaskSpec`] into a background tokio task, keeps
//! the task's cancellation token, and hands back a [`TaskHandle`].
//!
//! ## Architecture
//! ```text
//! schedule_periodic(task, interval) ─┐
//! schedule_once(delay, task) ────────┼──► schedule(TaskSpec)
//!                                    │       ├─► prune finished entries
//!                                    │       ├─► token = CancellationToken::new()
//!                                    │       ├─► tokio::spawn(runner::run(spec, token))
//!                                    │       ├─► track { name, token, abort }
//!                                    │       └─► TaskHandle
//!
//! cancel_all() ──► token.cancel() for every tracked entry ──► clear tracking
//! ```
//!
//! ## Rules
//! - Cancellation is cooperative: sleeps wake immediately, a running callback finishes.
//! - `cancel_all` only affects tasks scheduled before it; later calls schedule normally.
//! - Dropping the scheduler cancels everything it still tracks.
//! - Scheduling calls must run inside a Tokio runtime (they call `tokio::spawn`).

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::{handle::TaskHandle, runner},
    tasks::{TaskRef, TaskSpec},
};

/// A tracked, possibly still running task.
struct Tracked {
    name: String,
    cancel: CancellationToken,
    abort: AbortHandle,
}

/// Spawns periodic and delayed tasks and cancels them in bulk.
pub struct Scheduler {
    tracked: Mutex<Vec<Tracked>>,
    default_interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler whose default interval is [`Config::default`]'s.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates a scheduler using [`Config::interval_clamped`] as default interval.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            tracked: Mutex::new(Vec::new()),
            default_interval: cfg.interval_clamped(),
        }
    }

    /// Default interval used by [`schedule_periodic_default`](Self::schedule_periodic_default).
    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Spawns `spec` and tracks it.
    pub fn schedule(&self, spec: TaskSpec) -> TaskHandle {
        let name = spec.name().to_string();
        let schedule = spec.schedule();
        let cancel = CancellationToken::new();

        let join = tokio::spawn(runner::run(spec, cancel.clone()));

        let mut tracked = self.tracked.lock();
        tracked.retain(|t| !t.abort.is_finished());
        tracked.push(Tracked {
            name: name.clone(),
            cancel: cancel.clone(),
            abort: join.abort_handle(),
        });
        drop(tracked);

        tracing::debug!(task = %name, schedule = schedule.as_label(), "task scheduled");
        TaskHandle::new(name, cancel, join)
    }

    /// Calls `task` now and then every `interval` until cancelled.
    ///
    /// Failures are logged and the loop continues.
    pub fn schedule_periodic(&self, task: TaskRef, interval: Duration) -> TaskHandle {
        self.schedule(TaskSpec::periodic(task, interval))
    }

    /// [`schedule_periodic`](Self::schedule_periodic) with the configured default interval.
    pub fn schedule_periodic_default(&self, task: TaskRef) -> TaskHandle {
        self.schedule_periodic(task, self.default_interval)
    }

    /// Calls `task` once after `delay`.
    ///
    /// A failure is returned to whoever awaits the handle.
    pub fn schedule_once(&self, delay: Duration, task: TaskRef) -> TaskHandle {
        self.schedule(TaskSpec::once(task, delay))
    }

    /// Requests cancellation of every tracked task and clears tracking.
    ///
    /// Returns how many tasks were still running.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Tracked> = self.tracked.lock().drain(..).collect();
        let mut live = 0;
        for t in &drained {
            t.cancel.cancel();
            if !t.abort.is_finished() {
                live += 1;
            }
        }
        tracing::debug!(cancelled = live, "scheduler cancel_all");
        live
    }

    /// Number of tracked tasks that have not finished yet.
    pub fn len(&self) -> usize {
        self.tracked
            .lock()
            .iter()
            .filter(|t| !t.abort.is_finished())
            .count()
    }

    /// True if no tracked task is running.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted names of tracked tasks that have not finished yet.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tracked
            .lock()
            .iter()
            .filter(|t| !t.abort.is_finished())
            .map(|t| t.name.clone())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for t in self.tracked.get_mut().drain(..) {
            t.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::policies::{ErrorPolicy, Schedule};
    use crate::tasks::TaskFn;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const T: Duration = Duration::from_millis(100);

    fn counting(name: &'static str, hits: &Arc<AtomicUsize>) -> TaskRef {
        let hits = Arc::clone(hits);
        TaskFn::arc(name, move |_ctx: CancellationToken| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TaskError>(())
            }
        })
    }

    fn failing(name: &'static str, hits: &Arc<AtomicUsize>) -> TaskRef {
        let hits = Arc::clone(hits);
        TaskFn::arc(name, move |_ctx: CancellationToken| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TaskError::failed("boom"))
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_ticks_at_least_three_times() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let _h = sched.schedule_periodic(counting("tick", &hits), T);

        tokio::time::sleep(T * 3 + T / 2).await;

        assert!(hits.load(Ordering::SeqCst) >= 3);
        assert_eq!(sched.names(), vec!["tick".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_failure_does_not_stop_ticks() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = sched.schedule_periodic(failing("flaky", &hits), T);

        tokio::time::sleep(T * 3 + T / 2).await;

        assert!(hits.load(Ordering::SeqCst) >= 3);
        assert!(!h.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_panic_does_not_stop_ticks() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let task: TaskRef = TaskFn::arc("panicky", move |_ctx: CancellationToken| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    panic!("first tick explodes");
                }
                Ok::<_, TaskError>(())
            }
        });
        let _h = sched.schedule_periodic(task, T);

        tokio::time::sleep(T * 3 + T / 2).await;

        assert!(hits.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_propagate_stops_at_first_failure() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let spec = TaskSpec::periodic(failing("strict", &hits), T)
            .with_on_error(ErrorPolicy::Propagate);

        let res = sched.schedule(spec).await;

        assert_eq!(res, Err(TaskError::failed("boom")));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_runs_after_delay() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = sched.schedule_once(T, counting("later", &hits));

        tokio::time::sleep(T / 2).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert_eq!(h.join().await, Ok(()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_failure_propagates_to_awaiter() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = sched.schedule_once(T, failing("once", &hits));

        assert_eq!(h.await, Err(TaskError::failed("boom")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_log_and_continue_swallows_failure() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let spec = TaskSpec::new(
            failing("lenient", &hits),
            Schedule::Once { delay: T },
            ErrorPolicy::LogAndContinue,
        );

        assert_eq!(sched.schedule(spec).await, Ok(()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_right_after_scheduling_stops_ticks() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = sched.schedule_periodic(counting("tick", &hits), T);

        assert_eq!(sched.cancel_all(), 1);
        assert!(sched.is_empty());
        assert!(h.is_cancelled());

        let at_cancel = hits.load(Ordering::SeqCst);
        tokio::time::sleep(T * 5).await;

        assert!(hits.load(Ordering::SeqCst) <= at_cancel + 1);
        assert_eq!(h.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_tick_lets_tick_finish() {
        let sched = Scheduler::new();
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        let task: TaskRef = TaskFn::arc("slow", move |_ctx: CancellationToken| {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(T).await;
                f.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TaskError>(())
            }
        });
        let h = sched.schedule_periodic(task, T);

        tokio::time::sleep(T / 2).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);
        sched.cancel_all();

        assert_eq!(h.await, Ok(()));
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_once_reports_canceled() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = sched.schedule_once(T, counting("never", &hits));

        h.cancel();

        assert_eq!(h.await, Err(TaskError::Canceled));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduling_after_cancel_all_works() {
        let sched = Scheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let _old = sched.schedule_periodic(counting("old", &hits), T);
        sched.cancel_all();

        let h = sched.schedule_once(T, counting("new", &hits));
        assert_eq!(sched.len(), 1);
        assert_eq!(h.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_tracked_tasks() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = {
            let sched = Scheduler::new();
            sched.schedule_once(T, counting("orphan", &hits))
        };

        assert_eq!(h.await, Err(TaskError::Canceled));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_interval_comes_from_config() {
        let cfg = Config::default().with_interval(T);
        let sched = Scheduler::from_config(&cfg);
        assert_eq!(sched.default_interval(), T);

        let hits = Arc::new(AtomicUsize::new(0));
        let _h = sched.schedule_periodic_default(counting("cfg", &hits));
        tokio::time::sleep(T * 2 + T / 2).await;
        assert!(hits.load(Ordering::SeqCst) >= 2);
    }
}
