//! Scheduling and error-handling policies.
//!
//! This module groups the knobs that control **when** a scheduled callback
//! runs and **what happens** when a callback or handler fails.
//!
//! ## Contents
//! - [`Schedule`]    when a task fires (periodic every `interval` / once after `delay`)
//! - [`ErrorPolicy`] what a failure does (log and continue / propagate to the awaiter)
//!
//! ## Quick wiring
//! ```text
//! TaskSpec { task: TaskRef, schedule: Schedule, on_error: ErrorPolicy }
//!      └─► core::runner uses:
//!           - schedule to decide sleep placement and repetition
//!           - on_error to decide log-and-continue vs stop-and-return
//!
//! EventBroker { emit_errors: ErrorPolicy }
//!      └─► emit() uses it to decide whether handler failures are returned
//! ```
//!
//! ## Defaults
//! - `ErrorPolicy::Propagate` (nothing is silently swallowed unless asked).
//! - `Scheduler::schedule_periodic` uses `LogAndContinue`, `schedule_once` uses `Propagate`.

mod error;
mod schedule;

pub use error::ErrorPolicy;
pub use schedule::Schedule;
