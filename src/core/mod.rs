//! Runtime core: scheduling and task lifecycle.
//!
//! The public API from this module is [`Scheduler`], which spawns and tracks
//! background tasks, and [`TaskHandle`], returned for each of them.
//!
//! Internal modules:
//! - `runner`: drives one task per its schedule and error policy;
//! - `scheduler`: spawns tasks, tracks their tokens, bulk cancellation;
//! - `handle`: awaitable, cancelable per-task handle.

mod handle;
mod runner;
mod scheduler;

pub use handle::TaskHandle;
pub use scheduler::Scheduler;
