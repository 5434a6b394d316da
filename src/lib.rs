//! # eventvisor
//!
//! **Eventvisor** is a small in-process toolkit for async applications built
//! on tokio. It bundles three independent pieces that a host usually wires
//! together at startup:
//!
//! - an [`EventBroker`] mapping event names to sync and async handlers;
//! - a [`Scheduler`] running callbacks periodically or once after a delay;
//! - [`discover`]y of [`Plugin`]s from an explicit [`Namespace`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//!   │  Scheduler   │        │ EventBroker  │        │  Namespace   │
//!   │ (task specs) │        │(subscriptions│        │  (modules)   │
//!   └──────┬───────┘        └──────┬───────┘        └──────┬───────┘
//!          ▼                       ▼                       ▼
//!   ┌──────────────┐        ┌──────────────┐        ┌──────────────┐
//!   │ runner::run  │ emit() │   dispatch   │        │  discover()  │
//!   │ (per task)   │───────►│ sync ─► pool │        │ load ─► skip │
//!   │ tick / sleep │        │ async ─► join│        │ build─► skip │
//!   └──────────────┘        └──────┬───────┘        └──────┬───────┘
//!                                  ▼                       ▼
//!                          handler failures         PluginRegistry
//!                          ─► warn + policy         ├─ broadcast()
//!                                                   └─ attach(&broker)
//! ```
//!
//! ### Emission
//! ```text
//! emit(event, payload)
//!   ├─► snapshot handlers for `event` (subscriptions after this point don't apply)
//!   ├─► start all of them concurrently:
//!   │     ├─ Sync  ─► spawn_blocking(handler.call)
//!   │     └─ Async ─► handler.call(...).catch_unwind()
//!   ├─► await every handler (join_all)
//!   └─► failures: each logged at warn, then
//!         ├─ ErrorPolicy::LogAndContinue ─► Ok(())
//!         └─ ErrorPolicy::Propagate      ─► Err(BrokerError::HandlersFailed)
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                              |
//! |-------------------|-----------------------------------------------------------------|-------------------------------------------------|
//! | **Events**        | Named subscriptions, concurrent dispatch, handler identity.     | [`EventBroker`], [`Handler`], [`Payload`]       |
//! | **Scheduling**    | Periodic and one-off callbacks with cooperative cancellation.   | [`Scheduler`], [`TaskHandle`], [`TaskSpec`]     |
//! | **Plugins**       | Explicit namespaces, isolated discovery, broadcast to plugins.  | [`Plugin`], [`Namespace`], [`PluginRegistry`]   |
//! | **Policies**      | When tasks fire and what failures do.                           | [`Schedule`], [`ErrorPolicy`]                   |
//! | **Errors**        | Typed errors for handlers, tasks and plugins.                   | [`BrokerError`], [`TaskError`], [`PluginError`] |
//! | **Configuration** | Application-wide settings with sane defaults.                   | [`Config`]                                      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogPlugin`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use eventvisor::{Config, EventBroker, Handler, HandlerError, Payload, Scheduler, TaskError, TaskFn};
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::default().with_interval(Duration::from_millis(50));
//!     let broker = EventBroker::from_config(&cfg);
//!
//!     broker.subscribe(
//!         "task.started",
//!         Handler::sync_fn("print", |event: &str, payload: &Payload| {
//!             println!("{event}: {payload}");
//!             Ok::<_, HandlerError>(())
//!         }),
//!     );
//!     broker.emit("task.started", json!({"name": "t1"})).await?;
//!
//!     let scheduler = Scheduler::from_config(&cfg);
//!     scheduler.schedule_periodic_default(TaskFn::arc("tick", |_ctx: CancellationToken| async move {
//!         Ok::<_, TaskError>(())
//!     }));
//!     tokio::time::sleep(Duration::from_millis(120)).await;
//!     scheduler.cancel_all();
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod plugins;
mod policies;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Scheduler, TaskHandle};
pub use error::{BrokerError, HandlerError, HandlerFailure, PluginError, TaskError};
pub use events::{
    AsyncHandler, AsyncHandlerFn, EventBroker, Handler, HandlerFn, HandlerKind, Payload,
    SyncHandler,
};
pub use plugins::{Export, Namespace, Plugin, PluginFn, PluginModule, PluginRef, PluginRegistry, discover};
pub use policies::{ErrorPolicy, Schedule};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef, TaskSpec};

// Optional: expose a simple built-in logging plugin (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use plugins::LogPlugin;
