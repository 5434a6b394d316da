//! Event handlers and the event broker.
//!
//! This module groups the handler **abstractions** and the **broker** that
//! keeps named subscription lists and dispatches emissions to them.
//!
//! ## Contents
//! - [`Handler`], [`HandlerKind`] a named sync or async handler with identity
//! - [`SyncHandler`], [`AsyncHandler`] traits behind the two handler variants
//! - [`HandlerFn`], [`AsyncHandlerFn`] closure-backed implementations
//! - [`EventBroker`] subscribe / unsubscribe / emit
//!
//! ## Quick reference
//! - **Publishers**: anything holding an `EventBroker` (usually behind an `Arc`).
//! - **Consumers**: handlers subscribed by name; plugins attached through
//!   [`PluginRegistry::attach`](crate::PluginRegistry::attach).

mod broker;
mod handler;

pub use broker::EventBroker;
pub use handler::{AsyncHandler, AsyncHandlerFn, Handler, HandlerFn, HandlerKind, Payload, SyncHandler};
