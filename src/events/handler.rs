//! # Event handlers (sync and async) and closure-backed implementations.
//!
//! A [`Handler`] is what an [`EventBroker`](crate::EventBroker) calls for each
//! emission. It is polymorphic over two variants:
//!
//! - [`HandlerKind::Sync`] a blocking callable, run on tokio's blocking pool so it
//!   never stalls the runtime;
//! - [`HandlerKind::Async`] an async callable, run concurrently with its peers.
//!
//! Both receive the event name and a reference to the emitted [`Payload`].
//!
//! ## Identity
//! A handler's identity is the shared allocation behind it. Clones of a
//! `Handler` are the same handler: subscribing a clone twice yields two
//! invocations, and `unsubscribe` with any clone removes the first match.
//!
//! ## Example
//! ```rust
//! use eventvisor::{Handler, HandlerError, Payload};
//!
//! let h = Handler::sync_fn("print", |event: &str, payload: &Payload| {
//!     println!("{event}: {payload}");
//!     Ok::<_, HandlerError>(())
//! });
//! let ah = Handler::async_fn("print-async", |event: String, payload: Payload| async move {
//!     println!("async {event}: {payload}");
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert!(!h.is_async());
//! assert!(ah.is_async());
//! assert!(h.same_as(&h.clone()));
//! assert!(!h.same_as(&ah));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;

/// Payload carried by an emission.
pub type Payload = serde_json::Value;

/// Blocking event handler.
///
/// Called from tokio's blocking pool; may perform blocking I/O or CPU-bound work.
pub trait SyncHandler: Send + Sync + 'static {
    /// Handles one emission.
    fn call(&self, event: &str, payload: &Payload) -> Result<(), HandlerError>;
}

/// Asynchronous event handler.
///
/// Polled on the emitting task together with the other async handlers of the
/// same emission. Implementations should not block.
#[async_trait]
pub trait AsyncHandler: Send + Sync + 'static {
    /// Handles one emission.
    async fn call(&self, event: &str, payload: &Payload) -> Result<(), HandlerError>;
}

/// Closure-backed [`SyncHandler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SyncHandler for HandlerFn<F>
where
    F: Fn(&str, &Payload) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn call(&self, event: &str, payload: &Payload) -> Result<(), HandlerError> {
        (self.f)(event, payload)
    }
}

/// Closure-backed [`AsyncHandler`].
///
/// The closure *creates* a new future per call and receives owned copies of
/// the event name and payload, so the future does not borrow from the broker.
pub struct AsyncHandlerFn<F> {
    f: F,
}

impl<F> AsyncHandlerFn<F> {
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> AsyncHandler for AsyncHandlerFn<F>
where
    F: Fn(String, Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn call(&self, event: &str, payload: &Payload) -> Result<(), HandlerError> {
        (self.f)(event.to_owned(), payload.clone()).await
    }
}

/// The two handler variants.
#[derive(Clone)]
pub enum HandlerKind {
    /// Runs on the blocking pool.
    Sync(Arc<dyn SyncHandler>),
    /// Runs on the emitting task, concurrently with peers.
    Async(Arc<dyn AsyncHandler>),
}

/// A named event handler.
#[derive(Clone)]
pub struct Handler {
    name: Cow<'static, str>,
    kind: HandlerKind,
}

impl Handler {
    /// Creates a sync handler from a closure.
    pub fn sync_fn<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&str, &Payload) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self::from_sync(name, Arc::new(HandlerFn::new(f)))
    }

    /// Creates an async handler from a closure returning a future.
    pub fn async_fn<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(String, Payload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self::from_async(name, Arc::new(AsyncHandlerFn::new(f)))
    }

    /// Wraps an existing sync handler. Handlers built from the same `Arc` are identical.
    pub fn from_sync(name: impl Into<Cow<'static, str>>, handler: Arc<dyn SyncHandler>) -> Self {
        Self {
            name: name.into(),
            kind: HandlerKind::Sync(handler),
        }
    }

    /// Wraps an existing async handler. Handlers built from the same `Arc` are identical.
    pub fn from_async(name: impl Into<Cow<'static, str>>, handler: Arc<dyn AsyncHandler>) -> Self {
        Self {
            name: name.into(),
            kind: HandlerKind::Async(handler),
        }
    }

    /// Human-readable name (for logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying variant.
    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    /// True for async handlers.
    pub fn is_async(&self) -> bool {
        matches!(self.kind, HandlerKind::Async(_))
    }

    /// True if both refer to the same underlying handler.
    ///
    /// Names are not compared.
    pub fn same_as(&self, other: &Handler) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    // Vtable pointers may differ between codegen units; compare data only.
    fn data_ptr(&self) -> *const () {
        match &self.kind {
            HandlerKind::Sync(h) => Arc::as_ptr(h) as *const (),
            HandlerKind::Async(h) => Arc::as_ptr(h) as *const (),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("async", &self.is_async())
            .finish()
    }
}
