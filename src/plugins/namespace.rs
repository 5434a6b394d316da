//! # Plugin namespaces, modules and exports.
//!
//! A [`Namespace`] is an ordered list of [`PluginModule`]s composed by the
//! host. Loading a module yields its [`Export`]s in declaration order:
//!
//! - [`Export::Factory`] a named constructor, called with no arguments;
//! - [`Export::Instance`] an already-built plugin.
//!
//! Loaders and factories report failures as plain strings; the discovery step
//! wraps them into [`PluginError`] with the module or export name attached.

use std::borrow::Cow;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::error::{PluginError, panic_message};
use crate::plugins::plugin::PluginRef;

type FactoryFn = dyn Fn() -> Result<PluginRef, String> + Send + Sync;
type LoaderFn = dyn Fn() -> Result<Vec<Export>, String> + Send + Sync;

/// One top-level item of a plugin module.
#[derive(Clone)]
pub enum Export {
    /// Constructor producing a fresh plugin.
    Factory {
        /// Export name (for logs).
        name: Cow<'static, str>,
        /// Constructor.
        build: Arc<FactoryFn>,
    },
    /// Ready-made plugin instance.
    Instance(PluginRef),
}

impl Export {
    /// Creates a factory export.
    pub fn factory<F>(name: impl Into<Cow<'static, str>>, build: F) -> Self
    where
        F: Fn() -> Result<PluginRef, String> + Send + Sync + 'static,
    {
        Export::Factory {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    /// Creates an instance export.
    pub fn instance(plugin: PluginRef) -> Self {
        Export::Instance(plugin)
    }

    /// Export name: the factory name, or the plugin's own name for instances.
    pub fn name(&self) -> &str {
        match self {
            Export::Factory { name, .. } => name.as_ref(),
            Export::Instance(p) => p.name(),
        }
    }

    /// Builds (factory) or returns (instance) the plugin.
    ///
    /// # Errors
    /// [`PluginError::InstantiateFailed`] if the factory fails or panics.
    pub fn instantiate(&self) -> Result<PluginRef, PluginError> {
        match self {
            Export::Instance(p) => Ok(Arc::clone(p)),
            Export::Factory { name, build } => {
                let res = catch_unwind(AssertUnwindSafe(|| build()))
                    .unwrap_or_else(|panic_err| Err(panic_message(panic_err.as_ref())));
                res.map_err(|error| PluginError::InstantiateFailed {
                    export: name.to_string(),
                    error,
                })
            }
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Factory { name, .. } => f.debug_tuple("Factory").field(name).finish(),
            Export::Instance(p) => f.debug_tuple("Instance").field(&p.name()).finish(),
        }
    }
}

/// A named unit of plugin code.
pub struct PluginModule {
    name: Cow<'static, str>,
    load: Box<LoaderFn>,
}

impl PluginModule {
    /// Creates a module from a loader.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, load: F) -> Self
    where
        F: Fn() -> Result<Vec<Export>, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            load: Box::new(load),
        }
    }

    /// Creates a module that always loads the given exports.
    pub fn from_exports(name: impl Into<Cow<'static, str>>, exports: Vec<Export>) -> Self {
        Self::new(name, move || Ok(exports.clone()))
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the loader.
    ///
    /// # Errors
    /// [`PluginError::LoadFailed`] if the loader fails or panics.
    pub fn load(&self) -> Result<Vec<Export>, PluginError> {
        let res = catch_unwind(AssertUnwindSafe(|| (self.load)()))
            .unwrap_or_else(|panic_err| Err(panic_message(panic_err.as_ref())));
        res.map_err(|error| PluginError::LoadFailed {
            module: self.name.to_string(),
            error,
        })
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of plugin modules.
#[derive(Debug)]
pub struct Namespace {
    name: Cow<'static, str>,
    modules: Vec<PluginModule>,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    /// Adds a module (builder style).
    #[must_use]
    pub fn with_module(mut self, module: PluginModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Adds a module.
    pub fn add_module(&mut self, module: PluginModule) {
        self.modules.push(module);
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modules in enumeration order.
    pub fn modules(&self) -> &[PluginModule] {
        &self.modules
    }
}
