//! # Plugin discovery over an explicit namespace.
//!
//! [`discover`] walks a [`Namespace`] once:
//!
//! ```text
//! for module in namespace (enumeration order):
//!   ├─ load()  ── Err ──► warn "failed loading plugin module", skip module
//!   └─ for export in module (declaration order):
//!        └─ instantiate() ── Err ──► warn "failed instantiating plugin", skip export
//!                          ── Ok  ──► push
//! ```
//!
//! The result order follows the namespace composition, but callers should
//! treat it as unspecified.

use crate::plugins::namespace::Namespace;
use crate::plugins::plugin::PluginRef;

/// Loads every module of `namespace` and returns the plugins that could be built.
///
/// Never fails: bad modules and bad exports are logged at `warn` and skipped.
pub fn discover(namespace: &Namespace) -> Vec<PluginRef> {
    let mut plugins = Vec::new();

    for module in namespace.modules() {
        let exports = match module.load() {
            Ok(exports) => exports,
            Err(e) => {
                tracing::warn!(
                    namespace = namespace.name(),
                    module = module.name(),
                    label = e.as_label(),
                    error = %e,
                    "failed loading plugin module"
                );
                continue;
            }
        };

        for export in &exports {
            match export.instantiate() {
                Ok(plugin) => {
                    tracing::debug!(
                        namespace = namespace.name(),
                        module = module.name(),
                        plugin = plugin.name(),
                        "plugin discovered"
                    );
                    plugins.push(plugin);
                }
                Err(e) => tracing::warn!(
                    namespace = namespace.name(),
                    module = module.name(),
                    export = export.name(),
                    label = e.as_label(),
                    error = %e,
                    "failed instantiating plugin"
                ),
            }
        }
    }

    tracing::info!(
        namespace = namespace.name(),
        count = plugins.len(),
        "plugin discovery finished"
    );
    plugins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Payload;
    use crate::plugins::namespace::{Export, PluginModule};
    use crate::plugins::plugin::PluginFn;

    fn noop(name: &'static str) -> PluginRef {
        PluginFn::arc(name, |_: &str, _: &Payload| Ok(()))
    }

    #[test]
    fn test_good_plugin_survives_broken_module() {
        let ns = Namespace::new("plugins")
            .with_module(PluginModule::new("broken", || {
                Err("ImportError: no module named nope".to_string())
            }))
            .with_module(PluginModule::from_exports(
                "sample",
                vec![Export::factory("SamplePlugin", || Ok(noop("sample")))],
            ));

        let found = discover(&ns);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "sample");
    }

    #[test]
    fn test_bad_export_skipped_siblings_kept() {
        let ns = Namespace::new("plugins").with_module(PluginModule::from_exports(
            "mixed",
            vec![
                Export::factory("Broken", || Err("ctor failed".to_string())),
                Export::instance(noop("instance")),
                Export::factory("Panics", || panic!("ctor panicked")),
                Export::factory("Fine", || Ok(noop("fine"))),
            ],
        ));

        let mut names: Vec<String> = discover(&ns).iter().map(|p| p.name().to_string()).collect();
        names.sort();

        assert_eq!(names, vec!["fine".to_string(), "instance".to_string()]);
    }

    #[test]
    fn test_panicking_loader_is_skipped() {
        let ns = Namespace::new("plugins")
            .with_module(PluginModule::new("explodes", || panic!("loader panicked")))
            .with_module(PluginModule::from_exports("ok", vec![Export::instance(noop("ok"))]));

        let found = discover(&ns);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_empty_namespace() {
        assert!(discover(&Namespace::new("empty")).is_empty());
    }
}
