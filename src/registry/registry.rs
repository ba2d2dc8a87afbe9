//! # Registry: modules by namespace.
//!
//! The [`Registry`] owns the namespace store and the lifecycle event bus. It is
//! an explicit object: construct one per process (or per test) and pass it by
//! reference.
//!
//! ## Architecture
//! ```text
//! register_module("math", handlers)
//!     └─► Module::with_handlers ──► mount()
//!             ├─► store.set("math", Namespace{ slots, channels: {} })
//!             └─► Bus.publish(ModuleMounted)
//!
//! registry.call("math", "add", args)  ──► Namespace::call ──► slot (original or wrapper)
//! registry.observe("math", "add")     ──► Namespace::observe ──► Observable
//! ```
//!
//! ## Rules
//! - Mounting is all-or-nothing: on `DuplicateNamespace` nothing is installed.
//! - Namespaces live as long as the registry; there is no unmount.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::channel::Observable;
use crate::config::RegistryConfig;
use crate::error::{HandlerError, RegistryError};
use crate::events::{Bus, Event, EventKind};
use crate::handlers::{Args, HandlerRef};
use crate::module::Module;
use crate::namespace::{NamespacePath, NamespaceStore};
use crate::registry::builder::RegistryBuilder;
use crate::registry::Namespace;

/// Namespaced registry of observable async handlers.
pub struct Registry {
    cfg: RegistryConfig,
    store: RwLock<NamespaceStore<Arc<Namespace>>>,
    bus: Bus,
    /// Stops the event listener (if any) when the registry is dropped.
    runtime_token: CancellationToken,
}

impl Registry {
    /// Creates a registry without event subscribers.
    ///
    /// Does not need a Tokio runtime.
    pub fn new(cfg: RegistryConfig) -> Self {
        RegistryBuilder::new(cfg).build()
    }

    /// Starts a builder (to attach event subscribers).
    pub fn builder(cfg: RegistryConfig) -> RegistryBuilder {
        RegistryBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: RegistryConfig, bus: Bus, runtime_token: CancellationToken) -> Self {
        Self {
            cfg,
            store: RwLock::new(NamespaceStore::new()),
            bus,
            runtime_token,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.cfg
    }

    /// Creates a module from `handlers` and mounts it at `namespace`.
    ///
    /// # Example
    /// ```rust
    /// use modrain::{Args, HandlerError, HandlerFn, HandlerRef, Registry, RegistryConfig};
    /// use serde_json::json;
    ///
    /// let registry = Registry::new(RegistryConfig::default());
    /// let add: HandlerRef = HandlerFn::arc(|args: Args| async move {
    ///     Ok::<_, HandlerError>(json!(args.arg::<i64>(0)? + args.arg::<i64>(1)?))
    /// });
    ///
    /// let module = registry.register_module("math", [("add", add.clone())]).unwrap();
    /// assert_eq!(module.name(), "math");
    ///
    /// let err = registry.register_module("math", [("add", add)]).unwrap_err();
    /// assert_eq!(err.as_label(), "registry_duplicate_namespace");
    /// ```
    pub fn register_module<I, K>(&self, namespace: &str, handlers: I) -> Result<Module, RegistryError>
    where
        I: IntoIterator<Item = (K, HandlerRef)>,
        K: Into<String>,
    {
        let mut module = Module::with_handlers(namespace, handlers)?;
        self.mount(&mut module)?;
        Ok(module)
    }

    /// Mounts an unmounted module.
    ///
    /// The module's handlers are copied into the namespace slots; the module
    /// keeps its own references to the originals.
    pub fn mount(&self, module: &mut Module) -> Result<Arc<Namespace>, RegistryError> {
        if module.is_mounted() {
            return Err(RegistryError::ModuleAlreadyMounted {
                namespace: module.name().to_string(),
            });
        }

        let handlers = module.handlers().len();
        let (namespace, mounted) = {
            let mut store = self.store.write();
            if store.contains(module.path()) {
                return Err(RegistryError::DuplicateNamespace {
                    namespace: module.name().to_string(),
                });
            }
            let namespace = Namespace::new(
                module.path().clone(),
                module.handlers().clone(),
                self.cfg.channel_capacity_clamped(),
                self.bus.clone(),
            );
            store.set(module.path(), Arc::clone(&namespace))?;
            // seq taken before anyone can observe the new namespace
            let mounted = Event::new(EventKind::ModuleMounted)
                .with_namespace(module.name())
                .with_handlers(handlers);
            (namespace, mounted)
        };

        module.mark_mounted(Arc::clone(&namespace));

        tracing::debug!(namespace = module.name(), handlers, "module mounted");
        self.bus.publish(mounted);
        Ok(namespace)
    }

    /// Returns the namespace mounted at `path`.
    pub fn namespace(&self, path: &str) -> Option<Arc<Namespace>> {
        let path = NamespacePath::parse(path).ok()?;
        self.store.read().get(&path).cloned()
    }

    /// Like [`namespace`](Self::namespace) but with a typed error.
    pub fn require(&self, path: &str) -> Result<Arc<Namespace>, RegistryError> {
        let parsed = NamespacePath::parse(path)?;
        self.store
            .read()
            .get(&parsed)
            .cloned()
            .ok_or_else(|| RegistryError::NamespaceNotFound {
                namespace: path.to_string(),
            })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.namespace(path).is_some()
    }

    /// Every mounted namespace path, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        self.store.read().paths()
    }

    /// Invokes `namespace.handler(args)`.
    pub async fn call(
        &self,
        namespace: &str,
        handler: &str,
        args: impl Into<Args>,
    ) -> Result<Value, HandlerError> {
        let ns = self.namespace(namespace).ok_or_else(|| HandlerError::NotFound {
            namespace: namespace.to_string(),
            handler: handler.to_string(),
        })?;
        ns.call(handler, args).await
    }

    /// Shorthand for `require(namespace)?.observe(handler)`.
    pub fn observe(&self, namespace: &str, handler: &str) -> Result<Observable, RegistryError> {
        self.require(namespace)?.observe(handler)
    }

    /// Receiver of lifecycle events published after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.cfg)
            .field("namespaces", &self.namespaces())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerFn;
    use serde_json::json;

    fn constant(v: i64) -> HandlerRef {
        HandlerFn::arc(move |_args: Args| async move { Ok::<_, HandlerError>(json!(v)) })
    }

    #[test]
    fn duplicate_namespace_leaves_original_untouched() {
        let registry = Registry::default();
        let first = constant(1);
        registry.register_module("math", [("one", first.clone())]).unwrap();

        let err = registry
            .register_module("math", [("one", constant(2)), ("two", constant(2))])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateNamespace {
                namespace: "math".into()
            }
        );

        let ns = registry.namespace("math").unwrap();
        assert_eq!(ns.handler_names(), vec!["one"]);
        assert!(Arc::ptr_eq(&ns.handler("one").unwrap(), &first));
    }

    #[test]
    fn mount_twice_fails() {
        let registry = Registry::default();
        let mut module = Module::new("once").unwrap();
        registry.mount(&mut module).unwrap();

        let err = registry.mount(&mut module).unwrap_err();
        assert_eq!(err.as_label(), "registry_module_already_mounted");
        assert_eq!(registry.namespaces(), vec!["once"]);
    }

    #[test]
    fn post_mount_registration_is_rejected() {
        let registry = Registry::default();
        let mut module = registry.register_module("math", [("one", constant(1))]).unwrap();

        let err = module.register_handler("two", constant(2)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::ModuleAlreadyMounted {
                namespace: "math".into()
            }
        );
        assert!(!registry.namespace("math").unwrap().has_handler("two"));
    }

    #[test]
    fn parent_namespace_is_taken_by_its_children() {
        let registry = Registry::default();
        registry.register_module("users.admin", [("count", constant(1))]).unwrap();

        let err = registry
            .register_module("users", [("count", constant(2))])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateNamespace {
                namespace: "users".into()
            }
        );
        assert!(!registry.contains("users"));
        assert_eq!(registry.namespaces(), vec!["users.admin"]);
    }

    #[test]
    fn nested_namespaces_are_independent() {
        let registry = Registry::default();
        registry.register_module("users", [("count", constant(2))]).unwrap();
        registry.register_module("users.admin", [("count", constant(1))]).unwrap();

        assert_eq!(registry.namespaces(), vec!["users", "users.admin"]);
        assert!(registry.require("users.guest").is_err());
        assert!(matches!(
            registry.require("users..guest"),
            Err(RegistryError::InvalidNamespace { .. })
        ));
    }

    #[tokio::test]
    async fn call_reaches_the_handler() {
        let registry = Registry::default();
        registry.register_module("k", [("seven", constant(7))]).unwrap();

        assert_eq!(registry.call("k", "seven", ()).await.unwrap(), json!(7));
        assert_eq!(
            registry.call("nope", "seven", ()).await.unwrap_err(),
            HandlerError::NotFound {
                namespace: "nope".into(),
                handler: "seven".into()
            }
        );
    }

    #[tokio::test]
    async fn mount_publishes_event() {
        let registry = Registry::default();
        let mut events = registry.events();
        registry.register_module("math", [("one", constant(1))]).unwrap();

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ModuleMounted);
        assert_eq!(ev.namespace.as_deref(), Some("math"));
        assert_eq!(ev.handlers, Some(1));
        assert_eq!(ev.subscribers, None);
    }
}
