//! # Modules.
//!
//! A [`Module`] is a namespace path plus a set of named handlers. It is built
//! unmounted, filled with [`Module::register_handler`], then mounted with
//! [`Registry::mount`](crate::Registry::mount). After mounting, the handler set
//! is frozen: further registration fails with `ModuleAlreadyMounted`.
//!
//! ## Example
//! ```rust
//! use modrain::{Args, HandlerError, HandlerFn, Module, Registry, RegistryConfig};
//! use serde_json::json;
//!
//! let registry = Registry::new(RegistryConfig::default());
//!
//! let mut users = Module::new("users.admin")?;
//! users.register_handler("count", HandlerFn::arc(|_args: Args| async {
//!     Ok::<_, HandlerError>(json!(3))
//! }))?;
//! registry.mount(&mut users)?;
//!
//! assert!(users.is_mounted());
//! assert!(users.register_handler("late", HandlerFn::arc(|_args: Args| async {
//!     Ok::<_, HandlerError>(json!(null))
//! })).is_err());
//! # Ok::<(), modrain::RegistryError>(())
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::handlers::HandlerRef;
use crate::namespace::NamespacePath;
use crate::registry::Namespace;

/// A named set of handlers, mounted at most once.
pub struct Module {
    path: NamespacePath,
    handlers: BTreeMap<String, HandlerRef>,
    mounted: Option<Arc<Namespace>>,
}

impl Module {
    /// Creates an empty, unmounted module for `namespace`.
    pub fn new(namespace: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            path: NamespacePath::parse(namespace)?,
            handlers: BTreeMap::new(),
            mounted: None,
        })
    }

    /// Creates an unmounted module with the given handlers.
    ///
    /// Fails with `DuplicateHandler` if `handlers` repeats a name.
    pub fn with_handlers<I, K>(namespace: &str, handlers: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, HandlerRef)>,
        K: Into<String>,
    {
        let mut module = Self::new(namespace)?;
        for (name, handler) in handlers {
            module.register_handler(name, handler)?;
        }
        Ok(module)
    }

    /// Adds a handler to an unmounted module.
    ///
    /// Fails with `ModuleAlreadyMounted` after mount, or `DuplicateHandler`
    /// if the name exists (the existing handler is kept).
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: HandlerRef,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.mounted.is_some() {
            return Err(RegistryError::ModuleAlreadyMounted {
                namespace: self.path.to_string(),
            });
        }
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::DuplicateHandler {
                namespace: self.path.to_string(),
                handler: name,
            });
        }
        tracing::trace!(namespace = self.path.as_str(), handler = name.as_str(), "handler registered");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Full namespace path of the module.
    pub fn name(&self) -> &str {
        self.path.as_str()
    }

    pub fn path(&self) -> &NamespacePath {
        &self.path
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Returns the handler as registered (never a wrapper).
    pub fn handler(&self, name: &str) -> Option<HandlerRef> {
        self.handlers.get(name).cloned()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// The mounted namespace, once mounted.
    pub fn namespace(&self) -> Option<&Arc<Namespace>> {
        self.mounted.as_ref()
    }

    pub(crate) fn handlers(&self) -> &BTreeMap<String, HandlerRef> {
        &self.handlers
    }

    pub(crate) fn mark_mounted(&mut self, namespace: Arc<Namespace>) {
        self.mounted = Some(namespace);
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name())
            .field("handlers", &self.handler_names())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::{Args, HandlerFn};
    use serde_json::json;

    fn constant(v: i64) -> HandlerRef {
        HandlerFn::arc(move |_args: Args| async move { Ok::<_, HandlerError>(json!(v)) })
    }

    #[test]
    fn duplicate_handler_keeps_first() {
        let mut module = Module::new("math").unwrap();
        let first = constant(1);
        module.register_handler("one", first.clone()).unwrap();

        let err = module.register_handler("one", constant(2)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateHandler {
                namespace: "math".into(),
                handler: "one".into()
            }
        );
        assert!(Arc::ptr_eq(&module.handler("one").unwrap(), &first));
        assert_eq!(module.handler_names(), vec!["one"]);
    }

    #[test]
    fn with_handlers_rejects_repeated_names() {
        let err = Module::with_handlers("math", [("x", constant(1)), ("x", constant(2))]).unwrap_err();
        assert_eq!(err.as_label(), "registry_duplicate_handler");
    }

    #[test]
    fn empty_module_is_allowed() {
        let module = Module::with_handlers("empty", Vec::<(String, HandlerRef)>::new()).unwrap();
        assert!(module.handler_names().is_empty());
        assert!(!module.is_mounted());
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        assert!(matches!(
            Module::new("a..b"),
            Err(RegistryError::InvalidNamespace { .. })
        ));
    }
}
