//! # Namespace store.
//!
//! A nested mapping from dotted path segments to mounted values. Pure data
//! container: the registry decides what lives in it and when.
//!
//! ```text
//! root
//!  ├── math            value: Some(ns)
//!  └── users           value: None      (intermediate, created implicitly)
//!       └── admin      value: Some(ns)
//! ```
//!
//! ## Rules
//! - `set` on an occupied path fails with `DuplicateNamespace` and changes nothing.
//! - Intermediate segments are created silently.
//! - A path is occupied when it holds a value or has anything mounted below it:
//!   once `users.admin` exists, `users` is taken.

use std::collections::BTreeMap;

use crate::error::RegistryError;
use crate::namespace::NamespacePath;

struct Node<T> {
    value: Option<T>,
    children: BTreeMap<String, Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

/// Nested path → value mapping.
pub struct NamespaceStore<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for NamespaceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NamespaceStore<T> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Returns the value at `path`, if one is installed.
    pub fn get(&self, path: &NamespacePath) -> Option<&T> {
        self.node(path)?.value.as_ref()
    }

    /// Returns `true` when `path` holds a value or has values below it.
    pub fn contains(&self, path: &NamespacePath) -> bool {
        self.node(path)
            .is_some_and(|node| node.value.is_some() || !node.children.is_empty())
    }

    /// Installs `value` at `path`, creating intermediate segments as needed.
    pub fn set(&mut self, path: &NamespacePath, value: T) -> Result<(), RegistryError> {
        if self.contains(path) {
            return Err(RegistryError::DuplicateNamespace {
                namespace: path.to_string(),
            });
        }

        let mut node = &mut self.root;
        for segment in path.segments() {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.value = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Returns every path holding a value, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = Vec::new();
        collect(&self.root, &mut prefix, &mut out);
        out
    }

    /// Iterates over installed values (path order).
    pub fn values(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if let Some(v) = &node.value {
                out.push(v);
            }
            stack.extend(node.children.values().rev());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, path: &NamespacePath) -> Option<&Node<T>> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.children.get(segment)?;
        }
        Some(node)
    }
}

fn collect<'a, T>(node: &'a Node<T>, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    if node.value.is_some() {
        out.push(prefix.join("."));
    }
    for (segment, child) in &node.children {
        prefix.push(segment);
        collect(child, prefix, out);
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path(raw: &str) -> NamespacePath {
        NamespacePath::parse(raw).unwrap()
    }

    #[test]
    fn nested_paths_share_prefixes() {
        let mut store = NamespaceStore::new();
        store.set(&path("users"), 2).unwrap();
        store.set(&path("users.admin"), 1).unwrap();
        store.set(&path("math"), 3).unwrap();

        assert_eq!(store.get(&path("users.admin")), Some(&1));
        assert_eq!(store.get(&path("users")), Some(&2));
        assert_eq!(store.get(&path("users.guest")), None);
        assert_eq!(store.paths(), vec!["math", "users", "users.admin"]);
        assert_eq!(store.values(), vec![&3, &2, &1]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn parent_of_a_mounted_path_is_occupied() {
        let mut store = NamespaceStore::new();
        store.set(&path("users.admin"), 1).unwrap();

        assert!(store.contains(&path("users")));
        assert_eq!(store.get(&path("users")), None);
        assert_eq!(
            store.set(&path("users"), 2).unwrap_err(),
            RegistryError::DuplicateNamespace {
                namespace: "users".into()
            }
        );
        assert_eq!(store.paths(), vec!["users.admin"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn intermediate_nodes_hold_no_value() {
        let mut store = NamespaceStore::new();
        store.set(&path("a.b.c"), ()).unwrap();
        assert!(store.get(&path("a")).is_none());
        assert!(store.get(&path("a.b")).is_none());
        assert!(!store.contains(&path("a.x")));
    }

    proptest! {
        #[test]
        fn second_set_fails_and_keeps_first(segments in prop::collection::vec("[a-z]{1,6}", 1..4), first: u32, second: u32) {
            let p = path(&segments.join("."));
            let mut store = NamespaceStore::new();
            store.set(&p, first).unwrap();

            let err = store.set(&p, second).unwrap_err();
            prop_assert_eq!(err, RegistryError::DuplicateNamespace { namespace: p.to_string() });
            prop_assert_eq!(store.get(&p), Some(&first));
            prop_assert_eq!(store.len(), 1);
        }
    }
}
