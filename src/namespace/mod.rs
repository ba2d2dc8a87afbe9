//! Namespace paths and the nested store that holds mounted modules.

mod path;
mod store;

pub use path::NamespacePath;
pub use store::NamespaceStore;
