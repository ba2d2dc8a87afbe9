//! Registry core: mounted namespaces and their observation lifecycle.
//!
//! Internal modules:
//! - [`registry`]: the registry object (mount, lookup, call, observe);
//! - [`namespace`]: per-module slots and channel table (wrapping and restore);
//! - [`builder`]: registry construction with event subscribers.

mod builder;
mod namespace;
#[allow(clippy::module_inception)]
mod registry;

pub use builder::RegistryBuilder;
pub use namespace::Namespace;
pub use registry::Registry;
