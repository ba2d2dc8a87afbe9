//! Error types used by the registry and by handlers.
//!
//! This module defines three error enums:
//!
//! - [`RegistryError`]: errors raised by registration, mounting and observation.
//! - [`HandlerError`]: errors raised by handler execution (passed through wrappers unchanged).
//! - [`ChannelError`]: delivery problems reported to observers.
//!
//! All of them provide `as_label` (stable snake_case label for logs) and `as_message`.

use thiserror::Error;

/// # Errors produced by the registry.
///
/// Every variant is raised synchronously by the failing operation; the
/// registry never installs partial state before returning one of these.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A module is already mounted at this namespace.
    #[error("module already registered for namespace: {namespace}")]
    DuplicateNamespace {
        /// The occupied namespace.
        namespace: String,
    },

    /// The handler name is already registered on the module.
    #[error("module handler already registered: {namespace}.{handler}")]
    DuplicateHandler {
        /// Namespace of the module.
        namespace: String,
        /// Repeated handler name.
        handler: String,
    },

    /// Handlers can only be registered before the module is mounted.
    #[error("module already mounted: {namespace}")]
    ModuleAlreadyMounted {
        /// Namespace of the mounted module.
        namespace: String,
    },

    /// The namespace string is not a valid dotted path.
    #[error("invalid namespace {namespace:?}: {reason}")]
    InvalidNamespace {
        /// The rejected input.
        namespace: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Nothing is mounted at this namespace.
    #[error("namespace not found: {namespace}")]
    NamespaceNotFound {
        /// The requested namespace.
        namespace: String,
    },

    /// The namespace has no handler with this name.
    #[error("handler not found: {namespace}.{handler}")]
    HandlerNotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Missing handler name.
        handler: String,
    },

    /// The registry owning this namespace has been dropped.
    #[error("registry closed; namespace {namespace} is no longer mounted")]
    RegistryClosed {
        /// Namespace the observable was bound to.
        namespace: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use modrain::RegistryError;
    ///
    /// let err = RegistryError::DuplicateNamespace { namespace: "math".into() };
    /// assert_eq!(err.as_label(), "registry_duplicate_namespace");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::DuplicateNamespace { .. } => "registry_duplicate_namespace",
            RegistryError::DuplicateHandler { .. } => "registry_duplicate_handler",
            RegistryError::ModuleAlreadyMounted { .. } => "registry_module_already_mounted",
            RegistryError::InvalidNamespace { .. } => "registry_invalid_namespace",
            RegistryError::NamespaceNotFound { .. } => "registry_namespace_not_found",
            RegistryError::HandlerNotFound { .. } => "registry_handler_not_found",
            RegistryError::RegistryClosed { .. } => "registry_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::DuplicateNamespace { namespace } => {
                format!("namespace {namespace} is occupied")
            }
            RegistryError::DuplicateHandler { namespace, handler } => {
                format!("handler {handler} already exists on {namespace}")
            }
            RegistryError::ModuleAlreadyMounted { namespace } => {
                format!("module {namespace} is mounted; register handlers before mount")
            }
            RegistryError::InvalidNamespace { namespace, reason } => {
                format!("namespace {namespace:?} rejected: {reason}")
            }
            RegistryError::NamespaceNotFound { namespace } => {
                format!("no module at {namespace}")
            }
            RegistryError::HandlerNotFound { namespace, handler } => {
                format!("no handler {handler} on {namespace}")
            }
            RegistryError::RegistryClosed { namespace } => {
                format!("registry dropped; {namespace} unavailable")
            }
        }
    }
}

/// # Errors produced by handler execution.
///
/// Handlers return these from their futures. Observed handlers pass them
/// through to the caller unchanged and never publish them to subscribers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler ran and failed.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// A positional argument was missing or could not be decoded.
    #[error("invalid argument #{index}: {reason}")]
    InvalidArgument {
        /// Zero-based argument position.
        index: usize,
        /// Decoder message.
        reason: String,
    },

    /// No handler is reachable at `namespace.handler`.
    #[error("handler not found: {namespace}.{handler}")]
    NotFound {
        /// Namespace that was searched.
        namespace: String,
        /// Missing handler name.
        handler: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    ///
    /// # Example
    /// ```
    /// use modrain::HandlerError;
    ///
    /// let err = HandlerError::failed("division by zero");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::InvalidArgument { .. } => "handler_invalid_argument",
            HandlerError::NotFound { .. } => "handler_not_found",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::InvalidArgument { index, reason } => {
                format!("argument {index}: {reason}")
            }
            HandlerError::NotFound { namespace, handler } => {
                format!("missing: {namespace}.{handler}")
            }
        }
    }
}

/// # Errors reported to observers of a channel.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The observer fell behind by more than the channel capacity; the oldest
    /// `skipped` results were dropped for this observer only.
    #[error("observer lagged; {skipped} results skipped")]
    Lagged {
        /// Number of results this observer missed.
        skipped: u64,
    },
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::Lagged { .. } => "channel_lagged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = RegistryError::HandlerNotFound {
            namespace: "math".into(),
            handler: "sub".into(),
        };
        assert_eq!(err.as_label(), "registry_handler_not_found");
        assert_eq!(err.to_string(), "handler not found: math.sub");
        assert_eq!(
            ChannelError::Lagged { skipped: 3 }.as_label(),
            "channel_lagged"
        );
    }

    #[test]
    fn handler_error_messages() {
        let err = HandlerError::InvalidArgument {
            index: 1,
            reason: "missing".into(),
        };
        assert_eq!(err.as_message(), "argument 1: missing");
        assert_eq!(HandlerError::failed("boom").to_string(), "handler failed: boom");
    }
}
