//! # Handler abstraction.
//!
//! A handler is a named async function exposed by a module. Every slot in a
//! namespace holds a [`HandlerRef`] (`Arc<dyn Handler>`): either the handler the
//! module registered, or an observing wrapper around it. Callers cannot tell
//! which one they got.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HandlerError;
use crate::handlers::Args;

/// Boxed future returned by [`Handler::call`].
pub type BoxHandlerFuture = Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send + 'static>>;

/// Shared handle to a handler.
pub type HandlerRef = Arc<dyn Handler>;

/// # Asynchronous handler.
///
/// `call` produces a fresh future per invocation; the future must not borrow
/// from `self`, so implementations clone whatever state they need into it.
///
/// # Example
/// ```
/// use modrain::{Args, BoxHandlerFuture, Handler, HandlerError};
/// use serde_json::Value;
///
/// struct Echo;
///
/// impl Handler for Echo {
///     fn call(&self, args: Args) -> BoxHandlerFuture {
///         Box::pin(async move { Ok::<_, HandlerError>(Value::Array(args.into_inner())) })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Invokes the handler with `args`.
    fn call(&self, args: Args) -> BoxHandlerFuture;
}
