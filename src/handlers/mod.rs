//! # Handler abstractions.
//!
//! This module provides the handler-related types:
//! - [`Handler`] - trait for async handlers stored in namespace slots
//! - [`HandlerFn`] - closure-backed handler
//! - [`HandlerRef`] - shared reference to a handler (`Arc<dyn Handler>`)
//! - [`Args`] - positional JSON arguments
//! - `ObservedHandler` - internal decorator installed while a handler is observed

mod args;
mod handler;
mod handler_fn;
mod observed;

pub use args::Args;
pub use handler::{BoxHandlerFuture, Handler, HandlerRef};
pub use handler_fn::HandlerFn;

pub(crate) use observed::ObservedHandler;
