//! # Observer trait.
//!
//! An [`Observer`] receives the results of an observed handler in push mode,
//! from a dedicated worker task spawned by
//! [`Observable::subscribe`](crate::Observable::subscribe).
//!
//! ## Rules
//! - `on_next` is called once per published result, in publication order.
//! - `on_error` reports delivery problems (lag). Handler failures are never
//!   delivered here; they go back to the handler's caller.
//! - `on_complete` is called when the stream ends because every sender is
//!   gone (the registry and all in-flight calls were dropped). Unsubscribing
//!   does not call it.
//! - Panics in `on_next` are caught and published as `EventKind::ObserverPanicked`;
//!   the worker keeps running.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use modrain::Observer;
//! use serde_json::Value;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Observer for Printer {
//!     async fn on_next(&self, value: &Value) {
//!         println!("result: {value}");
//!     }
//!
//!     fn name(&self) -> &'static str { "printer" }
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ChannelError;

/// Push-mode consumer of handler results.
#[async_trait]
pub trait Observer: Send + Sync + 'static {
    /// Handles one published result.
    async fn on_next(&self, value: &Value);

    /// Handles a delivery error. Default: ignore.
    async fn on_error(&self, _error: &ChannelError) {}

    /// Called once when the stream ends. Default: ignore.
    async fn on_complete(&self) {}

    /// Returns the observer name used in logs and panic/lag events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed observer (`on_next` only).
pub struct ObserverFn<F> {
    f: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(Value) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Observer for ObserverFn<F>
where
    F: Fn(Value) + Send + Sync + 'static,
{
    async fn on_next(&self, value: &Value) {
        (self.f)(value.clone());
    }

    fn name(&self) -> &'static str {
        "observer_fn"
    }
}
