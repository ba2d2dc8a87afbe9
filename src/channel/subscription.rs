//! # Subscriptions and pull-mode listeners.
//!
//! A [`Subscription`] is one subscriber's attachment to a channel. Detaching
//! the last subscription of a channel tears it down and restores the original
//! handler.
//!
//! ## Rules
//! - `unsubscribe()` is idempotent; dropping a subscription unsubscribes too.
//! - Detaching from a channel that was already torn down is a no-op.
//! - A [`Listener`] is a subscription plus its receiver, for pulling results
//!   with `recv()` or as a `Stream`.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::Stream;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;

use crate::channel::ChannelKey;
use crate::events::{Bus, Event, EventKind};

/// Handle to one subscriber's attachment.
#[must_use = "dropping a Subscription unsubscribes it"]
pub struct Subscription {
    key: ChannelKey,
    detached: AtomicBool,
    token: CancellationToken,
}

impl Subscription {
    pub(crate) fn new(key: ChannelKey) -> Self {
        Self {
            key,
            detached: AtomicBool::new(false),
            token: CancellationToken::new(),
        }
    }

    /// Detaches this subscriber. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        if self.detached.swap(true, Ordering::AcqRel) {
            return;
        }
        self.token.cancel();
        if let Some(ns) = self.key.namespace() {
            ns.detach(&self.key);
        }
    }

    /// Returns `true` once unsubscribed.
    pub fn is_closed(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    pub fn namespace(&self) -> &str {
        self.key.namespace_name()
    }

    pub fn handler(&self) -> &str {
        self.key.handler()
    }

    /// Token cancelled on unsubscribe; stops push-mode workers.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn key(&self) -> &ChannelKey {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("namespace", &self.namespace())
            .field("handler", &self.handler())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Pull-mode subscriber.
///
/// # Example
/// ```rust
/// use modrain::{Args, HandlerFn, HandlerRef, Registry, RegistryConfig};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = Registry::new(RegistryConfig::default());
/// let echo = HandlerFn::arc(|args: Args| async move { args.arg::<serde_json::Value>(0) });
/// registry.register_module("util", [("echo", echo as HandlerRef)])?;
///
/// let mut listener = registry.observe("util", "echo")?.listen()?;
/// registry.call("util", "echo", json!(["hi"])).await?;
/// assert_eq!(listener.recv().await, Some(json!("hi")));
/// # Ok(())
/// # }
/// ```
pub struct Listener {
    rx: broadcast::Receiver<Value>,
    subscription: Subscription,
    bus: Bus,
}

impl Listener {
    pub(crate) fn new(rx: broadcast::Receiver<Value>, subscription: Subscription, bus: Bus) -> Self {
        Self {
            rx,
            subscription,
            bus,
        }
    }

    /// Waits for the next result.
    ///
    /// Returns `None` once unsubscribed or when the stream has ended. Results
    /// skipped because of lag are reported as `ObserverLagged` events.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            if self.subscription.is_closed() {
                return None;
            }
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(RecvError::Lagged(skipped)) => self.report_lag(skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next buffered result without waiting.
    pub fn try_recv(&mut self) -> Option<Value> {
        loop {
            if self.subscription.is_closed() {
                return None;
            }
            match self.rx.try_recv() {
                Ok(value) => return Some(value),
                Err(TryRecvError::Lagged(skipped)) => self.report_lag(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Detaches this listener (idempotent).
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Converts the listener into a `Stream` of results.
    ///
    /// Dropping the stream unsubscribes.
    pub fn into_stream(self) -> impl Stream<Item = Value> + Send {
        futures::stream::unfold(self, |mut listener| async move {
            listener.recv().await.map(|value| (value, listener))
        })
    }

    pub(crate) fn into_parts(self) -> (broadcast::Receiver<Value>, Subscription, Bus) {
        (self.rx, self.subscription, self.bus)
    }

    fn report_lag(&self, skipped: u64) {
        let key = self.subscription.key();
        tracing::warn!(
            namespace = &**key.namespace_name(),
            handler = &**key.handler(),
            skipped,
            "listener lagged"
        );
        self.bus.publish(
            Event::new(EventKind::ObserverLagged)
                .with_namespace(key.namespace_name().clone())
                .with_handler(key.handler().clone())
                .with_subscriber("listener")
                .with_skipped(skipped),
        );
    }
}
