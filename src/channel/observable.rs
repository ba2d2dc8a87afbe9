//! # Observable: the entry point returned by `observe`.
//!
//! An [`Observable`] names one (namespace, handler) pair. Subscribing through
//! it attaches to the pair's channel, activating it on the first subscriber.
//!
//! ## Architecture
//! ```text
//! Namespace::observe("add") ──► Observable
//!                                   │
//!                 ┌─────────────────┼──────────────────┐
//!                 ▼                 ▼                  ▼
//!           listen()          subscribe(obs)     subscribe_fn(f)
//!         (pull: Listener)   (push: worker task calls obs.on_next)
//! ```
//!
//! ## Rules
//! - Observables are cheap to clone and never keep the channel alive.
//! - Subscribing through an observable whose channel was torn down binds to the
//!   pair's current channel (created on demand), never to a stale wrapper.
//! - Late subscribers only see results published after they subscribed.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::channel::{ChannelKey, Listener, Observer, ObserverFn, Subscription};
use crate::error::{ChannelError, RegistryError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::panic_message;

/// Subscribable view of one handler's results.
#[derive(Clone, Debug)]
pub struct Observable {
    key: ChannelKey,
}

impl Observable {
    pub(crate) fn new(key: ChannelKey) -> Self {
        Self { key }
    }

    pub fn namespace(&self) -> &str {
        self.key.namespace_name()
    }

    pub fn handler(&self) -> &str {
        self.key.handler()
    }

    /// Attaches a pull-mode subscriber.
    pub fn listen(&self) -> Result<Listener, RegistryError> {
        let ns = self
            .key
            .namespace()
            .ok_or_else(|| RegistryError::RegistryClosed {
                namespace: self.namespace().to_string(),
            })?;
        let (key, rx) = ns.attach(self.handler())?;
        Ok(Listener::new(rx, Subscription::new(key), ns.bus().clone()))
    }

    /// Attaches a push-mode subscriber.
    ///
    /// Spawns a worker task, so it must be called from within a Tokio runtime.
    pub fn subscribe(&self, observer: Arc<dyn Observer>) -> Result<Subscription, RegistryError> {
        let (rx, subscription, bus) = self.listen()?.into_parts();
        let key = subscription.key().clone();
        tokio::spawn(observe_loop(rx, observer, subscription.token(), bus, key));
        Ok(subscription)
    }

    /// Attaches a push-mode subscriber backed by a closure.
    pub fn subscribe_fn<F>(&self, f: F) -> Result<Subscription, RegistryError>
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(ObserverFn::new(f)))
    }

    /// Returns `true` while the channel this observable was created for is
    /// active (its wrapper installed).
    pub fn is_active(&self) -> bool {
        self.key
            .namespace()
            .is_some_and(|ns| ns.active_channel(self.handler()) == Some(self.key.id()))
    }

    /// Number of subscribers currently attached to the pair's channel.
    pub fn subscriber_count(&self) -> usize {
        self.key
            .namespace()
            .map_or(0, |ns| ns.subscriber_count(self.handler()))
    }
}

/// Worker loop of a push-mode subscriber.
async fn observe_loop(
    mut rx: broadcast::Receiver<Value>,
    observer: Arc<dyn Observer>,
    token: CancellationToken,
    bus: Bus,
    key: ChannelKey,
) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            msg = rx.recv() => match msg {
                Ok(value) => {
                    let fut = observer.on_next(&value);
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(&*panic_err);
                        tracing::warn!(observer = observer.name(), %info, "observer panicked");
                        bus.publish(
                            Event::new(EventKind::ObserverPanicked)
                                .with_namespace(key.namespace_name().clone())
                                .with_handler(key.handler().clone())
                                .with_subscriber(observer.name())
                                .with_reason(info),
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    bus.publish(
                        Event::new(EventKind::ObserverLagged)
                            .with_namespace(key.namespace_name().clone())
                            .with_handler(key.handler().clone())
                            .with_subscriber(observer.name())
                            .with_skipped(skipped),
                    );
                    observer.on_error(&ChannelError::Lagged { skipped }).await;
                }
                Err(RecvError::Closed) => {
                    observer.on_complete().await;
                    break;
                }
            }
        }
    }
}
