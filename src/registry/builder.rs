use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    config::RegistryConfig,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};
use super::registry::Registry;

/// Builder for constructing a [`Registry`] with optional event subscribers.
pub struct RegistryBuilder {
    cfg: RegistryConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RegistryConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets lifecycle event subscribers.
    ///
    /// Subscribers receive registry events (mounts, channel lifecycle,
    /// observer panics) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry.
    ///
    /// With subscribers configured this spawns the subscriber workers and the
    /// event listener, so it must be called from within a Tokio runtime. The
    /// listener stops when the registry is dropped.
    pub fn build(self) -> Registry {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let runtime_token = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_listener(set, &bus, runtime_token.clone());
        }

        Registry::new_internal(self.cfg, bus, runtime_token)
    }
}

/// Forwards bus events to the subscriber set until the registry is dropped.
fn spawn_listener(set: SubscriberSet, bus: &Bus, token: CancellationToken) {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "registry event listener lagged");
                        continue;
                    }
                }
            }
        }

        // drain what was already queued for subscribers
        while let Ok(ev) = rx.try_recv() {
            set.emit_arc(Arc::new(ev));
        }
        set.shutdown().await;
    });
}
