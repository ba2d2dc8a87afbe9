//! # Subscription channel.
//!
//! One [`Channel`] exists per observed (namespace, handler) pair. It owns the
//! broadcast sender that the wrapper publishes into; the namespace's channel
//! table owns the channel.
//!
//! A [`ChannelKey`] identifies a channel without keeping its sender alive, so
//! observables and subscriptions never delay the end of the stream.
//!
//! ## Lifecycle
//! ```text
//! observe()          first subscriber          last subscriber detaches
//!    │                      │                            │
//!    ▼                      ▼                            ▼
//! Inactive ───────────► Active ──────────────────► Torn-down
//! (entry claimed,      (wrapper installed,        (entry removed,
//!  slot untouched)      original captured)         original restored)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use serde_json::Value;
use tokio::sync::broadcast;

use crate::registry::Namespace;

/// Source of channel identities; a torn-down channel's id is never reused.
static CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a channel and the way back to its namespace.
#[derive(Clone, Debug)]
pub(crate) struct ChannelKey {
    id: u64,
    namespace: Weak<Namespace>,
    namespace_name: Arc<str>,
    handler: Arc<str>,
}

impl ChannelKey {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn namespace(&self) -> Option<Arc<Namespace>> {
        self.namespace.upgrade()
    }

    pub(crate) fn namespace_name(&self) -> &Arc<str> {
        &self.namespace_name
    }

    pub(crate) fn handler(&self) -> &Arc<str> {
        &self.handler
    }
}

/// Multicast sender bound to one (namespace, handler) pair.
pub(crate) struct Channel {
    key: ChannelKey,
    tx: broadcast::Sender<Value>,
}

impl Channel {
    pub(crate) fn new(
        namespace: Weak<Namespace>,
        namespace_name: Arc<str>,
        handler: Arc<str>,
        capacity: usize,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            key: ChannelKey {
                id: CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
                namespace,
                namespace_name,
                handler,
            },
            tx,
        }
    }

    pub(crate) fn key(&self) -> &ChannelKey {
        &self.key
    }

    pub(crate) fn id(&self) -> u64 {
        self.key.id
    }

    /// Sender handed to the wrapper.
    pub(crate) fn sender(&self) -> broadcast::Sender<Value> {
        self.tx.clone()
    }

    /// New receiver; sees only results published after this call.
    pub(crate) fn receiver(&self) -> broadcast::Receiver<Value> {
        self.tx.subscribe()
    }
}
