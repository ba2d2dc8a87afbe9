//! # LogWriter: lifecycle events as `tracing` records
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Install a `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output
//! ```text
//! INFO  modrain: module mounted namespace="math" handlers=2
//! DEBUG modrain: channel activated namespace="math" handler="add"
//! DEBUG modrain: subscriber attached namespace="math" handler="add" subscribers=1
//! INFO  modrain: channel torn down namespace="math" handler="add"
//! WARN  modrain: observer panicked namespace="math" handler="add" observer="collector" info="boom"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let ns = e.namespace.as_deref().unwrap_or("-");
        let handler = e.handler.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ModuleMounted => {
                tracing::info!(target: "modrain", namespace = ns, handlers = ?e.handlers, "module mounted");
            }
            EventKind::ChannelCreated => {
                tracing::debug!(target: "modrain", namespace = ns, handler, "channel created");
            }
            EventKind::ChannelActivated => {
                tracing::debug!(target: "modrain", namespace = ns, handler, "channel activated");
            }
            EventKind::SubscriberAttached => {
                tracing::debug!(target: "modrain", namespace = ns, handler, subscribers = ?e.subscribers, "subscriber attached");
            }
            EventKind::SubscriberDetached => {
                tracing::debug!(target: "modrain", namespace = ns, handler, subscribers = ?e.subscribers, "subscriber detached");
            }
            EventKind::ChannelTornDown => {
                tracing::info!(target: "modrain", namespace = ns, handler, "channel torn down");
            }
            EventKind::ObserverPanicked => {
                tracing::warn!(
                    target: "modrain",
                    namespace = ns,
                    handler,
                    observer = e.subscriber.as_deref().unwrap_or("unknown"),
                    info = e.reason.as_deref().unwrap_or("unknown"),
                    "observer panicked"
                );
            }
            EventKind::ObserverLagged => {
                tracing::warn!(
                    target: "modrain",
                    namespace = ns,
                    handler,
                    observer = e.subscriber.as_deref().unwrap_or("unknown"),
                    skipped = ?e.skipped,
                    "observer lagged"
                );
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "modrain", subscriber = ?e.subscriber, reason = ?e.reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(
                    target: "modrain",
                    subscriber = e.subscriber.as_deref().unwrap_or("unknown"),
                    info = e.reason.as_deref().unwrap_or("unknown"),
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
