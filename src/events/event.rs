//! # Lifecycle events emitted by the registry.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Registration events**: modules mounted into the namespace store
//! - **Channel events**: observation lifecycle (created, activated, attached, detached, torn down)
//! - **Delivery events**: observer and subscriber problems (panics, lag, overflow)
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! namespace, handler name, subscriber counts and reasons.
//!
//! Events describe the registry itself. Handler results travel on their own
//! per-handler channels and never appear here.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//! Registry and channel lifecycle events take their `seq` while the state
//! change they describe is still locked, so for one namespace `seq` order is
//! the order in which mounts and slot changes happened.
//!
//! ## Example
//! ```rust
//! use modrain::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ChannelActivated)
//!     .with_namespace("math")
//!     .with_handler("add")
//!     .with_subscribers(1);
//!
//! assert_eq!(ev.kind, EventKind::ChannelActivated);
//! assert_eq!(ev.namespace.as_deref(), Some("math"));
//! assert_eq!(ev.handler.as_deref(), Some("add"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Event subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Event subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Registration events ===
    /// A module was mounted into the namespace store.
    ///
    /// Sets:
    /// - `namespace`: module namespace
    /// - `handlers`: number of handlers mounted
    ModuleMounted,

    // === Channel lifecycle ===
    /// A channel-table entry was claimed by `observe`; the handler is not wrapped yet.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    ChannelCreated,

    /// First subscriber attached; the handler slot now holds the wrapper.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    ChannelActivated,

    /// A subscriber attached to an active channel.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    /// - `subscribers`: subscriber count after attaching
    SubscriberAttached,

    /// A subscriber detached from a channel.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    /// - `subscribers`: subscriber count after detaching
    SubscriberDetached,

    /// Last subscriber detached; channel removed and the original handler restored.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    ChannelTornDown,

    // === Observer delivery ===
    /// An observer callback panicked while handling a result.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    /// - `subscriber`: observer name
    /// - `reason`: panic info/message
    ObserverPanicked,

    /// An observer fell behind and skipped results.
    ///
    /// Sets:
    /// - `namespace`, `handler`
    /// - `subscriber`: observer name
    /// - `skipped`: number of results missed
    ObserverLagged,
}

/// Registry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Namespace the event concerns, if any.
    pub namespace: Option<Arc<str>>,
    /// Handler name the event concerns, if any.
    pub handler: Option<Arc<str>>,
    /// Subscriber or observer name, if any.
    pub subscriber: Option<Arc<str>>,
    /// Human-readable reason (panic details, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Number of subscribers attached to the channel after the change.
    pub subscribers: Option<u32>,
    /// Number of handlers a mounted module brought.
    pub handlers: Option<u32>,
    /// Number of results skipped by a lagging observer.
    pub skipped: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            namespace: None,
            handler: None,
            subscriber: None,
            reason: None,
            subscribers: None,
            handlers: None,
            skipped: None,
        }
    }

    /// Attaches a namespace.
    #[inline]
    pub fn with_namespace(mut self, namespace: impl Into<Arc<str>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Attaches a handler name.
    #[inline]
    pub fn with_handler(mut self, handler: impl Into<Arc<str>>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Attaches a subscriber or observer name.
    #[inline]
    pub fn with_subscriber(mut self, subscriber: impl Into<Arc<str>>) -> Self {
        self.subscriber = Some(subscriber.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a subscriber count (saturates at `u32::MAX`).
    #[inline]
    pub fn with_subscribers(mut self, n: usize) -> Self {
        self.subscribers = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a handler count (saturates at `u32::MAX`).
    #[inline]
    pub fn with_handlers(mut self, n: usize) -> Self {
        self.handlers = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches the number of skipped results.
    #[inline]
    pub fn with_skipped(mut self, n: u64) -> Self {
        self.skipped = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_subscriber(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_subscriber(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::ModuleMounted);
        let b = Event::new(EventKind::ModuleMounted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn handler_and_subscriber_counts_are_separate() {
        let ev = Event::new(EventKind::ModuleMounted).with_handlers(3);
        assert_eq!(ev.handlers, Some(3));
        assert_eq!(ev.subscribers, None);
    }

    #[test]
    fn overflow_helper_fills_fields() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.subscriber.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }
}
