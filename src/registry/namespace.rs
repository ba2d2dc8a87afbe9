//! # Mounted namespace: live handler slots and the channel table.
//!
//! A [`Namespace`] is what the registry stores for each mounted module:
//! - **slots**: handler name → current [`HandlerRef`] (the original, or the
//!   observing wrapper while observed);
//! - **channel table**: handler name → channel entry, at most one per handler.
//!
//! ## Rules
//! - Calls clone the slot under the lock and await outside it.
//! - Only the channel lifecycle reassigns a slot, and always under the lock:
//!   - first subscriber: slot ← `ObservedHandler(original)`
//!   - last subscriber detaches: slot ← original, entry removed
//! - The channel table is the check-and-set point: concurrent `observe` calls
//!   for the same handler share one entry, so only one wrapper is ever installed.
//!
//! ```text
//!                 ┌────────────── Namespace "math" ───────────────┐
//! call("add") ──► │ slots:    add ─► ObservedHandler ─► original  │
//!                 │           sub ─► original                      │
//!                 │ channels: add ─► { channel#7, subscribers: 2 } │
//!                 └───────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::channel::{Channel, ChannelKey, Observable};
use crate::error::{HandlerError, RegistryError};
use crate::events::{Bus, Event, EventKind};
use crate::handlers::{Args, HandlerRef, ObservedHandler};
use crate::namespace::NamespacePath;

/// Channel-table entry for one handler.
struct ChannelEntry {
    channel: Arc<Channel>,
    /// Handler the slot held before the wrapper went in; `Some` while active.
    original: Option<HandlerRef>,
    subscribers: usize,
}

struct NamespaceState {
    slots: BTreeMap<String, HandlerRef>,
    channels: HashMap<String, ChannelEntry>,
}

/// A mounted module's namespace entry.
pub struct Namespace {
    path: NamespacePath,
    name: Arc<str>,
    state: Mutex<NamespaceState>,
    channel_capacity: usize,
    bus: Bus,
    me: Weak<Namespace>,
}

impl Namespace {
    pub(crate) fn new(
        path: NamespacePath,
        slots: BTreeMap<String, HandlerRef>,
        channel_capacity: usize,
        bus: Bus,
    ) -> Arc<Self> {
        let name: Arc<str> = Arc::from(path.as_str());
        Arc::new_cyclic(|me| Self {
            path,
            name,
            state: Mutex::new(NamespaceState {
                slots,
                channels: HashMap::new(),
            }),
            channel_capacity,
            bus,
            me: me.clone(),
        })
    }

    pub fn path(&self) -> &NamespacePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handler names in this namespace, sorted.
    pub fn handler_names(&self) -> Vec<String> {
        self.state.lock().slots.keys().cloned().collect()
    }

    pub fn has_handler(&self, handler: &str) -> bool {
        self.state.lock().slots.contains_key(handler)
    }

    /// Returns the handler currently occupying the slot (possibly a wrapper).
    pub fn handler(&self, handler: &str) -> Option<HandlerRef> {
        self.state.lock().slots.get(handler).cloned()
    }

    /// Invokes a handler by name.
    ///
    /// Identical whether or not the handler is observed: same arguments reach
    /// the handler, same value or error comes back.
    pub async fn call(&self, handler: &str, args: impl Into<Args>) -> Result<Value, HandlerError> {
        let current = self.handler(handler).ok_or_else(|| HandlerError::NotFound {
            namespace: self.name.to_string(),
            handler: handler.to_string(),
        })?;
        current.call(args.into()).await
    }

    /// Returns an [`Observable`] for `handler`, claiming a channel-table entry
    /// if none exists yet.
    ///
    /// The handler is wrapped when the first subscriber attaches, not here.
    pub fn observe(&self, handler: &str) -> Result<Observable, RegistryError> {
        let (key, created) = {
            let mut state = self.state.lock();
            let (channel, created) = self.claim(&mut state, handler)?;
            let created = created.then(|| self.event(EventKind::ChannelCreated, handler, None));
            (channel.key().clone(), created)
        };
        if let Some(ev) = created {
            tracing::debug!(namespace = self.name(), handler, "channel created");
            self.bus.publish(ev);
        }
        Ok(Observable::new(key))
    }

    /// Returns `true` while `handler`'s slot holds an observing wrapper.
    pub fn is_observed(&self, handler: &str) -> bool {
        self.active_channel(handler).is_some()
    }

    /// Handlers that currently have an active channel, sorted.
    pub fn observed_handlers(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut names: Vec<String> = state
            .channels
            .iter()
            .filter(|(_, entry)| entry.original.is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of subscribers attached to `handler`'s channel.
    pub fn subscriber_count(&self, handler: &str) -> usize {
        self.state
            .lock()
            .channels
            .get(handler)
            .map_or(0, |entry| entry.subscribers)
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Id of `handler`'s channel if it is active.
    pub(crate) fn active_channel(&self, handler: &str) -> Option<u64> {
        self.state
            .lock()
            .channels
            .get(handler)
            .filter(|entry| entry.original.is_some())
            .map(|entry| entry.channel.id())
    }

    /// Attaches one subscriber to `handler`'s channel.
    ///
    /// Creates the entry if needed and installs the wrapper on the first
    /// subscriber. The receiver is created under the lock, so it sees every
    /// result published after activation. Lifecycle events take their `seq`
    /// under the lock too, so `seq` order is the order of slot changes.
    pub(crate) fn attach(
        &self,
        handler: &str,
    ) -> Result<(ChannelKey, broadcast::Receiver<Value>), RegistryError> {
        let mut events = Vec::with_capacity(3);

        let (key, rx, subscribers) = {
            let mut guard = self.state.lock();
            let (channel, created) = self.claim(&mut guard, handler)?;
            if created {
                events.push(self.event(EventKind::ChannelCreated, handler, None));
            }

            let state = &mut *guard;
            let entry = state
                .channels
                .get_mut(handler)
                .ok_or_else(|| self.handler_not_found(handler))?;

            if entry.original.is_none() {
                let original = state
                    .slots
                    .get(handler)
                    .cloned()
                    .ok_or_else(|| self.handler_not_found(handler))?;
                let wrapper: HandlerRef = Arc::new(ObservedHandler::new(
                    Arc::clone(&original),
                    channel.sender(),
                    Arc::clone(&self.name),
                    Arc::from(handler),
                ));
                state.slots.insert(handler.to_string(), wrapper);
                entry.original = Some(original);
                events.push(self.event(EventKind::ChannelActivated, handler, None));
            }

            entry.subscribers += 1;
            let subscribers = entry.subscribers;
            events.push(self.event(EventKind::SubscriberAttached, handler, Some(subscribers)));
            (channel.key().clone(), channel.receiver(), subscribers)
        };

        tracing::debug!(namespace = self.name(), handler, subscribers, "subscriber attached");
        for ev in events {
            self.bus.publish(ev);
        }
        Ok((key, rx))
    }

    /// Detaches one subscriber from the channel identified by `key`.
    ///
    /// The last detach removes the entry and restores the original handler.
    /// A key whose channel is gone (already torn down) is ignored.
    pub(crate) fn detach(&self, key: &ChannelKey) {
        let handler: &str = key.handler();

        let (remaining, detached, torn_down) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;

            let Some(entry) = state.channels.get_mut(handler) else {
                return;
            };
            if entry.channel.id() != key.id() || entry.subscribers == 0 {
                return;
            }

            entry.subscribers -= 1;
            let remaining = entry.subscribers;
            let detached = self.event(EventKind::SubscriberDetached, handler, Some(remaining));
            let mut torn_down = None;
            if remaining == 0 {
                if let Some(entry) = state.channels.remove(handler) {
                    if let Some(original) = entry.original {
                        state.slots.insert(handler.to_string(), original);
                    }
                }
                torn_down = Some(self.event(EventKind::ChannelTornDown, handler, None));
            }
            (remaining, detached, torn_down)
        };

        tracing::debug!(namespace = self.name(), handler, remaining, "subscriber detached");
        self.bus.publish(detached);
        if let Some(ev) = torn_down {
            tracing::debug!(namespace = self.name(), handler, "channel torn down; original restored");
            self.bus.publish(ev);
        }
    }

    /// Returns the existing entry's channel or inserts a new, inactive one.
    fn claim(
        &self,
        state: &mut NamespaceState,
        handler: &str,
    ) -> Result<(Arc<Channel>, bool), RegistryError> {
        if let Some(entry) = state.channels.get(handler) {
            return Ok((Arc::clone(&entry.channel), false));
        }
        if !state.slots.contains_key(handler) {
            return Err(self.handler_not_found(handler));
        }

        let channel = Arc::new(Channel::new(
            self.me.clone(),
            Arc::clone(&self.name),
            Arc::from(handler),
            self.channel_capacity,
        ));
        state.channels.insert(
            handler.to_string(),
            ChannelEntry {
                channel: Arc::clone(&channel),
                original: None,
                subscribers: 0,
            },
        );
        Ok((channel, true))
    }

    fn handler_not_found(&self, handler: &str) -> RegistryError {
        RegistryError::HandlerNotFound {
            namespace: self.name.to_string(),
            handler: handler.to_string(),
        }
    }

    /// Builds a lifecycle event; `seq` is taken here.
    fn event(&self, kind: EventKind, handler: &str, subscribers: Option<usize>) -> Event {
        let ev = Event::new(kind)
            .with_namespace(Arc::clone(&self.name))
            .with_handler(handler);
        match subscribers {
            Some(n) => ev.with_subscribers(n),
            None => ev,
        }
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("path", &self.path)
            .field("handlers", &self.handler_names())
            .field("observed", &self.observed_handlers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerFn;
    use serde_json::json;

    fn math() -> Arc<Namespace> {
        let add: HandlerRef = HandlerFn::arc(|args: Args| async move {
            Ok::<_, HandlerError>(json!(args.arg::<i64>(0)? + args.arg::<i64>(1)?))
        });
        let mut slots = BTreeMap::new();
        slots.insert("add".to_string(), add);
        Namespace::new(NamespacePath::parse("math").unwrap(), slots, 16, Bus::new(16))
    }

    #[test]
    fn observe_unknown_handler_fails() {
        let ns = math();
        let err = ns.observe("mul").unwrap_err();
        assert_eq!(
            err,
            RegistryError::HandlerNotFound {
                namespace: "math".into(),
                handler: "mul".into()
            }
        );
    }

    #[test]
    fn observe_alone_does_not_wrap() {
        let ns = math();
        let original = ns.handler("add").unwrap();
        let _obs = ns.observe("add").unwrap();

        assert!(!ns.is_observed("add"));
        assert!(Arc::ptr_eq(&ns.handler("add").unwrap(), &original));
    }

    #[test]
    fn attach_and_detach_swap_the_slot() {
        let ns = math();
        let original = ns.handler("add").unwrap();

        let (key, _rx) = ns.attach("add").unwrap();
        assert!(ns.is_observed("add"));
        assert!(!Arc::ptr_eq(&ns.handler("add").unwrap(), &original));

        ns.detach(&key);
        assert!(!ns.is_observed("add"));
        assert!(Arc::ptr_eq(&ns.handler("add").unwrap(), &original));

        // stale key after teardown
        ns.detach(&key);
        assert_eq!(ns.subscriber_count("add"), 0);
    }

    #[tokio::test]
    async fn call_missing_handler_is_not_found() {
        let ns = math();
        let err = ns.call("mul", json!([1, 2])).await.unwrap_err();
        assert_eq!(err.as_label(), "handler_not_found");
    }
}
