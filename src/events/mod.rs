//! Registry events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the registry, its
//! namespaces, observer workers and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registry` (mount), `Namespace` (channel lifecycle),
//!   observer workers (panic/lag), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the registry's event listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from `Registry::events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
