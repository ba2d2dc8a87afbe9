//! # Subscription channels.
//!
//! This module provides the observation side of the registry:
//! - [`Observable`] - returned by `observe`, subscribable
//! - [`Subscription`] - one subscriber's attachment; unsubscribing the last one tears the channel down
//! - [`Listener`] - pull-mode subscriber (`recv`, `Stream`)
//! - [`Observer`], [`ObserverFn`] - push-mode subscribers
//! - `Channel` - internal multicast sender owned by a namespace's channel table

mod multicast;
mod observable;
mod observer;
mod subscription;

pub(crate) use multicast::{Channel, ChannelKey};
pub use observable::Observable;
pub use observer::{Observer, ObserverFn};
pub use subscription::{Listener, Subscription};
