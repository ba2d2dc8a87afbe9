//! # Lifecycle event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the `SubscriberSet` fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Namespace ── publish(Event) ──► Bus ──► event listener ──► SubscriberSet
//!                                                              │
//!                                                   ┌──────────┼──────────┐
//!                                                   ▼          ▼          ▼
//!                                               LogWriter    Audit      Custom
//! ```
//!
//! Subscribers see registry lifecycle only. To receive handler results use
//! [`Namespace::observe`](crate::Namespace::observe).

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub(crate) use subscriber_set::{panic_message, SubscriberSet};
