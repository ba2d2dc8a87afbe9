//! # modrain
//!
//! **modrain** is a namespaced registry of async handlers where any handler
//! can be transparently *observed*: subscribers receive every successful
//! result the handler produces, while callers keep calling it exactly as
//! before.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   register_module("math", {add, sub})        register_module("users.admin", {...})
//!                 │                                         │
//!                 ▼                                         ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry                                                         │
//! │  - NamespaceStore (dotted paths → Namespace)                      │
//! │  - Bus (lifecycle events) ──► SubscriberSet ──► LogWriter, ...    │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Namespace "math"                                                 │
//! │   slots:    add ─► ObservedHandler ─► original add                │
//! │             sub ─► original sub                                   │
//! │   channels: add ─► Channel (broadcast, 2 subscribers)             │
//! └──────┬─────────────────────────────────────┬──────────────────────┘
//!        │ call("add", [2, 3])                 │ Ok(5) published
//!        ▼                                     ▼
//!     caller gets Ok(5)              ┌─────────┴─────────┐
//!                                    ▼                   ▼
//!                              Listener::recv      Observer::on_next
//! ```
//!
//! ### Lifecycle
//! ```text
//! observe("add")            ─► channel entry claimed (slot untouched)
//! first subscribe           ─► slot ← ObservedHandler(original)
//! call("add", args)         ─► original runs; Ok(v) published, then returned
//!                              Err(e) returned unchanged, nothing published
//! last unsubscribe          ─► entry removed, slot ← original
//! observe("add") again      ─► fresh channel bound to the restored original
//! ```
//!
//! ### Delivery
//! Results go out over a bounded multicast buffer of
//! [`RegistryConfig::channel_capacity`] entries per observed handler. Delivery
//! is lossy past that bound: a subscriber that falls more than
//! `channel_capacity` results behind loses the oldest ones. Callers are never
//! slowed down. The loss is reported as [`ChannelError::Lagged`] to push-mode
//! observers and as an [`EventKind::ObserverLagged`] event in both modes.
//! Subscribers that keep up receive every result, in publication order
//! (overlapping calls publish in completion order).
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                       |
//! |-------------------|----------------------------------------------------------|------------------------------------------|
//! | **Registration**  | Mount modules of handlers under dotted namespaces.       | [`Registry`], [`Module`], [`NamespacePath`] |
//! | **Handlers**      | Async handlers over JSON arguments.                      | [`Handler`], [`HandlerFn`], [`Args`]     |
//! | **Observation**   | Multicast results of any handler, no replay.             | [`Observable`], [`Listener`], [`Observer`] |
//! | **Events**        | Lifecycle events with pluggable subscribers.             | [`Event`], [`Subscribe`]                 |
//! | **Errors**        | Typed errors for registration, execution and delivery.   | [`RegistryError`], [`HandlerError`]      |
//! | **Configuration** | Channel and bus capacities.                              | [`RegistryConfig`]                       |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogWriter`], which writes lifecycle events through `tracing`.
//!
//! ## Example
//! ```rust
//! use modrain::{Args, HandlerError, HandlerFn, HandlerRef, Registry, RegistryConfig};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::new(RegistryConfig::default());
//!
//!     let add: HandlerRef = HandlerFn::arc(|args: Args| async move {
//!         Ok::<_, HandlerError>(json!(args.arg::<i64>(0)? + args.arg::<i64>(1)?))
//!     });
//!     registry.register_module("math", [("add", add)])?;
//!
//!     let math = registry.require("math")?;
//!     let mut results = math.observe("add")?.listen()?;
//!
//!     assert_eq!(math.call("add", json!([2, 3])).await?, json!(5));
//!     assert_eq!(results.recv().await, Some(json!(5)));
//!
//!     results.unsubscribe();
//!     assert!(!math.is_observed("add"));
//!     Ok(())
//! }
//! ```
mod channel;
mod config;
mod error;
mod events;
mod handlers;
mod module;
mod namespace;
mod registry;
mod subscribers;

// ---- Public re-exports ----

pub use channel::{Listener, Observable, Observer, ObserverFn, Subscription};
pub use config::RegistryConfig;
pub use error::{ChannelError, HandlerError, RegistryError};
pub use events::{Event, EventKind};
pub use handlers::{Args, BoxHandlerFuture, Handler, HandlerFn, HandlerRef};
pub use module::Module;
pub use namespace::{NamespacePath, NamespaceStore};
pub use registry::{Namespace, Registry, RegistryBuilder};
pub use subscribers::Subscribe;

// Optional: built-in logger subscriber.
// Enable with: `--features logging` (on by default)
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
