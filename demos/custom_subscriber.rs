//! # Example: custom_subscriber
//!
//! Demonstrates how to build and attach a custom lifecycle event subscriber.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] for channel lifecycle.
//! - Wire the subscriber into [`Registry::builder`].
//!
//! ## Flow
//! ```text
//! Registry::builder(cfg).with_subscribers([Console]).build()
//!     ├─► register_module  ──► ModuleMounted
//!     ├─► observe          ──► ChannelCreated
//!     ├─► listen           ──► ChannelActivated, SubscriberAttached
//!     └─► unsubscribe      ──► SubscriberDetached, ChannelTornDown
//!                                   │
//!                     event listener ──► SubscriberSet ──► Console.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::{sync::Arc, time::Duration};

use modrain::{
    Args, Event, EventKind, HandlerError, HandlerFn, HandlerRef, Registry, RegistryConfig,
    Subscribe,
};
use serde_json::json;

/// Prints channel lifecycle to stdout.
struct Console;

#[async_trait::async_trait]
impl Subscribe for Console {
    async fn on_event(&self, ev: &Event) {
        let ns = ev.namespace.as_deref().unwrap_or("<none>");
        let handler = ev.handler.as_deref().unwrap_or("<none>");

        match ev.kind {
            EventKind::ModuleMounted => {
                println!("[sub] mounted:   ns={ns} handlers={}", ev.handlers.unwrap_or(0));
            }
            EventKind::ChannelCreated => println!("[sub] created:   {ns}.{handler}"),
            EventKind::ChannelActivated => println!("[sub] activated: {ns}.{handler}"),
            EventKind::SubscriberAttached | EventKind::SubscriberDetached => {
                println!(
                    "[sub] {:?}: {ns}.{handler} subscribers={}",
                    ev.kind,
                    ev.subscribers.unwrap_or(0)
                );
            }
            EventKind::ChannelTornDown => println!("[sub] torn down: {ns}.{handler}"),
            EventKind::ObserverPanicked | EventKind::ObserverLagged => {
                println!(
                    "[sub] observer trouble: {ns}.{handler} {:?} reason={}",
                    ev.kind,
                    ev.reason.as_deref().unwrap_or("<none>")
                );
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {}
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }

    fn queue_capacity(&self) -> usize {
        256
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Console)];
    let registry = Registry::builder(RegistryConfig::default())
        .with_subscribers(subs)
        .build();

    let greet: HandlerRef = HandlerFn::arc(|args: Args| async move {
        let name: String = args.arg(0)?;
        Ok::<_, HandlerError>(json!(format!("hello, {name}")))
    });
    registry.register_module("users.admin", [("greet", greet)])?;

    let mut listener = registry.observe("users.admin", "greet")?.listen()?;
    registry.call("users.admin", "greet", json!(["ada"])).await?;
    println!("[pull] {:?}", listener.recv().await);
    listener.unsubscribe();

    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
