//! # Example: observe
//!
//! Mounts a `math` module, observes `add` in both pull and push mode, then
//! unsubscribes and shows the original handler is back in its slot.
//!
//! ## Flow
//! ```text
//! register_module("math", {add, div})
//!     ├─► observe("add").listen()        (pull: Listener)
//!     ├─► observe("add").subscribe_fn()  (push: closure)
//!     ├─► call("add", [2, 3])  ──► both subscribers see 5
//!     ├─► call("div", [1, 0])  ──► error to the caller, nothing published
//!     └─► unsubscribe both     ──► original `add` restored
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=modrain=debug cargo run --example observe
//! ```

use std::sync::Arc;

use modrain::{Args, HandlerError, HandlerFn, HandlerRef, LogWriter, Registry, RegistryConfig, Subscribe};
use serde_json::json;

fn add() -> HandlerRef {
    HandlerFn::arc(|args: Args| async move {
        Ok::<_, HandlerError>(json!(args.arg::<i64>(0)? + args.arg::<i64>(1)?))
    })
}

fn div() -> HandlerRef {
    HandlerFn::arc(|args: Args| async move {
        let (a, b): (i64, i64) = (args.arg(0)?, args.arg(1)?);
        if b == 0 {
            return Err(HandlerError::failed("division by zero"));
        }
        Ok::<_, HandlerError>(json!(a / b))
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let registry = Registry::builder(RegistryConfig::default())
        .with_subscribers(subs)
        .build();

    let module = registry.register_module("math", [("add", add()), ("div", div())])?;
    let math = registry.require("math")?;

    let observable = math.observe("add")?;
    let mut listener = observable.listen()?;
    let pushed = observable.subscribe_fn(|v| println!("[push] add -> {v}"))?;

    let sum = math.call("add", json!([2, 3])).await?;
    println!("[call] add(2, 3) = {sum}");
    println!("[pull] add -> {:?}", listener.recv().await);

    match math.call("div", json!([1, 0])).await {
        Ok(v) => println!("[call] div(1, 0) = {v}"),
        Err(e) => println!("[call] div(1, 0) failed: {e}"),
    }

    listener.unsubscribe();
    pushed.unsubscribe();

    let restored = match (math.handler("add"), module.handler("add")) {
        (Some(slot), Some(original)) => Arc::ptr_eq(&slot, &original),
        _ => false,
    };
    println!("observed={} original restored={restored}", math.is_observed("add"));

    // let the log subscriber drain
    tokio::task::yield_now().await;
    Ok(())
}
