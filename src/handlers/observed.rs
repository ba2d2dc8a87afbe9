//! # Observing wrapper.
//!
//! [`ObservedHandler`] is the decorator a channel installs into a handler slot
//! while the handler is observed.
//!
//! ```text
//! caller ── call(args) ──► ObservedHandler ── call(args) ──► original
//!                               │                              │
//!                               │◄──────── Ok(value) ──────────┘
//!                               ├──► tx.send(value.clone())  (to every subscriber)
//!                               └──► Ok(value) to the caller
//! ```
//!
//! ## Rules
//! - Arguments reach the original untouched.
//! - Only `Ok` results are published, after the original completes.
//! - `Err` results are returned unchanged and never published.
//! - Publishing never blocks and never fails the call (no receivers is fine).

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::handlers::handler::{BoxHandlerFuture, Handler, HandlerRef};
use crate::handlers::Args;

/// Handler decorator that publishes successful results.
pub(crate) struct ObservedHandler {
    original: HandlerRef,
    tx: broadcast::Sender<Value>,
    namespace: Arc<str>,
    handler: Arc<str>,
}

impl ObservedHandler {
    pub(crate) fn new(
        original: HandlerRef,
        tx: broadcast::Sender<Value>,
        namespace: Arc<str>,
        handler: Arc<str>,
    ) -> Self {
        Self {
            original,
            tx,
            namespace,
            handler,
        }
    }
}

impl Handler for ObservedHandler {
    fn call(&self, args: Args) -> BoxHandlerFuture {
        let fut = self.original.call(args);
        let tx = self.tx.clone();
        let namespace = Arc::clone(&self.namespace);
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let value = fut.await?;
            let delivered = tx.send(value.clone()).unwrap_or(0);
            tracing::trace!(namespace = &*namespace, handler = &*handler, delivered, "result published");
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::HandlerFn;
    use serde_json::json;

    fn observed(original: HandlerRef) -> (ObservedHandler, broadcast::Receiver<Value>) {
        let (tx, rx) = broadcast::channel(8);
        (
            ObservedHandler::new(original, tx, Arc::from("math"), Arc::from("div")),
            rx,
        )
    }

    fn div() -> HandlerRef {
        HandlerFn::arc(|args: Args| async move {
            let a: i64 = args.arg(0)?;
            let b: i64 = args.arg(1)?;
            if b == 0 {
                return Err(HandlerError::failed("division by zero"));
            }
            Ok::<_, HandlerError>(json!(a / b))
        })
    }

    #[tokio::test]
    async fn publishes_and_returns_success() {
        let (h, mut rx) = observed(div());
        assert_eq!(h.call(Args::from(json!([9, 3]))).await.unwrap(), json!(3));
        assert_eq!(rx.try_recv().unwrap(), json!(3));
    }

    #[tokio::test]
    async fn failure_passes_through_without_publishing() {
        let (h, mut rx) = observed(div());
        let err = h.call(Args::from(json!([1, 0]))).await.unwrap_err();
        assert_eq!(err, HandlerError::failed("division by zero"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn no_receivers_is_not_an_error() {
        let (tx, rx) = broadcast::channel(1);
        drop(rx);
        let h = ObservedHandler::new(div(), tx, Arc::from("math"), Arc::from("div"));
        assert_eq!(h.call(Args::from(json!([4, 2]))).await.unwrap(), json!(2));
    }
}
