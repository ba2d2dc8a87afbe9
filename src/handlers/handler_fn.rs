//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Args) -> Fut`, producing a fresh
//! future per call. Shared state goes into the closure explicitly as `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use modrain::{Args, HandlerError, HandlerFn, HandlerRef};
//! use serde_json::{json, Value};
//!
//! let add: HandlerRef = HandlerFn::arc(|args: Args| async move {
//!     let a: i64 = args.arg(0)?;
//!     let b: i64 = args.arg(1)?;
//!     Ok::<Value, HandlerError>(json!(a + b))
//! });
//! # let _ = add;
//! ```

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HandlerError;
use crate::handlers::handler::{BoxHandlerFuture, Handler};
use crate::handlers::Args;

/// Function-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per call.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc<Fut>(f: F) -> Arc<Self>
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
    {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Args) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    fn call(&self, args: Args) -> BoxHandlerFuture {
        let fut = (self.f)(args);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerRef;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn each_call_creates_a_fresh_future() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let h: HandlerRef = HandlerFn::arc(move |_args: Args| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, HandlerError>(json!(n)) }
        });

        assert_eq!(h.call(Args::empty()).await.unwrap(), json!(1));
        assert_eq!(h.call(Args::empty()).await.unwrap(), json!(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_come_back_unchanged() {
        let h: HandlerRef =
            HandlerFn::arc(|_args: Args| async { Err::<Value, _>(HandlerError::failed("nope")) });
        assert_eq!(
            h.call(Args::empty()).await.unwrap_err(),
            HandlerError::failed("nope")
        );
    }
}
