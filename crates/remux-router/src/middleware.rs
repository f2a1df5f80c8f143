//! Handler composition.
//!
//! A middleware turns a handler into another handler. [`chain`] stacks
//! middleware around a handler so that the first one given is the outermost:
//! it runs first on the way in and last on the way out.
//!
//! ```ignore
//! use remux_router::{chain, LoggingMiddleware, RecoverMiddleware};
//!
//! let handler = chain(router.into_handler(), &[&LoggingMiddleware, &RecoverMiddleware]);
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use crate::request::Request;
use crate::response::Response;
use crate::router::{handler_fn, Handler};

/// A boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wraps a handler with extra behavior.
///
/// Implemented for every `Fn(Handler) -> Handler`, so plain closures work.
pub trait Middleware: Send + Sync {
    /// Returns a handler that runs around `next`.
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Wraps `handler` with `middleware`, first element outermost.
///
/// `chain(h, &[&a, &b])` behaves as `a(b(h))`: `a` enters first and returns
/// last.
pub fn chain(handler: Handler, middleware: &[&dyn Middleware]) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, mw| mw.wrap(next))
}

/// Logs the request path and final status code of every request.
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn wrap(&self, next: Handler) -> Handler {
        handler_fn(move |req: Request| {
            let next = Arc::clone(&next);
            async move {
                let path = req.path.clone();
                let res = next(req).await;
                info!("{path} - {}", res.status);
                res
            }
        })
    }
}

/// Turns a panicking handler into a 500 response.
pub struct RecoverMiddleware;

impl Middleware for RecoverMiddleware {
    fn wrap(&self, next: Handler) -> Handler {
        handler_fn(move |req: Request| {
            let next = Arc::clone(&next);
            async move {
                match AssertUnwindSafe(async move { next(req).await })
                    .catch_unwind()
                    .await
                {
                    Ok(res) => res,
                    Err(panic) => {
                        error!("Recovering from a panic, {}", panic_message(&*panic));
                        Response::internal_server_error()
                    }
                }
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
