//! # remux-router
//!
//! Request routing on restricted regular expressions.
//!
//! This crate provides:
//! - Path patterns made of literals and named capturing groups
//! - Method allow-lists, with 404 / 405 outcomes
//! - Named routes for reverse path generation
//! - Values seeded into the context of every request a route handles
//! - Handler composition with middleware
//!
//! ## Quick Start
//!
//! ```ignore
//! use remux_router::{Method, Request, Response, Router};
//!
//! async fn hello_handler(_req: Request) -> Response {
//!     Response::text("Hello, World!")
//! }
//!
//! async fn user_handler(req: Request) -> Response {
//!     let id = req.params().get("id").unwrap_or("unknown");
//!     Response::json(&serde_json::json!({"id": id}))
//! }
//!
//! let mut router = Router::new();
//! router.route("/", hello_handler)?;
//! router
//!     .route("/users/(?P<id>[0-9]+)", user_handler)?
//!     .name("user-detail")
//!     .methods([Method::Get]);
//!
//! let response = router.handle(Request::get("/users/123")).await;
//! ```
//!
//! ## Patterns
//!
//! A pattern is a regular expression restricted to literals and named groups
//! of the form `(?P<name>...)`. The body of a named group may be any regular
//! expression; it constrains the value of that parameter. Anything else at
//! the top level (alternation, repetition, classes, anchors, unnamed groups)
//! is rejected when the route is registered. Patterns always match the whole
//! path.
//!
//! ```ignore
//! router.route("/posts/(?P<post_id>[0-9]+)/comments/(?P<comment_id>[0-9]+)", handler)?;
//! ```
//!
//! Routes are tried in registration order. A route whose pattern matches but
//! whose method list excludes the request method is skipped; if no route
//! accepts the method the response is `405 Unsupported method`, and if no
//! pattern matched at all it is `404`.
//!
//! ## Request Context
//!
//! The handler receives its parameters and the route's seeded values on the
//! request:
//!
//! ```ignore
//! router
//!     .route("/admin/(?P<page>[a-z]+)", admin_handler)?
//!     .values([("section", "admin")]);
//!
//! async fn admin_handler(req: Request) -> Response {
//!     let page = req.params().get("page");
//!     let section = req.value("section");
//!     // ...
//! }
//! ```
//!
//! ## Named Routes
//!
//! ```ignore
//! let params = [("id".to_string(), "42".to_string())].into();
//! assert_eq!(router.reverse("user-detail", &params)?, "/users/42");
//! ```
//!
//! Values are substituted verbatim and are not checked against the group's
//! constraint.
//!
//! ## Middleware
//!
//! ```ignore
//! use std::sync::Arc;
//! use remux_router::{chain, LoggingMiddleware, RecoverMiddleware};
//!
//! let handler = chain(
//!     Arc::new(router).into_handler(),
//!     &[&LoggingMiddleware, &RecoverMiddleware],
//! );
//! ```

mod error;
mod middleware;
mod pattern;
mod request;
mod response;
mod router;

pub use error::{PatternError, Result, ReverseError};
pub use middleware::{chain, BoxFuture, LoggingMiddleware, Middleware, RecoverMiddleware};
pub use pattern::{validate, Pattern, PatternNode};
pub use request::{Method, PathParams, Request, RequestContext};
pub use response::Response;
pub use router::{handler_fn, Dispatch, Handler, Route, RouteBuilder, Router};
