//! Route table, dispatch and reverse routing.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ReverseError};
use crate::middleware::BoxFuture;
use crate::pattern::Pattern;
use crate::request::{Method, PathParams, Request, RequestContext};
use crate::response::Response;

/// A boxed async handler function.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Boxes an async function into a [`Handler`].
pub fn handler_fn<F, Fut>(handler: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req| Box::pin(handler(req)))
}

/// A registered route.
#[derive(Clone)]
pub struct Route {
    name: Option<String>,
    pattern: Pattern,
    methods: Vec<Method>,
    values: Vec<(String, Value)>,
    handler: Handler,
}

impl Route {
    /// Returns the route name used for reverse lookup.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the route pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the allowed methods. Empty means any method.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns the values seeded into the context of every request routed
    /// here.
    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Returns whether the route accepts `method`.
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    /// Returns the request handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Configures a route right after registration.
///
/// Every setter replaces what an earlier call to the same setter stored.
pub struct RouteBuilder<'a> {
    routes: &'a mut Vec<Route>,
    index: usize,
}

impl RouteBuilder<'_> {
    /// Names the route for [`Router::reverse`].
    ///
    /// Names are not required to be unique; reverse lookups resolve to the
    /// first registered route carrying the name.
    pub fn name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let (earlier, rest) = self.routes.split_at_mut(self.index);
        let route = &mut rest[0];
        if earlier.iter().any(|r| r.name() == Some(name.as_str())) {
            warn!(
                name = %name,
                pattern = %route.pattern,
                "route name already registered, reverse lookups keep the first route"
            );
        }
        route.name = Some(name);
        self
    }

    /// Restricts the route to the given methods.
    pub fn methods(self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.routes[self.index].methods = methods.into_iter().collect();
        self
    }

    /// Sets the values seeded into the context of matched requests.
    pub fn values<K, V>(self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.routes[self.index].values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }
}

/// Outcome of matching a request against the route table.
#[derive(Debug)]
pub enum Dispatch<'a> {
    /// A route matched the path and accepts the method.
    Matched {
        /// The matched route.
        route: &'a Route,
        /// Parameters extracted from the path.
        params: PathParams,
    },
    /// At least one route matched the path, none accepts the method.
    MethodNotAllowed,
    /// No route matched the path.
    NotFound,
}

/// The route table.
///
/// Routes are registered up front and the router is then shared read-only,
/// usually behind an [`Arc`]. Routes are tried in registration order and the
/// first one matching both path and method wins.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async function for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`](crate::PatternError) when the pattern is
    /// invalid; the route is not added.
    pub fn route<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<RouteBuilder<'_>>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route_handler(pattern, handler_fn(handler))
    }

    /// Registers a boxed handler for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`](crate::PatternError) when the pattern is
    /// invalid; the route is not added.
    pub fn route_handler(&mut self, pattern: &str, handler: Handler) -> Result<RouteBuilder<'_>> {
        let pattern = Pattern::parse(pattern)?;
        debug!(pattern = %pattern, "registered route");

        self.routes.push(Route {
            name: None,
            pattern,
            methods: Vec::new(),
            values: Vec::new(),
            handler,
        });

        Ok(RouteBuilder {
            index: self.routes.len() - 1,
            routes: &mut self.routes,
        })
    }

    /// Returns the routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the first route registered under `name`.
    pub fn named(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name() == Some(name))
    }

    /// Finds the route for a request.
    ///
    /// A route whose pattern matches but whose method list excludes `method`
    /// does not stop the scan: a later route may match the same path and
    /// accept the method.
    pub fn dispatch(&self, method: &Method, path: &str) -> Dispatch<'_> {
        let mut path_matched = false;

        for route in &self.routes {
            let Some(params) = route.pattern.match_path(path) else {
                continue;
            };
            path_matched = true;
            if route.allows(method) {
                return Dispatch::Matched { route, params };
            }
        }

        if path_matched {
            debug!(method = %method, path, "no route accepts method");
            Dispatch::MethodNotAllowed
        } else {
            debug!(method = %method, path, "no route matched");
            Dispatch::NotFound
        }
    }

    /// Routes a request to its handler.
    ///
    /// The matched handler receives the request with its context set: the
    /// extracted parameters and the route's seeded values. Unmatched requests
    /// get a 404, method mismatches a 405.
    pub fn handle(&self, request: Request) -> BoxFuture<'static, Response> {
        match self.dispatch(&request.method, &request.path) {
            Dispatch::Matched { route, params } => {
                let context = RequestContext::new(params, route.values.clone());
                (route.handler)(request.with_context(context))
            }
            Dispatch::MethodNotAllowed => Box::pin(async { Response::method_not_allowed() }),
            Dispatch::NotFound => Box::pin(async { Response::not_found() }),
        }
    }

    /// Turns the router into a handler, so it can be wrapped with
    /// [`chain`](crate::chain).
    pub fn into_handler(self: Arc<Self>) -> Handler {
        Arc::new(move |req| self.handle(req))
    }

    /// Generates a path for a named route.
    ///
    /// # Errors
    ///
    /// Returns [`ReverseError::RouteNotFound`] when no route has the name and
    /// [`ReverseError::MissingParameter`] when a named group has no value.
    pub fn reverse(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> std::result::Result<String, ReverseError> {
        let route = self
            .named(name)
            .ok_or_else(|| ReverseError::RouteNotFound(name.to_string()))?;
        route.pattern.expand(params)
    }
}
