//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that exists
//! under some other method answers `405 Method Not Allowed` with an `Allow`
//! header; a path that exists nowhere answers `404 Not Found`.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Outcome of matching a method + path pair against the routing table.
pub(crate) enum Route<S> {
    Matched(BoxedHandler<S>, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// The application router.
///
/// Owns the shared state `S` handed to every handler. Build it once at
/// startup and pass it to [`Server::serve`](crate::Server::serve); each
/// [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the same method + path is registered twice or the path
    /// conflicts with an existing route. Routes are fixed at startup, so this
    /// is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_insert_with(MatchitRouter::new)
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, method: Option<Method>, path: &str) -> Route<S> {
        if let Some(tree) = method.and_then(|m| self.routes.get(&m)) {
            if let Ok(matched) = tree.at(path) {
                let handler = Arc::clone(matched.value);
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Route::Matched(handler, params);
            }
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            Route::NotFound
        } else {
            allowed.sort();
            Route::MethodNotAllowed(allowed)
        }
    }

    /// Routes one fully-buffered request and produces its response.
    ///
    /// This is the whole request path minus the socket: the server calls it
    /// for every request, and tests call it directly.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let span_method = parts.method.clone();
        let span_path = parts.uri.path().to_owned();

        middleware::trace(&span_method, &span_path, async move {
            let method = Method::try_from(&parts.method).ok();
            match self.lookup(method, parts.uri.path()) {
                Route::Matched(handler, params) => {
                    let req = Request::new(parts, body, params);
                    handler.call(req, self.state.clone()).await
                }
                Route::MethodNotAllowed(allowed) => method_not_allowed(&allowed),
                Route::NotFound => Response::error(
                    Status::NotFound,
                    format!("The requested URL {} was not found on the server.", parts.uri.path()),
                ),
            }
        })
        .await
    }
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
    let message = format!("The method is not allowed for the requested URL. Allowed: {allow}");
    let mut res = Response::error(Status::MethodNotAllowed, message);
    res.headers.push(("allow".to_owned(), allow));
    res
}
