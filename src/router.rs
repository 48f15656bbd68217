//! Radix-tree request router and interceptor entry point.
//!
//! One tree per HTTP method. O(path-length) lookup. Every matched request,
//! whether it lands on a route or a resource mapping, runs through the
//! interceptor chain resolved for its path.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use matchit::Router as MatchitRouter;
use tracing::{debug, error};

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::{Executor, Interceptor, Registry, RequestContext};
use crate::request::{decode_segment, normalize_path, Request};
use crate::resources::Resources;
use crate::response::Response;
use crate::Status;

struct Route {
    pattern: Arc<str>,
    handler: BoxedHandler,
}

enum Target<'r> {
    Route(&'r Route),
    View(&'r str, &'r Resources),
    Resources(&'r Resources),
}

impl Target<'_> {
    /// What interceptors see as [`RequestContext::handler`].
    fn label(&self) -> String {
        match self {
            Self::Route(route) => route.pattern.to_string(),
            Self::View(view, _) => format!("view:{view}"),
            Self::Resources(res) => format!("resources:{}", res.prefix()),
        }
    }
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
/// Once the server owns the router it is never mutated again, which is what
/// lets every connection task read the interceptor registry without locks.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
    interceptors: Registry,
    views: HashMap<String, String>,
    resources: Vec<Resources>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            interceptors: Registry::new(),
            views: HashMap::new(),
            resources: Vec::new(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use gatehouse::{Request, Router};
    /// # use http::Method;
    /// # async fn hello(_: Request) -> String { String::new() }
    /// Router::new().on(Method::GET, "/hello/{name}", hello);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let route = Route { pattern: Arc::from(path), handler: handler.into_boxed_handler() };
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Register an interceptor. Order of calls only matters between
    /// interceptors of equal priority.
    pub fn intercept(mut self, interceptor: Interceptor) -> Self {
        self.interceptors.register(interceptor);
        self
    }

    /// Answer `GET /hi` with the file a resource mapping serves for `/hi.html`,
    /// with no handler in between:
    ///
    /// ```rust,no_run
    /// # use gatehouse::{Resources, Router};
    /// Router::new()
    ///     .view("/hi", "hi.html")
    ///     .resources(Resources::new("/", "static"));
    /// ```
    ///
    /// Routes take precedence over views, views over plain resources.
    ///
    /// # Panics
    ///
    /// Panics if `path` or `view` contains a `.` or `..` segment.
    pub fn view(mut self, path: &str, view: &str) -> Self {
        let path = normalize_path(path).unwrap_or_else(|| panic!("invalid view path `{path}`"));
        let file = format!("/{}", view.trim_start_matches('/'));
        let file = normalize_path(&file).unwrap_or_else(|| panic!("invalid view `{view}`"));
        self.views.insert(path, file);
        self
    }

    /// Mount a static resource mapping. Consulted for `GET`/`HEAD` requests
    /// that no route matched, in registration order.
    pub fn resources(mut self, resources: Resources) -> Self {
        self.resources.push(resources);
        self
    }

    pub fn interceptors(&self) -> &Registry {
        &self.interceptors
    }

    /// Handles one request end to end, without a socket.
    ///
    /// The server calls this for every request; tests can too. The path is
    /// normalized once up front and that one value is what routes, views,
    /// resources and interceptor patterns all match against. A path with a
    /// `.` or `..` segment is answered `400` without entering the chain.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let Some(path) = normalize_path(parts.uri.path()) else {
            debug!(path = parts.uri.path(), "rejected request path");
            return Response::status(Status::BAD_REQUEST);
        };
        let req = Request::new(
            parts.method,
            path,
            parts.uri.query().map(str::to_owned),
            parts.headers,
            body,
        );
        self.dispatch(req).await
    }

    async fn dispatch(&self, mut req: Request) -> Response {
        let Some(target) = self.target(&mut req) else {
            return self.unmatched(&req);
        };

        let mut ctx = RequestContext::new(req.method.clone(), req.path.clone(), target.label())
            .with_headers(req.headers.clone());
        let executor = Executor::new(self.interceptors.resolve(ctx.path()));

        let outcome = match target {
            Target::Route(route) => executor.run(&mut ctx, || route.handler.call(req)).await,
            Target::View(view, res) => executor.run(&mut ctx, || res.serve(view)).await,
            Target::Resources(res) => executor.run(&mut ctx, || res.serve(&req.path)).await,
        };

        outcome.unwrap_or_else(|fault| {
            error!(
                method = %ctx.method(),
                path = ctx.path(),
                phase = fault.phase(),
                interceptor = fault.interceptor(),
                "request failed: {fault}",
            );
            Response::status(Status::INTERNAL_SERVER_ERROR)
        })
    }

    /// Route, then view, then resource mapping. Views and resources only
    /// answer `GET` and `HEAD`.
    fn target(&self, req: &mut Request) -> Option<Target<'_>> {
        if let Some((route, params)) = self.lookup(&req.method, &req.path) {
            req.set_params(params);
            return Some(Target::Route(route));
        }
        if req.method != Method::GET && req.method != Method::HEAD {
            return None;
        }
        if let Some(view) = self.views.get(&req.path) {
            if let Some(res) = self.resource_for(view) {
                return Some(Target::View(view, res));
            }
        }
        self.resource_for(&req.path).map(Target::Resources)
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), decode_segment(v).into_owned()))
            .collect();
        Some((matched.value, params))
    }

    fn resource_for(&self, path: &str) -> Option<&Resources> {
        self.resources.iter().find(|res| res.handles(path))
    }

    /// `405` when the path exists under another method, `404` otherwise.
    fn unmatched(&self, req: &Request) -> Response {
        let elsewhere = self.routes.iter()
            .any(|(method, tree)| *method != req.method && tree.at(&req.path).is_ok());
        if elsewhere {
            Response::status(Status::METHOD_NOT_ALLOWED)
        } else {
            Response::status(Status::NOT_FOUND)
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;

    use super::Router;
    use crate::Request;

    fn get(uri: &str) -> http::Request<Bytes> {
        http::Request::builder().uri(uri).body(Bytes::new()).unwrap()
    }

    async fn hello(req: Request) -> String {
        format!("hello {}", req.param("name").unwrap_or_default())
    }

    #[tokio::test]
    async fn path_params_are_decoded() {
        let app = Router::new().get("/hello/{name}", hello);
        let res = app.call(get("/hello/jong%20hak")).await;
        assert_eq!(res.body(), b"hello jong hak");
    }

    #[tokio::test]
    async fn plus_in_a_path_param_is_kept() {
        let app = Router::new().get("/hello/{name}", hello);
        let res = app.call(get("/hello/c++")).await;
        assert_eq!(res.body(), b"hello c++");
    }

    #[tokio::test]
    async fn equivalent_paths_reach_the_same_route() {
        let app = Router::new().get("/hello/{name}", hello);
        for uri in ["//hello/x", "/hell%6F/x", "/hello//x"] {
            assert_eq!(app.call(get(uri)).await.body(), b"hello x", "{uri}");
        }
    }

    #[tokio::test]
    async fn dot_segments_are_bad_requests() {
        let app = Router::new().get("/hello/{name}", hello);
        assert_eq!(app.call(get("/hello/../hello/x")).await.status_code(), 400);
        assert_eq!(app.call(get("/hello/%2e%2e/x")).await.status_code(), 400);
    }

    #[tokio::test]
    async fn wrong_method_is_405_and_unknown_path_is_404() {
        let app = Router::new().get("/hello/{name}", hello);
        let post = http::Request::builder()
            .method(Method::POST)
            .uri("/hello/x")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(app.call(post).await.status_code(), 405);
        assert_eq!(app.call(get("/nowhere")).await.status_code(), 404);
    }

    #[tokio::test]
    async fn handler_error_becomes_500() {
        async fn broken(_req: Request) -> Result<String, std::io::Error> {
            Err(std::io::Error::other("disk on fire"))
        }
        let app = Router::new().get("/broken", broken);
        assert_eq!(app.call(get("/broken")).await.status_code(), 500);
    }

    #[test]
    #[should_panic(expected = "invalid view")]
    fn view_with_dot_segments_panics_at_startup() {
        let _ = Router::new().view("/hi", "../hi.html");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic_at_startup() {
        async fn other(_req: Request) -> &'static str { "x" }
        let _ = Router::new().get("/a/{x}", other).get("/a/{y}", other);
    }
}
