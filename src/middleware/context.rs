//! Per-request state threaded through every interceptor phase.

use http::{Extensions, HeaderMap, Method};

/// What the interceptors see of one request.
///
/// Created by the router before the chain runs and dropped once the
/// completion phase has finished. Never shared between requests.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    handler: String,
    aborted: bool,
    extensions: Extensions,
}

impl RequestContext {
    /// `handler` is an opaque label for whatever will serve the request,
    /// e.g. the matched route pattern `/hello/{name}`.
    pub fn new(method: Method, path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            handler: handler.into(),
            aborted: false,
            extensions: Extensions::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn handler(&self) -> &str { &self.handler }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// True once the before phase ended early, either because a hook returned
    /// [`Decision::Stop`](super::Decision::Stop) or because one failed.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub(crate) fn abort(&mut self) {
        self.aborted = true;
    }

    /// Request attributes. Before hooks write, later hooks read.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
