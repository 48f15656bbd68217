//! The interceptor entry: a name, a priority, a path scope and up to three
//! optional hooks.
//!
//! Hooks are plain closures rather than trait methods, so an interceptor only
//! spells out the phases it cares about. A missing hook is a no-op.
//!
//! ```rust
//! use gatehouse::middleware::{Decision, Interceptor};
//!
//! let greeting = Interceptor::new("greeting")
//!     .order(1)
//!     .before(|_ctx| {
//!         tracing::info!("preHandle 1");
//!         Ok(Decision::Continue)
//!     })
//!     .after(|_ctx, _res| Ok(()))
//!     .on_complete(|_ctx, _outcome| Ok(()));
//!
//! let scoped = Interceptor::new("another").path("/hello*").order(0);
//! # let _ = (greeting, scoped);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::response::Response;

use super::context::RequestContext;
use super::fault::Fault;
use super::pattern::PathPattern;

/// What a before hook wants the chain to do next.
pub enum Decision {
    /// Hand the request to the next interceptor, or to the handler.
    Continue,
    /// Answer with this response. The handler and every after hook are
    /// skipped; completion still runs for the interceptors that continued.
    Stop(Response),
}

/// The terminal outcome handed to completion hooks.
pub type Outcome<'a> = Result<&'a Response, &'a Fault>;

type BeforeHook = dyn Fn(&mut RequestContext) -> Result<Decision, BoxError> + Send + Sync;
type AfterHook = dyn Fn(&RequestContext, &mut Response) -> Result<(), BoxError> + Send + Sync;
type CompleteHook = dyn Fn(&RequestContext, Outcome<'_>) -> Result<(), BoxError> + Send + Sync;

/// One registered interceptor.
///
/// Cheap to clone: hooks live behind `Arc`s, so registering the same
/// interceptor twice shares the closures.
#[derive(Clone)]
pub struct Interceptor {
    name: Arc<str>,
    priority: i32,
    patterns: Vec<PathPattern>,
    excludes: Vec<PathPattern>,
    before: Option<Arc<BeforeHook>>,
    after: Option<Arc<AfterHook>>,
    complete: Option<Arc<CompleteHook>>,
}

impl Interceptor {
    /// An interceptor with priority `0`, no path scope and no hooks.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            patterns: Vec::new(),
            excludes: Vec::new(),
            before: None,
            after: None,
            complete: None,
        }
    }

    /// Lower runs earlier before the handler and later after it.
    pub fn order(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the interceptor to paths matching `pattern`. May be called
    /// more than once; any one match is enough. Without any call the
    /// interceptor applies to every path.
    pub fn path(mut self, pattern: &str) -> Self {
        self.patterns.push(PathPattern::new(pattern));
        self
    }

    /// Keep the interceptor away from paths matching `pattern`, even when a
    /// [`path`](Interceptor::path) pattern matched.
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.excludes.push(PathPattern::new(pattern));
        self
    }

    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RequestContext) -> Result<Decision, BoxError> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext, &mut Response) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext, Outcome<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.complete = Some(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn priority(&self) -> i32 { self.priority }
    pub fn patterns(&self) -> &[PathPattern] { &self.patterns }

    /// Whether this interceptor is in scope for `path`.
    pub fn applies_to(&self, path: &str) -> bool {
        let included = self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(path));
        included && !self.excludes.iter().any(|p| p.matches(path))
    }

    pub(crate) fn run_before(&self, ctx: &mut RequestContext) -> Result<Decision, BoxError> {
        match &self.before {
            Some(hook) => hook(ctx),
            None => Ok(Decision::Continue),
        }
    }

    pub(crate) fn run_after(&self, ctx: &RequestContext, res: &mut Response) -> Result<(), BoxError> {
        match &self.after {
            Some(hook) => hook(ctx, res),
            None => Ok(()),
        }
    }

    pub(crate) fn run_complete(&self, ctx: &RequestContext, outcome: Outcome<'_>) -> Result<(), BoxError> {
        match &self.complete {
            Some(hook) => hook(ctx, outcome),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("patterns", &self.patterns)
            .field("excludes", &self.excludes)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}
