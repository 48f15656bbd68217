//! Drives one request through a resolved chain.
//!
//! ```text
//! BEFORE      chain[0] → chain[1] → … → chain[n-1]     Stop / fault ─┐
//!    ↓                                                               │
//! HANDLE      handler, exactly once                    fault ───────┤
//!    ↓                                                               │
//! AFTER       chain[n-1] → … → chain[0]                fault ───────┤
//!    ↓                                                               ↓
//! COMPLETION  reverse order, only for interceptors whose before hook
//!             returned Continue; errors and panics are logged, never
//!             propagated
//! ```

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::BoxError;
use crate::response::Response;

use super::context::RequestContext;
use super::fault::Fault;
use super::interceptor::Decision;
use super::registry::Chain;

/// Runs the before/handle/after/completion lifecycle for one request.
pub struct Executor<'r> {
    chain: Chain<'r>,
}

impl<'r> Executor<'r> {
    pub fn new(chain: Chain<'r>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &Chain<'r> {
        &self.chain
    }

    /// Runs the full lifecycle and returns the terminal outcome.
    ///
    /// `handler` is invoked at most once, and only when every before hook
    /// returned [`Decision::Continue`].
    pub async fn run<F, Fut>(&self, ctx: &mut RequestContext, handler: F) -> Result<Response, Fault>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Response, BoxError>>,
    {
        let (passed, early) = self.before(ctx);
        let outcome = match early {
            Some(outcome) => outcome,
            None => self.handle(ctx, handler).await,
        };
        self.complete(ctx, passed, &outcome);
        outcome
    }

    /// Returns how many interceptors passed, plus the terminal outcome when
    /// the chain ended early.
    fn before(&self, ctx: &mut RequestContext) -> (usize, Option<Result<Response, Fault>>) {
        for (index, interceptor) in self.chain.iter().enumerate() {
            match interceptor.run_before(ctx) {
                Ok(Decision::Continue) => {}
                Ok(Decision::Stop(response)) => {
                    debug!(interceptor = interceptor.name(), path = ctx.path(), "chain stopped");
                    ctx.abort();
                    return (index, Some(Ok(response)));
                }
                Err(source) => {
                    ctx.abort();
                    let fault = Fault::Before { interceptor: interceptor.name().to_owned(), source };
                    return (index, Some(Err(fault)));
                }
            }
        }
        (self.chain.len(), None)
    }

    async fn handle<F, Fut>(&self, ctx: &RequestContext, handler: F) -> Result<Response, Fault>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Response, BoxError>>,
    {
        let mut response = handler().await.map_err(Fault::Handler)?;
        for interceptor in self.chain.iter().rev() {
            interceptor.run_after(ctx, &mut response).map_err(|source| Fault::After {
                interceptor: interceptor.name().to_owned(),
                source,
            })?;
        }
        Ok(response)
    }

    fn complete(&self, ctx: &RequestContext, passed: usize, outcome: &Result<Response, Fault>) {
        let outcome = outcome.as_ref();
        for interceptor in self.chain.iter().take(passed).rev() {
            match panic::catch_unwind(AssertUnwindSafe(|| interceptor.run_complete(ctx, outcome))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(interceptor = interceptor.name(), path = ctx.path(), "completion hook failed: {e}");
                }
                Err(_) => {
                    warn!(interceptor = interceptor.name(), path = ctx.path(), "completion hook panicked");
                }
            }
        }
    }
}
