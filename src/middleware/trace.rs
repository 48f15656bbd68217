//! Built-in request tracing interceptor.

use std::time::Instant;

use tracing::{error, info};

use super::interceptor::{Decision, Interceptor};

#[derive(Clone, Copy)]
struct Started(Instant);

/// One log line per request with method, path, handler, status and latency.
///
/// Register it with the lowest priority so its completion hook runs last and
/// the latency covers every other interceptor:
///
/// ```rust
/// use gatehouse::{Router, middleware};
///
/// let app = Router::new().intercept(middleware::trace().order(i32::MIN));
/// # let _ = app;
/// ```
pub fn trace() -> Interceptor {
    Interceptor::new("trace")
        .before(|ctx| {
            ctx.extensions_mut().insert(Started(Instant::now()));
            Ok(Decision::Continue)
        })
        .on_complete(|ctx, outcome| {
            let latency_us = ctx.extensions()
                .get::<Started>()
                .map(|s| s.0.elapsed().as_micros() as u64)
                .unwrap_or_default();
            match outcome {
                Ok(res) => info!(
                    method = %ctx.method(),
                    path = ctx.path(),
                    handler = ctx.handler(),
                    status = res.status_code(),
                    aborted = ctx.is_aborted(),
                    latency_us,
                    "request",
                ),
                Err(fault) => error!(
                    method = %ctx.method(),
                    path = ctx.path(),
                    handler = ctx.handler(),
                    phase = fault.phase(),
                    latency_us,
                    "request failed: {fault}",
                ),
            }
            Ok(())
        })
}
