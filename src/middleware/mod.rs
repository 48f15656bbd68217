//! Interceptor layer.
//!
//! Interceptors wrap route handlers and are the right place for cross-cutting
//! concerns: structured tracing, authentication-header inspection, request
//! attributes, response decoration.
//!
//! Each [`Interceptor`] has a priority and an optional path scope. For every
//! request the router asks the [`Registry`] for the interceptors in scope,
//! sorted by priority, and hands that [`Chain`] to an [`Executor`]:
//!
//! 1. before hooks, lowest priority first; any may [`Decision::Stop`]
//! 2. the handler
//! 3. after hooks, in reverse
//! 4. completion hooks, in reverse, for every interceptor whose before hook
//!    let the request through, whatever the outcome
//!
//! ```rust,no_run
//! use gatehouse::{Request, Response, Router, Server, Status};
//! use gatehouse::middleware::{Decision, Interceptor};
//!
//! # async fn run() -> Result<(), gatehouse::Error> {
//! let auth = Interceptor::new("auth")
//!     .path("/admin/**")
//!     .before(|ctx| match ctx.header("authorization") {
//!         Some(_) => Ok(Decision::Continue),
//!         None => Ok(Decision::Stop(Response::status(Status::UNAUTHORIZED))),
//!     });
//!
//! let app = Router::new()
//!     .intercept(auth)
//!     .get("/admin/stats", stats);
//!
//! Server::bind("0.0.0.0:3000")?.serve(app).await
//! # }
//! async fn stats(_req: Request) -> Response { Response::text("42") }
//! ```

mod context;
mod executor;
mod fault;
mod interceptor;
mod pattern;
mod registry;
mod trace;

pub use context::RequestContext;
pub use executor::Executor;
pub use fault::Fault;
pub use interceptor::{Decision, Interceptor, Outcome};
pub use pattern::PathPattern;
pub use registry::{Chain, Registry};
pub use trace::trace;
