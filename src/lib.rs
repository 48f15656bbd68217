//! # gatehouse
//!
//! A small async HTTP framework built around one idea: every request passes
//! through an ordered chain of [interceptors](middleware) before and after
//! its handler runs.
//!
//! - Radix-tree routing via [`matchit`], one tree per method
//! - Interceptors with priorities, path scopes, short-circuiting before
//!   hooks, reverse-order after and completion hooks
//! - Static resource mappings with `Cache-Control`
//! - hyper for HTTP/1.1 and HTTP/2, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gatehouse::{Request, Router, Server, middleware};
//! use gatehouse::middleware::{Decision, Interceptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gatehouse::Error> {
//!     let greeting = Interceptor::new("greeting")
//!         .order(1)
//!         .before(|_ctx| Ok(Decision::Continue));
//!
//!     let app = Router::new()
//!         .intercept(middleware::trace().order(i32::MIN))
//!         .intercept(greeting)
//!         .get("/hello/{name}", hello);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! async fn hello(req: Request) -> String {
//!     format!("hello {}", req.param("name").unwrap_or("stranger"))
//! }
//! ```

mod error;
mod handler;
mod request;
mod resources;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::{BoxError, Error};
pub use handler::{Handler, HandlerOutput};
pub use http::Method;
pub use http::StatusCode as Status;
pub use request::Request;
pub use resources::{CacheControl, Resources};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
