//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* types in one radix tree per
//! method, so each is hidden behind a trait object (`dyn ErasedHandler`):
//!
//! ```text
//! async fn hello(req: Request) -> String { … }     ← user writes this
//!        ↓ router.get("/hello/{name}", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← stored as BoxedHandler
//!        ↓
//! handler.call(req)  inside the executor's HANDLE phase
//!        ↓
//! Box::pin(async { hello(req).await.into_result() })
//! ```
//!
//! A handler may fail: returning `Err(e)` from a `Result<_, E>` handler is a
//! handler fault, which skips the after hooks and becomes a `500`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::BoxError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::Status;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased handler future.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── HandlerOutput ─────────────────────────────────────────────────────────────

/// Anything a handler may return.
///
/// Responses, strings and statuses always succeed. `Result<R, E>` succeeds
/// with `R` or faults with `E`.
pub trait HandlerOutput {
    fn into_result(self) -> Result<Response, BoxError>;
}

impl HandlerOutput for Response {
    fn into_result(self) -> Result<Response, BoxError> { Ok(self) }
}

impl HandlerOutput for &'static str {
    fn into_result(self) -> Result<Response, BoxError> { Ok(self.into_response()) }
}

impl HandlerOutput for String {
    fn into_result(self) -> Result<Response, BoxError> { Ok(self.into_response()) }
}

impl HandlerOutput for Status {
    fn into_result(self) -> Result<Response, BoxError> { Ok(self.into_response()) }
}

impl<R, E> HandlerOutput for Result<R, E>
where
    R: IntoResponse,
    E: Into<BoxError>,
{
    fn into_result(self) -> Result<Response, BoxError> {
        self.map(IntoResponse::into_response).map_err(Into::into)
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is satisfied for any `async fn` with
/// the signature:
///
/// ```text
/// async fn name(req: Request) -> impl HandlerOutput
/// ```
///
/// The trait is sealed so only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: HandlerOutput + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_result() })
    }
}
