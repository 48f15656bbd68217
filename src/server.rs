//! HTTP server and graceful shutdown.
//!
//! The server owns nothing but the socket. Each request body is buffered, up
//! to [`Server::max_body_size`] bytes, and handed to [`Router::call`], which resolves the handler and the interceptor
//! chain; the server only turns the result back into a hyper response.
//!
//! On SIGTERM or Ctrl-C the accept loop stops, in-flight connections run to
//! completion (including their interceptor completion hooks), and
//! [`Server::serve`] returns.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::{BoxError, Error};
use crate::response::Response;
use crate::router::Router;
use crate::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    max_body: usize,
}

const DEFAULT_MAX_BODY: usize = 2 * 1024 * 1024;

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust
    /// use gatehouse::Server;
    /// let server = Server::bind("0.0.0.0:3000").unwrap();
    /// assert!(Server::bind("not an address").is_err());
    /// # let _ = server;
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let addr = addr.parse::<SocketAddr>().map_err(|source| Error::Addr { addr: addr.to_owned(), source })?;
        Ok(Self { addr, max_body: DEFAULT_MAX_BODY })
    }

    /// Largest request body the server buffers, 2 MiB by default. Anything
    /// bigger is answered `413 Payload Too Large` before the router sees it.
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body = bytes;
        self
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // From here on the router, and the interceptor registry inside it,
        // is shared read-only by every connection task.
        let router = Arc::new(router);

        info!(
            addr = %self.addr,
            interceptors = router.interceptors().len(),
            "gatehouse listening",
        );

        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so a SIGTERM immediately stops
                // accepting new connections, even if more are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let max_body = self.max_body;
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not
                        // once per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(&router, req, max_body).await }
                        });

                        // HTTP/1.1 or HTTP/2, whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("gatehouse stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Buffers at most `limit` body bytes and hands the request to the router.
///
/// Infallible: every failure becomes a status code, so hyper never sees an
/// error.
async fn dispatch<B>(
    router: &Router,
    req: http::Request<B>,
    limit: usize,
) -> Result<http::Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            debug!(path = parts.uri.path(), limit, "request body too large");
            return Ok(Response::status(Status::PAYLOAD_TOO_LARGE).into_inner());
        }
        Err(e) => {
            debug!(path = parts.uri.path(), "failed to read request body: {e}");
            return Ok(Response::status(Status::BAD_REQUEST).into_inner());
        }
    };

    let response = router.call(http::Request::from_parts(parts, body)).await;
    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM or Ctrl-C, whichever comes first.
///
/// A signal handler that cannot be installed is logged and that arm never
/// fires; the server keeps running rather than refusing to start.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
