//! Unified error type.

use thiserror::Error;

/// Error currency for hooks and handlers.
///
/// Anything implementing `std::error::Error + Send + Sync` converts into it
/// with `?` or `.into()`, and so do `String` and `&str`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by gatehouse's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, and pipeline failures as
/// [`Fault`](crate::middleware::Fault). This type surfaces infrastructure
/// failures: parsing the bind address, binding to a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
