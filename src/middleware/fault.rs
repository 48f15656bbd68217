//! Faults raised while a request travels through the chain.

use thiserror::Error;

use crate::error::BoxError;

/// A phase-terminating failure.
///
/// Stopping the chain on purpose is not a fault; that is
/// [`Decision::Stop`](super::Decision::Stop). Completion hook errors are never
/// turned into a `Fault` either: they are logged and swallowed.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("interceptor `{interceptor}` failed before the handler: {source}")]
    Before {
        interceptor: String,
        #[source]
        source: BoxError,
    },

    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),

    #[error("interceptor `{interceptor}` failed after the handler: {source}")]
    After {
        interceptor: String,
        #[source]
        source: BoxError,
    },
}

impl Fault {
    /// Name of the interceptor that raised the fault, if any.
    pub fn interceptor(&self) -> Option<&str> {
        match self {
            Self::Before { interceptor, .. } | Self::After { interceptor, .. } => {
                Some(interceptor)
            }
            Self::Handler(_) => None,
        }
    }

    /// Short label for the phase, used as a structured log field.
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Before { .. } => "before",
            Self::Handler(_) => "handle",
            Self::After { .. } => "after",
        }
    }
}
