//! Static resource mappings.
//!
//! Serves files under a URL prefix from a directory on disk, optionally with a
//! `Cache-Control: max-age` header and an in-memory content cache.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use gatehouse::{CacheControl, Resources, Router};
//!
//! let app = Router::new().resources(
//!     Resources::new("/mobile/**", "static/mobile")
//!         .cache_control(CacheControl::max_age(Duration::from_secs(600)))
//!         .resource_chain(true),
//! );
//! # let _ = app;
//! ```
//!
//! Resource mappings are consulted only when no route matched, so a route
//! always wins over a file with the same path.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::BoxError;
use crate::request::decode_segment;
use crate::response::Response;
use crate::Status;

/// The `Cache-Control` policy attached to served files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheControl {
    /// `max-age=<seconds>`
    MaxAge(Duration),
    /// `no-cache`
    NoCache,
    /// `no-store`
    NoStore,
}

impl CacheControl {
    pub fn max_age(age: Duration) -> Self {
        Self::MaxAge(age)
    }

    pub fn header_value(&self) -> String {
        match self {
            Self::MaxAge(age) => format!("max-age={}", age.as_secs()),
            Self::NoCache => "no-cache".to_owned(),
            Self::NoStore => "no-store".to_owned(),
        }
    }
}

/// One URL prefix mapped onto one directory.
#[derive(Debug)]
pub struct Resources {
    prefix: String,
    root: PathBuf,
    cache_control: Option<CacheControl>,
    cache: Option<RwLock<HashMap<PathBuf, Bytes>>>,
}

impl Resources {
    /// `prefix` may carry trailing `*`s (`/mobile/**`); they are ignored.
    pub fn new(prefix: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('*').to_owned(),
            root: root.into(),
            cache_control: None,
            cache: None,
        }
    }

    pub fn cache_control(mut self, policy: CacheControl) -> Self {
        self.cache_control = Some(policy);
        self
    }

    /// `true` keeps file contents in memory after the first read. Meant for
    /// production; leave it off in development so edits show up immediately.
    pub fn resource_chain(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(|| RwLock::new(HashMap::new()));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn handles(&self, path: &str) -> bool {
        path.starts_with(self.prefix.as_str())
    }

    /// Serves `path`. Missing files and rejected paths are a `404`, other I/O
    /// errors are faults.
    pub(crate) async fn serve(&self, path: &str) -> Result<Response, BoxError> {
        let Some(file) = path.strip_prefix(self.prefix.as_str()).and_then(|rel| self.locate(rel)) else {
            return Ok(Response::status(Status::NOT_FOUND));
        };

        let body = match self.read(&file).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::IsADirectory => {
                debug!(file = %file.display(), "resource not found");
                return Ok(Response::status(Status::NOT_FOUND));
            }
            Err(e) => return Err(e.into()),
        };

        let mime = mime_guess::from_path(&file).first_or_octet_stream();
        let mut builder = Response::builder();
        if let Some(policy) = &self.cache_control {
            builder = builder.header("cache-control", &policy.header_value());
        }
        Ok(builder.content(mime.as_ref(), body))
    }

    /// Maps the part of the URL after the prefix onto a file under `root`.
    /// `None` for anything that tries to climb out of it.
    fn locate(&self, rel: &str) -> Option<PathBuf> {
        let mut file = self.root.clone();
        for segment in rel.split('/').filter(|s| !s.is_empty()) {
            let segment = decode_segment(segment);
            if segment == "." || segment == ".." || segment.contains(['/', '\\']) {
                return None;
            }
            file.push(&*segment);
        }
        if rel.is_empty() || rel.ends_with('/') {
            file.push("index.html");
        }
        Some(file)
    }

    async fn read(&self, file: &Path) -> std::io::Result<Bytes> {
        let Some(cache) = &self.cache else {
            return tokio::fs::read(file).await.map(Bytes::from);
        };
        if let Some(hit) = cache.read().await.get(file) {
            return Ok(hit.clone());
        }
        let body = Bytes::from(tokio::fs::read(file).await?);
        cache.write().await.insert(file.to_owned(), body.clone());
        Ok(body)
    }
}
