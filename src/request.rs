//! Incoming HTTP request type.

use std::borrow::Cow;
use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};
use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped when a path segment is re-encoded: everything except
/// unreserved characters, sub-delimiters, `:` and `@` (RFC 3986 section 3.3).
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// An incoming HTTP request, with its body fully buffered.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: Option<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self { method, path, query, headers, body, params: HashMap::new() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/hello/{name}`, `req.param("name")` on `/hello/jonghak`
    /// returns `Some("jonghak")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first query-string value for `key`, decoded the way
    /// browsers encode forms (`+` is a space, `%XX` escapes).
    ///
    /// `/hello?name=jong+hak` → `req.query("name") == Some("jong hak")`.
    pub fn query(&self, key: &str) -> Option<Cow<'_, str>> {
        form_urlencoded::parse(self.query.as_deref()?.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

/// Percent-decodes one path segment. `+` is a literal plus here, unlike in
/// query strings.
pub(crate) fn decode_segment(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}

/// Canonical form of a request path, or `None` when it contains a `.` or `..`
/// segment (escaped or not).
///
/// Empty segments are dropped and every segment is re-encoded from its
/// decoded bytes, so `//a/%62` and `/a/b` both become `/a/b`. Two paths that
/// name the same file always normalize to the same string. A trailing slash
/// is kept.
pub(crate) fn normalize_path(raw: &str) -> Option<String> {
    let rest = raw.strip_prefix('/')?;
    let mut path = String::with_capacity(raw.len());
    for segment in rest.split('/').filter(|s| !s.is_empty()) {
        let decoded: Cow<'_, [u8]> = percent_decode_str(segment).into();
        if matches!(&*decoded, b"." | b"..") {
            return None;
        }
        path.push('/');
        path.extend(percent_encode(&decoded, PATH_SEGMENT_SET));
    }
    if path.is_empty() || rest.ends_with('/') {
        path.push('/');
    }
    Some(path)
}
