use crate::error::{Error, Result};
use crate::params::Params;

use bytes::Bytes;
use reqwest::{
    Method, Url,
    blocking::{Client, RequestBuilder},
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::fmt::Write as _;

const HTTP_VERSION: &str = "HTTP/1.1";

pub(crate) fn header_pair(key: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let invalid = |reason: String| Error::Header {
        name: key.to_string(),
        reason,
    };
    let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    let value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok((name, value))
}

/// A fully assembled request, kept around after sending so scripts can inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpRequest {
    /// Joins `base_url` and `path`, appends the query mapping and applies headers.
    ///
    /// The two strings are concatenated as-is before parsing, so
    /// `"http://h/" + "/x"` keeps the double slash.
    /// A query string already in `path` is kept and the query params are
    /// appended after it.
    pub fn build(
        method: Method,
        base_url: &str,
        path: &str,
        body: impl Into<Bytes>,
        params: &Params,
    ) -> Result<Self> {
        let raw_url = format!("{base_url}{path}");
        let mut url = Url::parse(&raw_url).map_err(|source| Error::Url {
            url: raw_url.clone(),
            source,
        })?;

        if !params.query().is_empty() {
            url.query_pairs_mut().extend_pairs(params.query().iter());
        }

        let mut headers = HeaderMap::new();
        for (key, value) in params.headers() {
            let (name, value) = header_pair(key, value)?;
            tracing::trace!("header {name}: {value:?}");
            headers.insert(name, value);
        }

        tracing::debug!("built {method} {url}");

        Ok(HttpRequest {
            method,
            url,
            headers,
            body: body.into(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Lossy UTF-8 view of the body.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Wire-style header block: request line, `Host`, `Content-Length`,
    /// explicit headers, then a blank line.
    pub fn dump(&self) -> String {
        let mut target = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            target.push('?');
            target.push_str(query);
        }

        let mut out = String::new();
        let _ = write!(out, "{} {} {}\r\n", self.method, target, HTTP_VERSION);

        if let Some(host) = self.url.host_str() {
            match self.url.port() {
                Some(port) => {
                    let _ = write!(out, "Host: {host}:{port}\r\n");
                }
                None => {
                    let _ = write!(out, "Host: {host}\r\n");
                }
            }
        }
        if !self.body.is_empty() {
            let _ = write!(out, "Content-Length: {}\r\n", self.body.len());
        }
        for (name, value) in self.headers.iter() {
            let _ = write!(
                out,
                "{}: {}\r\n",
                name,
                String::from_utf8_lossy(value.as_bytes())
            );
        }
        out.push_str("\r\n");
        out
    }

    pub(crate) fn to_reqwest(&self, client: &Client) -> RequestBuilder {
        client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone())
            .body(self.body.to_vec())
    }
}
