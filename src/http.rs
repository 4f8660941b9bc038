use crate::decoder::decode_body;
use crate::error::{Error, Result};
use crate::request::HttpRequest;

use reqwest::{
    Certificate, StatusCode, Version,
    blocking::Client,
    header::{CONTENT_ENCODING, HeaderMap},
};
use std::fmt::{Debug, Write as _};
use std::time::Duration;

/// Transport-level settings shared by every request of a session.
pub trait HttpConnectionProfile {
    fn timeout(&self) -> Option<Duration>;
    fn insecure(&self) -> bool;
    fn ca_cert(&self) -> Option<&String>;
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            version: Version::HTTP_11,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Status line and headers in wire format, terminated by a blank line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "{:?} {} {}\r\n",
            self.version,
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        );
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
}

pub struct HttpClient {
    client: Client,
}

impl Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("client", &"Client")
            .finish()
    }
}

impl HttpClient {
    pub fn new(profile: &impl HttpConnectionProfile) -> Result<Self> {
        let client = Self::build_client(profile)?;
        Ok(HttpClient { client })
    }

    /// Sends the request and reads the whole body before returning.
    ///
    /// The underlying response is consumed by the body read, so the
    /// connection is released whether or not the read succeeds.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let res = request
            .to_reqwest(&self.client)
            .send()
            .map_err(Error::Transport)?;

        let status = res.status();
        let version = res.version();
        let headers = res.headers().clone();
        let body_bytes = res.bytes().map_err(Error::BodyRead)?;

        let content_encoding = headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());
        let body = decode_body(&body_bytes, content_encoding)?;

        tracing::debug!(
            "{} {} -> {} ({} bytes)",
            request.method(),
            request.url(),
            status,
            body.len()
        );

        Ok(HttpResponse {
            status,
            version,
            headers,
            body,
        })
    }

    fn build_client(profile: &impl HttpConnectionProfile) -> Result<Client> {
        let insecure_access = profile.insecure();
        let mut cli_builder = Client::builder()
            .timeout(profile.timeout())
            .danger_accept_invalid_certs(insecure_access);

        if let Some(ca_cert) = profile.ca_cert() {
            let ca_cert = shellexpand::tilde(ca_cert).to_string();
            let pem = std::fs::read(&ca_cert)?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| Error::Config(format!("invalid CA certificate {ca_cert}: {e}")))?;
            cli_builder = cli_builder.use_rustls_tls().add_root_certificate(cert);
        }

        cli_builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
    }
}
