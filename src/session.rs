use crate::error::Result;
use crate::extract::{Accessor, lookup};
use crate::http::{HttpClient, HttpConnectionProfile, HttpResponse};
use crate::params::classify;
use crate::profile::Profile;
use crate::render::{ColorChoice, Palette, Renderer};
use crate::request::{HttpRequest, header_pair};

use indexmap::IndexMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use std::time::Duration;

/// `true` for 2xx codes.
pub fn succeed(code: impl Into<i64>) -> bool {
    let code: i64 = code.into();
    (200..300).contains(&code)
}

pub fn failed(code: impl Into<i64>) -> bool {
    !succeed(code)
}

/// Serializes anything `Serialize` (including `serde_json::json!` values) to compact JSON.
pub fn json_encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub struct SessionBuilder {
    base_url: String,
    timeout: Option<Duration>,
    insecure: bool,
    ca_cert: Option<String>,
    headers: IndexMap<String, String>,
    color: ColorChoice,
    echo: bool,
    output: Option<Box<dyn Write + Send>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        SessionBuilder {
            base_url: String::new(),
            timeout: None,
            insecure: false,
            ca_cert: None,
            headers: IndexMap::new(),
            color: ColorChoice::Auto,
            echo: true,
            output: None,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the settings `profile` has. Settings it leaves out, and an
    /// `insecure` already switched on, are kept.
    pub fn profile(mut self, profile: &Profile) -> Self {
        if let Some(base_url) = profile.base_url() {
            self.base_url = base_url.clone();
        }
        if let Some(timeout) = profile.timeout() {
            self.timeout = Some(timeout);
        }
        self.insecure |= profile.insecure();
        if let Some(ca_cert) = profile.ca_cert() {
            self.ca_cert = Some(ca_cert.clone());
        }
        for (k, v) in profile.headers() {
            self.headers.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// No timeout unless set; a hung server blocks the call forever.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn ca_cert(mut self, path: impl Into<String>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Sent with every request unless a request param overrides it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Whether exchanges are printed at all.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Where exchanges are printed; stdout by default. `ColorChoice::Auto`
    /// turns color off for a custom sink.
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    pub fn build(self) -> Result<Session> {
        for (name, value) in &self.headers {
            header_pair(name, value)?;
        }
        let client = HttpClient::new(&self)?;
        let palette = match (&self.output, self.color) {
            (Some(_), ColorChoice::Auto) => Palette::new(ColorChoice::Never),
            (_, choice) => Palette::new(choice),
        };

        Ok(Session {
            base_url: self.base_url,
            default_headers: self.headers,
            client,
            renderer: Renderer::new(palette),
            echo: self.echo,
            output: self.output.unwrap_or_else(|| Box::new(std::io::stdout())),
            last_request: None,
            last_request_body: String::new(),
            last_response: None,
        })
    }
}

impl HttpConnectionProfile for SessionBuilder {
    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }
}

/// One scripting session: a transport, a base URL and the last exchange.
///
/// Every verb helper replaces the last exchange. The request is recorded
/// before it is sent, so after a failed call `last_request` describes the
/// attempt and `last_response` is empty.
pub struct Session {
    base_url: String,
    default_headers: IndexMap<String, String>,
    client: HttpClient,
    renderer: Renderer,
    echo: bool,
    output: Box<dyn Write + Send>,
    last_request: Option<HttpRequest>,
    last_request_body: String,
    last_response: Option<HttpResponse>,
}

impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("client", &self.client)
            .field("last_request", &self.last_request)
            .field("last_response", &self.last_response)
            .finish()
    }
}

impl Session {
    /// Empty base URL, default transport, output to stdout.
    pub fn new() -> Result<Self> {
        SessionBuilder::new().build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn get(&mut self, url: &str, params: &[&str]) -> Result<&HttpResponse> {
        self.send(Method::GET, url, "", params)
    }

    pub fn post(&mut self, url: &str, body: &str, params: &[&str]) -> Result<&HttpResponse> {
        self.send(Method::POST, url, body, params)
    }

    pub fn put(&mut self, url: &str, body: &str, params: &[&str]) -> Result<&HttpResponse> {
        self.send(Method::PUT, url, body, params)
    }

    pub fn patch(&mut self, url: &str, body: &str, params: &[&str]) -> Result<&HttpResponse> {
        self.send(Method::PATCH, url, body, params)
    }

    pub fn delete(&mut self, url: &str, params: &[&str]) -> Result<&HttpResponse> {
        self.send(Method::DELETE, url, "", params)
    }

    /// Classifies `params`, builds the request against the base URL, prints
    /// it, sends it and prints the response.
    ///
    /// Default headers are part of the built request, so the printed and
    /// recorded request shows everything that goes on the wire.
    pub fn send(
        &mut self,
        method: Method,
        url: &str,
        body: &str,
        params: &[&str],
    ) -> Result<&HttpResponse> {
        let params = classify(params).with_default_headers(&self.default_headers);
        self.last_request_body = body.to_string();
        let request = HttpRequest::build(method, &self.base_url, url, body.to_string(), &params)?;

        self.last_response = None;
        let request = self.last_request.insert(request);
        if self.echo {
            let rendered = self.renderer.render_request(request);
            Self::emit(self.output.as_mut(), &rendered);
        }

        let response = self.client.execute(request)?;
        let response = self.last_response.insert(response);
        if self.echo {
            let rendered = self.renderer.render_response(response);
            Self::emit(self.output.as_mut(), &rendered);
        }

        Ok(response)
    }

    fn emit(output: &mut dyn Write, text: &str) {
        if let Err(e) = output.write_all(text.as_bytes()).and_then(|_| output.flush()) {
            tracing::warn!("failed to print exchange: {e}");
        }
    }

    /// Looks `path` up in the last response body.
    pub fn value(&self, path: &str) -> Accessor {
        match &self.last_response {
            Some(response) => lookup(response.body(), path),
            None => Accessor::default(),
        }
    }

    pub fn last_request(&self) -> Option<&HttpRequest> {
        self.last_request.as_ref()
    }

    pub fn last_request_body(&self) -> &str {
        &self.last_request_body
    }

    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.last_response.as_ref()
    }

    pub fn last_response_body(&self) -> &str {
        self.last_response.as_ref().map(|r| r.body()).unwrap_or("")
    }

    pub fn last_status(&self) -> Option<StatusCode> {
        self.last_response.as_ref().map(|r| r.status())
    }

    /// `succeed` applied to the last status; `false` when nothing was received.
    pub fn succeeded(&self) -> bool {
        self.last_status()
            .map(|s| succeed(s.as_u16()))
            .unwrap_or(false)
    }
}
