//! HTTP boundary between the endpoint layer and the network.
//!
//! Every request the client issues is described by an [`HttpRequest`] and
//! answered by an [`HttpResponse`]. The [`Transport`] trait is the only place
//! that touches the network, so sessions, the roster cache and the endpoint
//! operations can all be exercised against an in-process transport.
//!
//! The vendor console authenticates with a session cookie set by the login
//! call, so [`ReqwestTransport`] keeps a cookie jar for its whole lifetime.

use crate::config::ClientConfig;
use crate::error::BuildResult;
use log::trace;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Errors raised while sending a request or reading its response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or body decoding failure from reqwest
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The transport could not service the request
    #[error("transport unavailable: {message}")]
    Unavailable { message: String },
}

impl TransportError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// HTTP verbs used by the console API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Content type an endpoint answers with. Each vendor endpoint only speaks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Xml,
    Text,
}

impl ContentType {
    /// MIME type sent in the `Accept` header.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
            ContentType::Text => "text/plain",
        }
    }
}

/// Request payload.
#[derive(Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// JSON document
    Json(Value),
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Form(pairs) => {
                let redacted: Vec<(&str, &str)> = pairs
                    .iter()
                    .map(|(k, v)| {
                        if k.eq_ignore_ascii_case("password") {
                            (k.as_str(), "<redacted>")
                        } else {
                            (k.as_str(), v.as_str())
                        }
                    })
                    .collect();
                f.debug_tuple("Form").field(&redacted).finish()
            }
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

/// A single request against the console API.
///
/// `target` is either a path relative to the configured base URL or, for
/// collaborators living on other hosts, an absolute `http(s)://` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub target: String,
    pub query: Vec<(String, String)>,
    pub accept: ContentType,
    pub body: Option<RequestBody>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            query: Vec::new(),
            accept: ContentType::Json,
            body: None,
            timeout: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::Post, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(Method::Delete, target)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn accept(mut self, content_type: ContentType) -> Self {
        self.accept = content_type;
        self
    }

    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether `target` points at another host.
    pub fn is_absolute(&self) -> bool {
        self.target.starts_with("http://") || self.target.starts_with("https://")
    }

    /// Look up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response with its body already read as text.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are stored lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends requests to the console.
///
/// Implementations hold whatever connection state the vendor needs (the
/// session cookie in particular) between calls.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// reqwest-backed transport with a persistent cookie jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> BuildResult<Self> {
        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_http_client(&config.base_url, http_client))
    }

    /// Create a transport around a pre-built `reqwest::Client` (for testing).
    pub fn with_http_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &HttpRequest) -> String {
        if request.is_absolute() {
            request.target.clone()
        } else {
            format!("{}{}", self.base_url, request.target)
        }
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        async move {
            let url = self.url_for(&request);
            trace!("{} {}", request.method, url);

            let mut builder = match request.method {
                Method::Get => self.http_client.get(&url),
                Method::Post => self.http_client.post(&url),
                Method::Delete => self.http_client.delete(&url),
            };

            builder = builder.header(reqwest::header::ACCEPT, request.accept.mime());
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }
            builder = match request.body {
                Some(RequestBody::Form(pairs)) => builder.form(&pairs),
                Some(RequestBody::Json(value)) => builder.json(&value),
                None => builder,
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
                })
                .collect();
            let body = response.text().await?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
