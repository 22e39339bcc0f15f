//! The console client.
//!
//! [`ConsoleClient`] is the caller-held handle for everything: it owns the
//! transport, the roster cache and, once [`connect`](ConsoleClient::connect)
//! succeeds, the [`Session`]. Endpoint operations are implemented on it in
//! [`crate::endpoints`] and all of them refuse to run without a session.

use crate::cache::RosterCache;
use crate::config::ClientConfig;
use crate::error::{BuildResult, ConsoleError, ConsoleResult};
use crate::model::SchoolId;
use crate::progress::{LogProgress, ProgressSink};
use crate::session::{self, Credentials, Session};
use crate::transport::{ContentType, HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::wire::parse_json;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Client for one console host.
///
/// ```rust,no_run
/// use school_console::{ClientConfig, ConsoleClient, Credentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder()
///     .base_url("https://console.example.org")
///     .build()?;
/// let mut client = ConsoleClient::new(config)?;
/// client.connect(&Credentials::new("admin", "secret")).await?;
///
/// for school in client.list_schools().await? {
///     println!("{} {}", school.id, school.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConsoleClient<T: Transport = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    cache: RosterCache,
    progress: Arc<dyn ProgressSink>,
    timeout: Duration,
    session: Option<Session>,
}

impl ConsoleClient<ReqwestTransport> {
    /// Build a client talking HTTPS to `config.base_url`.
    pub fn new(config: ClientConfig) -> BuildResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ConsoleClient<T> {
    /// Build a client around any transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            cache: RosterCache::new(config.cache_dir.clone()),
            timeout: config.timeout,
            progress: Arc::new(LogProgress),
            session: None,
            transport,
            config,
        }
    }

    /// Replace the progress sink used for roster downloads.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &RosterCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn progress(&self) -> &dyn ProgressSink {
        self.progress.as_ref()
    }

    /// Timeout applied to the following requests.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Override the timeout for subsequent calls.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Log in and replace any session already held.
    ///
    /// The current session survives a failed attempt only when the login
    /// request got no answer at all. Once the console has answered, its
    /// cookie may have replaced the old one, so any later failure also
    /// disconnects.
    pub async fn connect(&mut self, credentials: &Credentials) -> ConsoleResult<&Session> {
        let attempt = match session::log_in(&self.transport, credentials, self.timeout).await {
            Ok(()) => session::load(&self.transport, self.timeout).await,
            Err(err @ ConsoleError::Transport(_)) => return Err(err),
            Err(err) => Err(err),
        };
        let session = match attempt {
            Ok(session) => session,
            Err(err) => {
                if self.session.take().is_some() {
                    warn!("Login attempt failed; previous session dropped");
                }
                return Err(err);
            }
        };
        if self.session.is_some() {
            debug!("Replacing existing session");
        }
        let session: &Session = self.session.insert(session);
        Ok(session)
    }

    /// Drop the current session.
    pub fn disconnect(&mut self) -> Option<Session> {
        let session = self.session.take();
        if let Some(ref s) = session {
            info!("Disconnected {}", s.display_name());
        }
        session
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The current session, or [`ConsoleError::NotConnected`].
    pub fn session(&self) -> ConsoleResult<&Session> {
        self.session.as_ref().ok_or(ConsoleError::NotConnected)
    }

    /// Validate a school id and require a session, in that order.
    pub(crate) fn school_scope(&self, school: &str) -> ConsoleResult<(SchoolId, &Session)> {
        let school = SchoolId::new(school)?;
        let session = self.session()?;
        Ok((school, session))
    }

    /// Send a request within the session. Non-2xx answers become
    /// [`ConsoleError::Http`].
    pub(crate) async fn fetch(&self, request: HttpRequest) -> ConsoleResult<HttpResponse> {
        self.session()?;
        let request = match request.timeout {
            Some(_) => request,
            None => request.timeout(self.timeout),
        };
        let path = request.target.clone();
        debug!("{} {}", request.method, path);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ConsoleError::Http {
                status: response.status,
                path,
            });
        }
        Ok(response)
    }

    pub(crate) async fn fetch_json(&self, request: HttpRequest) -> ConsoleResult<Value> {
        let response = self.fetch(request.accept(ContentType::Json)).await?;
        parse_json(&response.body)
    }

    pub(crate) async fn fetch_text(&self, request: HttpRequest, accept: ContentType) -> ConsoleResult<String> {
        let response = self.fetch(request.accept(accept)).await?;
        Ok(response.body)
    }

    /// Send a mutation, wrapping any failure in [`ConsoleError::Operation`].
    pub(crate) async fn mutate(&self, action: &str, request: HttpRequest) -> ConsoleResult<HttpResponse> {
        self.session()?;
        self.fetch(request)
            .await
            .map_err(|e| ConsoleError::operation(action, e))
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for ConsoleClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleClient")
            .field("transport", &self.transport)
            .field("base_url", &self.config.base_url)
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .field("session", &self.session)
            .finish()
    }
}
