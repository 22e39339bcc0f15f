//! Session establishment.
//!
//! The console authenticates with a stateful cookie: one form POST to the
//! login endpoint sets it and every later request reuses it. The cookie itself
//! lives in the transport; [`Session`] records who signed in and memoises the
//! school list for as long as it lives.

use crate::endpoints::paths;
use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{Identity, School};
use crate::transport::{ContentType, HttpRequest, Transport};
use crate::wire::{normalize_object, parse_json};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Username and password for the console login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated console session.
#[derive(Debug)]
pub struct Session {
    identity: Identity,
    established_at: DateTime<Utc>,
    schools: OnceCell<Vec<School>>,
}

impl Session {
    pub(crate) fn new(identity: Identity) -> Self {
        Self {
            identity,
            established_at: Utc::now(),
            schools: OnceCell::new(),
        }
    }

    /// The signed-in user.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }

    /// Number of schools the user is authorized for, per the current-user record.
    pub fn school_count(&self) -> usize {
        self.identity.school_count
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    pub(crate) fn schools(&self) -> &OnceCell<Vec<School>> {
        &self.schools
    }
}

/// Post the credentials.
///
/// The login only counts when the console answers 2xx and keeps the
/// connection alive; any other answer is an authentication failure.
pub(crate) async fn log_in<T: Transport>(
    transport: &T,
    credentials: &Credentials,
    timeout: Duration,
) -> ConsoleResult<()> {
    debug!("Logging in as {}", credentials.username);

    let login = HttpRequest::post(paths::LOGIN)
        .accept(ContentType::Json)
        .form(vec![
            ("username".to_string(), credentials.username.clone()),
            ("password".to_string(), credentials.password.clone()),
        ])
        .timeout(timeout);
    let response = transport.send(login).await?;

    if !response.is_success() {
        warn!(
            "Login for {} rejected with HTTP {}",
            credentials.username, response.status
        );
        return Err(ConsoleError::authentication(format!(
            "login rejected with HTTP {}",
            response.status
        )));
    }
    let keep_alive = response
        .header("connection")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("keep-alive"));
    if !keep_alive {
        warn!("Login for {} did not open a session", credentials.username);
        return Err(ConsoleError::authentication(
            "login response did not establish a keep-alive session",
        ));
    }
    Ok(())
}

/// Load the user behind the cookie set by [`log_in`].
pub(crate) async fn load<T: Transport>(transport: &T, timeout: Duration) -> ConsoleResult<Session> {
    let current_user = HttpRequest::get(paths::CURRENT_USER)
        .accept(ContentType::Json)
        .timeout(timeout);
    let response = transport.send(current_user).await?;
    if !response.is_success() {
        return Err(ConsoleError::Http {
            status: response.status,
            path: paths::CURRENT_USER.to_string(),
        });
    }
    let record = normalize_object(&parse_json(&response.body)?)?;
    let identity = Identity::from_record(&record);

    info!(
        "Connected as {} ({} school(s))",
        identity.display_name, identity.school_count
    );
    Ok(Session::new(identity))
}
