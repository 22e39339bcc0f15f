//! Error types for console client operations.
//!
//! Validation errors are raised before any request leaves the process, read
//! errors propagate unchanged, and mutation errors are wrapped in
//! [`ConsoleError::Operation`] together with the underlying cause.

use crate::transport::TransportError;

/// Main error type for console client operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// An endpoint operation was attempted without an open session
    #[error("you must open a session before using this function")]
    NotConnected,

    /// The login endpoint rejected the credentials
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A school identifier that is not exactly four digits
    #[error("Invalid school id '{school_id}': expected a 4-digit identifier")]
    InvalidSchool { school_id: String },

    /// A group name that does not resolve to a distinguished name
    #[error("Group '{group_name}' not found in school {school_id}")]
    GroupNotFound {
        school_id: String,
        group_name: String,
    },

    /// A mutation endpoint rejected the request
    #[error("{action} failed: {source}")]
    Operation {
        action: String,
        #[source]
        source: Box<ConsoleError>,
    },

    /// Non-success status from a read endpoint
    #[error("Request to {path} returned HTTP {status}")]
    Http { status: u16, path: String },

    /// The request could not be sent or the response could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed XML payload
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Malformed JSON payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed payload with the wrong shape for the endpoint
    #[error("Unexpected payload: expected {expected}")]
    UnexpectedPayload { expected: String },

    /// Local filesystem errors outside the best-effort cache read path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The random word service returned nothing usable
    #[error("Password generation failed: {message}")]
    PasswordGeneration { message: String },
}

/// Errors that can occur while building a client configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Base URL missing or not an http(s) URL
    #[error("Invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// Convenience methods for creating common errors
impl ConsoleError {
    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an invalid school error
    pub fn invalid_school(school_id: impl Into<String>) -> Self {
        Self::InvalidSchool {
            school_id: school_id.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create an unexpected payload error
    pub fn unexpected_payload(expected: impl Into<String>) -> Self {
        Self::UnexpectedPayload {
            expected: expected.into(),
        }
    }

    /// Wrap the cause of a failed mutation
    pub fn operation(action: impl Into<String>, cause: ConsoleError) -> Self {
        Self::Operation {
            action: action.into(),
            source: Box::new(cause),
        }
    }

    /// True for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NotConnected | Self::InvalidSchool { .. })
    }
}

// Result type aliases for convenience
pub type ConsoleResult<T> = Result<T, ConsoleError>;
pub type BuildResult<T> = Result<T, BuildError>;
