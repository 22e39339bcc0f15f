//! Client configuration.
//!
//! [`ClientConfig`] carries everything the client needs that is not a
//! credential: the console host, where roster caches live, the default request
//! timeout and the random-word service used for generated passwords.

use crate::error::{BuildError, BuildResult};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Suffix appended to generated passwords so they pass the console's
/// complexity rules (symbol, upper-case letter, digit).
pub const DEFAULT_PASSWORD_SUFFIX: &str = "!A1";

/// Environment variables read by [`ClientConfig::from_env`].
pub const ENV_BASE_URL: &str = "SCHOOL_CONSOLE_BASE_URL";
pub const ENV_CACHE_DIR: &str = "SCHOOL_CONSOLE_CACHE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "SCHOOL_CONSOLE_TIMEOUT_SECS";
pub const ENV_WORD_URL: &str = "SCHOOL_CONSOLE_WORD_URL";

/// Configuration for a console client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Console host, without a trailing slash.
    pub base_url: String,

    /// Directory holding one roster file per school.
    pub cache_dir: PathBuf,

    /// Timeout applied to every request unless overridden on the client.
    pub timeout: Duration,

    /// Plain-text random word service used when no password is supplied.
    pub word_generator_url: String,

    /// Appended to generated words.
    pub password_suffix: String,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            cache_dir: default_cache_dir(),
            timeout: DEFAULT_TIMEOUT,
            word_generator_url: "https://random-word-api.herokuapp.com/word?number=1".to_string(),
            password_suffix: DEFAULT_PASSWORD_SUFFIX.to_string(),
            user_agent: format!("school-console/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Defaults overridden by `SCHOOL_CONSOLE_*` environment variables.
    pub fn from_env() -> BuildResult<Self> {
        let mut builder = ClientConfigBuilder::new();

        if let Ok(url) = env::var(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }
        if let Ok(dir) = env::var(ENV_CACHE_DIR) {
            builder = builder.cache_dir(dir);
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| BuildError::InvalidConfiguration {
                message: format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, secs),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Ok(url) = env::var(ENV_WORD_URL) {
            builder = builder.word_generator_url(url);
        }

        builder.build()
    }
}

/// `{platform cache dir}/school-console`, falling back to a relative directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("school-console")
}

/// Fluent builder for [`ClientConfig`].
///
/// ```rust
/// use school_console::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .base_url("https://console.example.org/")
///     .cache_dir("/tmp/rosters")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url, "https://console.example.org");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn word_generator_url(mut self, url: impl Into<String>) -> Self {
        self.config.word_generator_url = url.into();
        self
    }

    pub fn password_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.password_suffix = suffix.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Validate and produce the configuration.
    pub fn build(mut self) -> BuildResult<ClientConfig> {
        let url = self.config.base_url.trim_end_matches('/').to_string();
        if !(url.starts_with("https://") || url.starts_with("http://")) || url.contains(' ') {
            return Err(BuildError::InvalidBaseUrl { url });
        }
        self.config.base_url = url;

        if self.config.timeout.is_zero() {
            return Err(BuildError::InvalidConfiguration {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(self.config)
    }
}
