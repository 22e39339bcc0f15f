//! Shared helpers for the integration tests.
//!
//! [`MockTransport`] stands in for the console; [`TestContext`] wires it into
//! a [`ConsoleClient`] whose roster cache lives in a temporary directory.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_transport;

pub use fixtures::*;
pub use mock_transport::MockTransport;

use school_console::endpoints::paths;
use school_console::{
    ClientConfig, ConsoleClient, Credentials, Method, SchoolId, SilentProgress,
};
use std::sync::Arc;
use tempfile::TempDir;

pub const SCHOOL: &str = "1234";

pub fn school() -> SchoolId {
    SchoolId::new(SCHOOL).unwrap()
}

pub fn credentials() -> Credentials {
    Credentials::new("gadmin", "correct horse")
}

/// Route client logs through the test harness; set `RUST_LOG` to see them.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A client on a mock transport with a private cache directory.
pub struct TestContext {
    pub client: ConsoleClient<MockTransport>,
    pub transport: MockTransport,
    pub cache_dir: TempDir,
}

impl TestContext {
    /// Disconnected client; the login routes answer successfully.
    pub fn new() -> Self {
        init_logging();
        let cache_dir = TempDir::new().unwrap();
        let config = ClientConfig::builder()
            .base_url("https://console.test")
            .cache_dir(cache_dir.path())
            .word_generator_url("https://words.test/word")
            .build()
            .unwrap();

        let transport = MockTransport::new();
        transport
            .on(Method::Post, paths::LOGIN, login_accepted())
            .on(Method::Get, paths::CURRENT_USER, json("current_user.json"));

        let client = ConsoleClient::with_transport(config, transport.clone())
            .with_progress(Arc::new(SilentProgress));

        Self {
            client,
            transport,
            cache_dir,
        }
    }

    /// Logged-in client with the login traffic cleared from the request log.
    pub async fn connected() -> Self {
        let mut ctx = Self::new();
        ctx.client.connect(&credentials()).await.unwrap();
        ctx.transport.clear_requests();
        ctx
    }

    /// Serve the roster fixture for school 1234.
    pub fn with_roster(self) -> Self {
        self.transport
            .on(Method::Get, &paths::students(&school()), xml("roster_1234.xml"));
        self
    }

    pub fn roster_downloads(&self) -> usize {
        self.transport.count(Method::Get, &paths::students(&school()))
    }

    /// Number of files in the cache directory.
    pub fn cached_files(&self) -> usize {
        std::fs::read_dir(self.cache_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
