//! Client library for a school-administration console.
//!
//! Authenticates against the console with a cookie session and exposes typed
//! operations over its school directory: schools, groups and members,
//! student and service accounts, password resets, cloud-service entitlements
//! and distribution lists.
//!
//! # Core Components
//!
//! - [`ConsoleClient`] - caller-held client owning the transport, session and roster cache
//! - [`RosterCache`] - per-school on-disk roster with forced-refresh semantics
//! - [`wire`] - normalization of the vendor's JSON and XML payloads
//! - [`Transport`] - the HTTP seam, implemented by [`ReqwestTransport`]
//! - [`interactive`] - optional layer that prompts for omitted arguments
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use school_console::{ClientConfig, ConsoleClient, Credentials, Outcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let mut client = ConsoleClient::new(config)?;
//! client.connect(&Credentials::new("admin", "secret")).await?;
//!
//! let roster = client.get_roster("1234", false).await?;
//! println!("{} accounts", roster.len());
//!
//! match client.reset_password("1234", "ab1234", None).await? {
//!     Outcome::Completed(reset) => println!("{} -> {}", reset.username, reset.new_password),
//!     Outcome::NoSelection => println!("no such account"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod interactive;
pub mod model;
pub mod progress;
pub mod session;
pub mod transport;
pub mod wire;

// Re-export commonly used types for convenience
pub use cache::{CacheLookup, MissReason, RosterCache};
pub use client::ConsoleClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{BuildError, BuildResult, ConsoleError, ConsoleResult};
pub use model::{
    Account, AccountType, CloudService, CloudServiceConfirmation, CloudServiceUpdate,
    DistributionList, DistributionListChange, Group, GroupMember, GroupOrigin, Identity,
    ListAction, MembershipChange, Outcome, PasswordReset, School, SchoolId, ServiceStatus,
};
pub use progress::{LogProgress, ProgressSink, SilentProgress};
pub use session::{Credentials, Session};
pub use transport::{
    ContentType, HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError,
};
