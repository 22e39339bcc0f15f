//! Mutation inputs and confirmation records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of an operation that may legitimately do nothing.
///
/// `NoSelection` is returned when the subject of the operation could not be
/// resolved (an unknown username, a declined prompt). It is a normal return
/// value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "value")]
pub enum Outcome<T> {
    Completed(T),
    NoSelection,
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::NoSelection => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::NoSelection => Outcome::NoSelection,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Outcome::Completed(value),
            None => Outcome::NoSelection,
        }
    }
}

/// Confirmation of a password reset.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub name: String,
    pub username: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("new_password", &"<redacted>")
            .finish()
    }
}

/// Account population a cloud-service change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Staff,
    Student,
    ServiceAccount,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Staff => "staff",
            AccountType::Student => "student",
            AccountType::ServiceAccount => "serviceaccount",
        }
    }
}

/// Cloud providers the console can entitle accounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudService {
    Google,
    Microsoft,
    Apple,
    Zoom,
    Adobe,
    Canva,
}

impl CloudService {
    pub const ALL: [CloudService; 6] = [
        CloudService::Google,
        CloudService::Microsoft,
        CloudService::Apple,
        CloudService::Zoom,
        CloudService::Adobe,
        CloudService::Canva,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudService::Google => "google",
            CloudService::Microsoft => "microsoft",
            CloudService::Apple => "apple",
            CloudService::Zoom => "zoom",
            CloudService::Adobe => "adobe",
            CloudService::Canva => "canva",
        }
    }
}

/// Entitlement state of a cloud service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    Enabled,
    Disabled,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Enabled => "Enabled",
            ServiceStatus::Disabled => "Disabled",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::VARIANTS
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| format!("unknown {} '{}'", $label, s))
            }
        }
    };
}

impl AccountType {
    const VARIANTS: [AccountType; 3] = [
        AccountType::Staff,
        AccountType::Student,
        AccountType::ServiceAccount,
    ];
}

impl CloudService {
    const VARIANTS: [CloudService; 6] = CloudService::ALL;
}

impl ServiceStatus {
    const VARIANTS: [ServiceStatus; 2] = [ServiceStatus::Enabled, ServiceStatus::Disabled];
}

display_and_parse!(AccountType, "account type");
display_and_parse!(CloudService, "cloud service");
display_and_parse!(ServiceStatus, "service status");

/// Per-identity confirmation of a cloud-service change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudServiceConfirmation {
    pub identity: String,
    pub account_type: AccountType,
    pub service: CloudService,
    pub status: ServiceStatus,
}

/// Result of a batch cloud-service change.
///
/// Any failure in the batch is reported as a single `Failed` value for the
/// whole batch; there is no per-identity error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum CloudServiceUpdate {
    Updated {
        confirmations: Vec<CloudServiceConfirmation>,
    },
    Failed {
        message: String,
    },
}

impl CloudServiceUpdate {
    pub fn is_updated(&self) -> bool {
        matches!(self, CloudServiceUpdate::Updated { .. })
    }
}

/// What happened to a distribution list or its membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListAction {
    Created,
    Removed,
    MemberAdded,
    MemberRemoved,
}

impl fmt::Display for ListAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ListAction::Created => "created",
            ListAction::Removed => "removed",
            ListAction::MemberAdded => "member added",
            ListAction::MemberRemoved => "member removed",
        };
        f.write_str(text)
    }
}

/// Confirmation of a distribution list being created or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionListChange {
    pub list_name: String,
    pub action: ListAction,
}

/// Confirmation of an account joining or leaving a distribution list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipChange {
    pub name: String,
    pub username: String,
    pub list_name: String,
    pub action: ListAction,
}
