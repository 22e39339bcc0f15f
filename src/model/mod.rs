//! Canonical directory records.
//!
//! Every record is built from a normalized [`RawRecord`] through the field
//! tables in [`crate::wire::mapping`] and keeps that raw record, so vendor
//! attributes without a canonical field stay reachable.

pub mod confirmation;
pub mod school_id;

pub use confirmation::{
    AccountType, CloudService, CloudServiceConfirmation, CloudServiceUpdate,
    DistributionListChange, ListAction, MembershipChange, Outcome, PasswordReset, ServiceStatus,
};
pub use school_id::SchoolId;

use crate::wire::RawRecord;
use crate::wire::mapping::{
    ACCOUNT_FIELDS, CURRENT_USER_FIELDS, Fields, GROUP_FIELDS, MEMBER_FIELDS, SCHOOL_FIELDS,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A school the signed-in user may administer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: SchoolId,
    pub name: String,
}

impl School {
    /// Build from a school record. Records without a valid id are skipped.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let fields = Fields::new(record, SCHOOL_FIELDS);
        let id = match fields.value("id")? {
            serde_json::Value::Number(n) => SchoolId::try_from(n.as_u64()?).ok()?,
            serde_json::Value::String(s) => SchoolId::new(s.trim()).ok()?,
            _ => return None,
        };
        Some(Self {
            id,
            name: fields.text_or_default("name"),
        })
    }
}

/// A student or service account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub distinguished_name: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub disabled: bool,
    pub when_created: Option<NaiveDateTime>,
    pub password_last_set: Option<NaiveDateTime>,
    /// Every vendor field, prefix-stripped.
    pub raw: RawRecord,
}

impl Account {
    pub fn from_record(record: &RawRecord) -> Self {
        let fields = Fields::new(record, ACCOUNT_FIELDS);
        Self {
            distinguished_name: fields.text_or_default("distinguishedName"),
            username: fields.text_or_default("username"),
            first_name: fields.text_or_default("firstName"),
            last_name: fields.text_or_default("lastName"),
            disabled: fields.flag("disabled"),
            when_created: fields.datetime("whenCreated"),
            password_last_set: fields.datetime("passwordLastSet"),
            raw: record.clone(),
        }
    }

    /// "First Last", trimmed when either part is missing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Exact, case-sensitive username match.
    pub fn matches_identity(&self, identity: &str) -> bool {
        self.username == identity
    }
}

/// Which of the two group collections a group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupOrigin {
    Central,
    Local,
}

/// A school group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_name: String,
    pub distinguished_name: String,
    pub origin: GroupOrigin,
    pub raw: RawRecord,
}

impl Group {
    pub fn from_record(record: &RawRecord, origin: GroupOrigin) -> Self {
        let fields = Fields::new(record, GROUP_FIELDS);
        Self {
            group_name: fields.text_or_default("groupName"),
            distinguished_name: fields.text_or_default("distinguishedName"),
            origin,
            raw: record.clone(),
        }
    }
}

/// A school-scoped mailing list named `{schoolId}-dl-{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionList {
    pub group_name: String,
    pub distinguished_name: String,
    pub raw: RawRecord,
}

impl DistributionList {
    pub fn from_record(record: &RawRecord) -> Self {
        let fields = Fields::new(record, GROUP_FIELDS);
        Self {
            group_name: fields.text_or_default("groupName"),
            distinguished_name: fields.text_or_default("distinguishedName"),
            raw: record.clone(),
        }
    }

    /// Full list name for a short name within a school.
    pub fn list_name(school: &SchoolId, name: &str) -> String {
        format!("{}-dl-{}", school, name)
    }
}

/// One member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub username: String,
    pub display_name: String,
    pub can_delete: bool,
}

impl GroupMember {
    pub fn from_record(record: &RawRecord) -> Self {
        let fields = Fields::new(record, MEMBER_FIELDS);
        Self {
            username: fields.text_or_default("username"),
            display_name: fields.text_or_default("displayName"),
            can_delete: fields.flag("canDelete"),
        }
    }
}

/// Who the session belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub display_name: String,
    pub username: String,
    pub school_count: usize,
    pub raw: RawRecord,
}

impl Identity {
    pub fn from_record(record: &RawRecord) -> Self {
        let fields = Fields::new(record, CURRENT_USER_FIELDS);
        Self {
            display_name: fields.text_or_default("displayName"),
            username: fields.text_or_default("username"),
            school_count: fields.count("schools"),
            raw: record.clone(),
        }
    }
}
