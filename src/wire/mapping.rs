//! Field tables mapping vendor field names onto canonical record fields.
//!
//! The same logical field is spelled differently depending on the endpoint
//! (JSON camelCase after prefix stripping, PascalCase in the roster XML, and
//! a handful of legacy aliases). Each table lists, per canonical field, the
//! wire names that feed it in lookup order.

use super::{RawRecord, parse_vendor_datetime};
use chrono::NaiveDateTime;
use serde_json::Value;

/// One canonical field and the wire names it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub canonical: &'static str,
    pub wire: &'static [&'static str],
}

const fn field(canonical: &'static str, wire: &'static [&'static str]) -> FieldMap {
    FieldMap { canonical, wire }
}

/// Student and service accounts (roster XML and service-account JSON).
pub const ACCOUNT_FIELDS: &[FieldMap] = &[
    field(
        "distinguishedName",
        &["distinguishedName", "DistinguishedName", "dn", "DN"],
    ),
    field(
        "username",
        &[
            "username",
            "userName",
            "UserName",
            "Username",
            "login",
            "Login",
            "samAccountName",
            "SamAccountName",
        ],
    ),
    field(
        "firstName",
        &["firstName", "FirstName", "givenName", "GivenName"],
    ),
    field(
        "lastName",
        &["lastName", "LastName", "surname", "Surname", "sn"],
    ),
    field(
        "disabled",
        &["disabled", "Disabled", "isDisabled", "IsDisabled"],
    ),
    field("whenCreated", &["whenCreated", "WhenCreated", "created", "Created"]),
    field(
        "passwordLastSet",
        &["passwordLastSet", "PasswordLastSet", "pwdLastSet"],
    ),
];

/// Groups and distribution lists.
pub const GROUP_FIELDS: &[FieldMap] = &[
    field("groupName", &["groupName", "GroupName", "name", "Name"]),
    field(
        "distinguishedName",
        &["distinguishedName", "DistinguishedName", "dn", "DN"],
    ),
];

/// Group and distribution-list members.
pub const MEMBER_FIELDS: &[FieldMap] = &[
    field("username", &["username", "userName", "UserName", "login"]),
    field("displayName", &["displayName", "DisplayName", "name", "Name"]),
    field("canDelete", &["canDelete", "CanDelete"]),
];

/// Schools the signed-in user may administer.
pub const SCHOOL_FIELDS: &[FieldMap] = &[
    field("id", &["id", "Id", "schoolId", "SchoolId", "number"]),
    field("name", &["name", "Name", "schoolName", "SchoolName"]),
];

/// The signed-in user, as returned by the current-user endpoint.
pub const CURRENT_USER_FIELDS: &[FieldMap] = &[
    field("displayName", &["displayName", "DisplayName", "name"]),
    field("username", &["username", "userName", "UserName", "login"]),
    field("schools", &["schools", "Schools", "authorizedSchools"]),
];

/// Typed read access to a raw record through a field table.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    record: &'a RawRecord,
    table: &'static [FieldMap],
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a RawRecord, table: &'static [FieldMap]) -> Self {
        Self { record, table }
    }

    /// First non-null wire value for a canonical field.
    ///
    /// A canonical name missing from the table is a programming error and
    /// simply yields `None`.
    pub fn value(&self, canonical: &str) -> Option<&'a Value> {
        let entry = self.table.iter().find(|f| f.canonical == canonical)?;
        entry
            .wire
            .iter()
            .filter_map(|name| self.record.get(*name))
            .find(|v| !v.is_null())
    }

    /// String form of a field. Numbers are rendered, other shapes are `None`.
    pub fn text(&self, canonical: &str) -> Option<String> {
        match self.value(canonical)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Text field, empty string when absent.
    pub fn text_or_default(&self, canonical: &str) -> String {
        self.text(canonical).unwrap_or_default()
    }

    /// Boolean field. XML carries booleans as `true`/`false` text.
    pub fn flag(&self, canonical: &str) -> bool {
        match self.value(canonical) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1"
            }
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        }
    }

    pub fn datetime(&self, canonical: &str) -> Option<NaiveDateTime> {
        self.value(canonical).and_then(parse_vendor_datetime)
    }

    /// Number of elements in an array field, zero when absent.
    pub fn count(&self, canonical: &str) -> usize {
        match self.value(canonical) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn record(&self) -> &'a RawRecord {
        self.record
    }
}
