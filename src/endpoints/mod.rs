//! Endpoint operations.
//!
//! Each operation follows the same steps: validate the inputs (school id
//! first, then session), build a request from a fixed template, send it, and
//! either normalize the answer into canonical records or return a
//! confirmation record for a mutation.
//!
//! Operations are grouped by resource:
//!
//! - [`schools`] - schools visible to the session
//! - [`groups`] - groups and group members
//! - [`accounts`] - roster (cached), account lookup, service accounts
//! - [`passwords`] - password resets
//! - [`cloud`] - cloud-service entitlements
//! - [`distribution`] - distribution lists and their members

pub mod accounts;
pub mod cloud;
pub mod distribution;
pub mod groups;
pub mod passwords;
pub mod schools;

/// URL templates of the vendor API.
pub mod paths {
    use crate::model::{AccountType, SchoolId};

    pub const LOGIN: &str = "/api/login";
    pub const CURRENT_USER: &str = "/api/currentuser";
    pub const SCHOOLS: &str = "/api/schools";

    pub fn groups(school: &SchoolId) -> String {
        format!("{}/{}/groups", SCHOOLS, school)
    }

    pub fn group_members(school: &SchoolId) -> String {
        format!("{}/{}/groups/members", SCHOOLS, school)
    }

    pub fn service_accounts(school: &SchoolId) -> String {
        format!("{}/{}/serviceaccounts", SCHOOLS, school)
    }

    pub fn students(school: &SchoolId) -> String {
        format!("{}/{}/students", SCHOOLS, school)
    }

    pub fn student_password(school: &SchoolId) -> String {
        format!("{}/{}/students/password", SCHOOLS, school)
    }

    pub fn distribution_lists(school: &SchoolId) -> String {
        format!("{}/{}/distributionlists", SCHOOLS, school)
    }

    pub fn distribution_list_members(school: &SchoolId) -> String {
        format!("{}/{}/distributionlists/members", SCHOOLS, school)
    }

    pub fn cloud_services(account_type: AccountType) -> String {
        format!("/api/cloudservices/{}", account_type)
    }
}
