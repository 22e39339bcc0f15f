//! Groups and group members.
//!
//! The groups endpoint answers with two collections, `centralGroups` and
//! `localGroups`. They are concatenated, central first, into one sequence.

use super::paths;
use crate::client::ConsoleClient;
use crate::error::{ConsoleError, ConsoleResult};
use crate::model::{Group, GroupMember, GroupOrigin};
use crate::transport::{HttpRequest, Transport};
use crate::wire::{normalize_array, normalize_collection};
use log::debug;

const CENTRAL_GROUPS: &str = "centralGroups";
const LOCAL_GROUPS: &str = "localGroups";

impl<T: Transport> ConsoleClient<T> {
    /// Groups of a school, optionally filtered by exact group name.
    pub async fn list_groups(
        &self,
        school: impl AsRef<str>,
        name: Option<&str>,
    ) -> ConsoleResult<Vec<Group>> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let value = self.fetch_json(HttpRequest::get(paths::groups(&school))).await?;

        let central = normalize_collection(&value, CENTRAL_GROUPS)?;
        let local = normalize_collection(&value, LOCAL_GROUPS)?;
        debug!(
            "School {}: {} central and {} local group(s)",
            school,
            central.len(),
            local.len()
        );

        let groups = central
            .iter()
            .map(|r| Group::from_record(r, GroupOrigin::Central))
            .chain(local.iter().map(|r| Group::from_record(r, GroupOrigin::Local)));

        Ok(match name {
            Some(name) => groups.filter(|g| g.group_name == name).take(1).collect(),
            None => groups.collect(),
        })
    }

    /// Members of a named group.
    ///
    /// The name is resolved to a distinguished name first; a name that does
    /// not resolve is [`ConsoleError::GroupNotFound`]. A group without
    /// members yields an empty list.
    pub async fn list_group_members(
        &self,
        school: impl AsRef<str>,
        group_name: &str,
    ) -> ConsoleResult<Vec<GroupMember>> {
        let (school, _) = self.school_scope(school.as_ref())?;

        let group = self
            .list_groups(&school, Some(group_name))
            .await?
            .into_iter()
            .next()
            .filter(|g| !g.distinguished_name.is_empty())
            .ok_or_else(|| ConsoleError::GroupNotFound {
                school_id: school.to_string(),
                group_name: group_name.to_string(),
            })?;

        let request = HttpRequest::get(paths::group_members(&school))
            .query("dn", group.distinguished_name.as_str());
        let value = self.fetch_json(request).await?;

        Ok(normalize_array(&value)?
            .iter()
            .map(GroupMember::from_record)
            .collect())
    }
}
