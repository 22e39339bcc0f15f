//! Distribution lists.
//!
//! Lists are school-scoped and always named `{schoolId}-dl-{name}`; create
//! and remove take the short name and synthesize the full one. Membership
//! operations take the full list name.

use super::paths;
use crate::client::ConsoleClient;
use crate::error::ConsoleResult;
use crate::model::{
    DistributionList, DistributionListChange, ListAction, MembershipChange, Outcome, SchoolId,
};
use crate::transport::{HttpRequest, Transport};
use crate::wire::normalize_array;
use log::info;
use serde_json::json;

impl<T: Transport> ConsoleClient<T> {
    /// Distribution lists of a school.
    pub async fn list_distribution_lists(
        &self,
        school: impl AsRef<str>,
    ) -> ConsoleResult<Vec<DistributionList>> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let value = self
            .fetch_json(HttpRequest::get(paths::distribution_lists(&school)))
            .await?;

        Ok(normalize_array(&value)?
            .iter()
            .map(DistributionList::from_record)
            .collect())
    }

    /// Create `{school}-dl-{name}`.
    pub async fn create_distribution_list(
        &self,
        school: impl AsRef<str>,
        name: &str,
    ) -> ConsoleResult<DistributionListChange> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let list_name = DistributionList::list_name(&school, name);

        let request = HttpRequest::post(paths::distribution_lists(&school))
            .json(json!({ "name": list_name }));
        self.mutate(&format!("Create distribution list {}", list_name), request)
            .await?;

        info!("Created distribution list {}", list_name);
        Ok(DistributionListChange {
            list_name,
            action: ListAction::Created,
        })
    }

    /// Remove `{school}-dl-{name}`.
    pub async fn remove_distribution_list(
        &self,
        school: impl AsRef<str>,
        name: &str,
    ) -> ConsoleResult<DistributionListChange> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let list_name = DistributionList::list_name(&school, name);

        let request = HttpRequest::delete(paths::distribution_lists(&school))
            .query("name", list_name.as_str());
        self.mutate(&format!("Remove distribution list {}", list_name), request)
            .await?;

        info!("Removed distribution list {}", list_name);
        Ok(DistributionListChange {
            list_name,
            action: ListAction::Removed,
        })
    }

    /// Add the account with the given username to a list.
    ///
    /// An unknown username yields [`Outcome::NoSelection`].
    pub async fn add_distribution_list_member(
        &self,
        school: impl AsRef<str>,
        identity: &str,
        list_name: &str,
    ) -> ConsoleResult<Outcome<MembershipChange>> {
        self.change_membership(school.as_ref(), identity, list_name, Membership::Add)
            .await
    }

    /// Remove the account with the given username from a list.
    ///
    /// An unknown username yields [`Outcome::NoSelection`].
    pub async fn remove_distribution_list_member(
        &self,
        school: impl AsRef<str>,
        identity: &str,
        list_name: &str,
    ) -> ConsoleResult<Outcome<MembershipChange>> {
        self.change_membership(school.as_ref(), identity, list_name, Membership::Remove)
            .await
    }

    async fn change_membership(
        &self,
        school: &str,
        identity: &str,
        list_name: &str,
        membership: Membership,
    ) -> ConsoleResult<Outcome<MembershipChange>> {
        let (school, _) = self.school_scope(school)?;

        let Some(account) = self.lookup_account(&school, identity, false).await? else {
            info!("No account '{}' in school {}; list unchanged", identity, school);
            return Ok(Outcome::NoSelection);
        };

        let request =
            membership_request(&school, membership, list_name, &account.distinguished_name);
        let label = match membership {
            Membership::Add => format!("Add {} to {}", account.username, list_name),
            Membership::Remove => format!("Remove {} from {}", account.username, list_name),
        };
        self.mutate(&label, request).await?;

        info!("{}", label);
        Ok(Outcome::Completed(MembershipChange {
            name: account.display_name(),
            username: account.username,
            list_name: list_name.to_string(),
            action: membership.action(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    Add,
    Remove,
}

impl Membership {
    fn action(self) -> ListAction {
        match self {
            Membership::Add => ListAction::MemberAdded,
            Membership::Remove => ListAction::MemberRemoved,
        }
    }
}

fn membership_request(
    school: &SchoolId,
    membership: Membership,
    list_name: &str,
    distinguished_name: &str,
) -> HttpRequest {
    let path = paths::distribution_list_members(school);
    match membership {
        Membership::Add => HttpRequest::post(path).json(json!({
            "listName": list_name,
            "distinguishedName": distinguished_name,
        })),
        Membership::Remove => HttpRequest::delete(path)
            .query("listName", list_name)
            .query("dn", distinguished_name),
    }
}
