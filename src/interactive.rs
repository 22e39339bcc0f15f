//! Interactive convenience layer.
//!
//! The core client always takes explicit school ids and usernames. This
//! layer fills in whatever the caller left out by asking: credentials through
//! a [`CredentialPrompt`], schools, accounts and lists through a [`Chooser`].
//! Prompt and chooser are supplied by the application (terminal UI, GUI,
//! scripted answers in tests).
//!
//! A choice that is declined, or offered from an empty list, ends the
//! operation with [`Outcome::NoSelection`].

use crate::client::ConsoleClient;
use crate::error::ConsoleResult;
use crate::model::{
    Account, DistributionList, Group, MembershipChange, Outcome, PasswordReset, School, SchoolId,
};
use crate::session::{Credentials, Session};
use crate::transport::Transport;
use log::debug;

/// Supplies login credentials.
pub trait CredentialPrompt {
    fn credentials(&self) -> ConsoleResult<Credentials>;
}

/// Fixed credentials, e.g. from the environment.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialPrompt for StaticCredentials {
    fn credentials(&self) -> ConsoleResult<Credentials> {
        Ok(self.0.clone())
    }
}

/// Something a [`Chooser`] can show.
pub trait Choice {
    fn label(&self) -> String;
}

impl Choice for School {
    fn label(&self) -> String {
        format!("{} {}", self.id, self.name)
    }
}

impl Choice for Account {
    fn label(&self) -> String {
        format!("{} ({})", self.display_name(), self.username)
    }
}

impl Choice for Group {
    fn label(&self) -> String {
        self.group_name.clone()
    }
}

impl Choice for DistributionList {
    fn label(&self) -> String {
        self.group_name.clone()
    }
}

/// Picks one item out of several.
pub trait Chooser {
    /// Index of the chosen item, or `None` when the user declines.
    /// Only called with two or more items.
    fn choose(&self, title: &str, labels: &[String]) -> Option<usize>;
}

/// Client wrapper that prompts for omitted arguments.
pub struct Interactive<'a, T: Transport, C: Chooser> {
    client: &'a mut ConsoleClient<T>,
    chooser: C,
}

impl<'a, T: Transport, C: Chooser> Interactive<'a, T, C> {
    pub fn new(client: &'a mut ConsoleClient<T>, chooser: C) -> Self {
        Self { client, chooser }
    }

    pub fn client(&self) -> &ConsoleClient<T> {
        &*self.client
    }

    /// Log in with credentials from the prompt.
    pub async fn connect_with(&mut self, prompt: &impl CredentialPrompt) -> ConsoleResult<&Session> {
        let credentials = prompt.credentials()?;
        self.client.connect(&credentials).await
    }

    /// Single items are taken without asking.
    fn pick<I: Choice>(&self, title: &str, mut items: Vec<I>) -> Option<I> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => {
                let labels: Vec<String> = items.iter().map(Choice::label).collect();
                let index = self.chooser.choose(title, &labels)?;
                if index < items.len() {
                    Some(items.swap_remove(index))
                } else {
                    debug!("Chooser returned out-of-range index {}", index);
                    None
                }
            }
        }
    }

    pub async fn choose_school(&self) -> ConsoleResult<Outcome<School>> {
        let schools = self.client.list_schools().await?;
        Ok(self.pick("Select a school", schools).into())
    }

    /// The given school, validated, or one chosen from the session's schools.
    pub async fn school_or_choose(&self, school: Option<&str>) -> ConsoleResult<Outcome<SchoolId>> {
        match school {
            Some(school) => Ok(Outcome::Completed(SchoolId::new(school)?)),
            None => Ok(self.choose_school().await?.map(|s| s.id)),
        }
    }

    pub async fn choose_account(&self, school: &SchoolId) -> ConsoleResult<Outcome<Account>> {
        let roster = self.client.get_roster(school, false).await?;
        Ok(self.pick("Select an account", roster).into())
    }

    pub async fn choose_group(&self, school: &SchoolId) -> ConsoleResult<Outcome<Group>> {
        let groups = self.client.list_groups(school, None).await?;
        Ok(self.pick("Select a group", groups).into())
    }

    pub async fn choose_distribution_list(
        &self,
        school: &SchoolId,
    ) -> ConsoleResult<Outcome<DistributionList>> {
        let lists = self.client.list_distribution_lists(school).await?;
        Ok(self.pick("Select a distribution list", lists).into())
    }

    /// Reset a password, choosing the school and account when omitted.
    pub async fn reset_password(
        &self,
        school: Option<&str>,
        identity: Option<&str>,
        password: Option<&str>,
    ) -> ConsoleResult<Outcome<PasswordReset>> {
        let Outcome::Completed(school) = self.school_or_choose(school).await? else {
            return Ok(Outcome::NoSelection);
        };
        match identity {
            Some(identity) => self.client.reset_password(&school, identity, password).await,
            None => match self.choose_account(&school).await? {
                Outcome::Completed(account) => Ok(Outcome::Completed(
                    self.client
                        .reset_account_password(&school, &account, password)
                        .await?,
                )),
                Outcome::NoSelection => Ok(Outcome::NoSelection),
            },
        }
    }

    /// Add an account to a distribution list, choosing whatever is omitted.
    pub async fn add_distribution_list_member(
        &self,
        school: Option<&str>,
        identity: Option<&str>,
        list_name: Option<&str>,
    ) -> ConsoleResult<Outcome<MembershipChange>> {
        let Outcome::Completed(school) = self.school_or_choose(school).await? else {
            return Ok(Outcome::NoSelection);
        };
        let identity = match identity {
            Some(identity) => identity.to_string(),
            None => match self.choose_account(&school).await? {
                Outcome::Completed(account) => account.username,
                Outcome::NoSelection => return Ok(Outcome::NoSelection),
            },
        };
        let list_name = match list_name {
            Some(list_name) => list_name.to_string(),
            None => match self.choose_distribution_list(&school).await? {
                Outcome::Completed(list) => list.group_name,
                Outcome::NoSelection => return Ok(Outcome::NoSelection),
            },
        };
        self.client
            .add_distribution_list_member(&school, &identity, &list_name)
            .await
    }
}
