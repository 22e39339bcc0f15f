//! Roster, account lookup and service accounts.

use super::paths;
use crate::cache::{CacheLookup, parse_roster};
use crate::client::ConsoleClient;
use crate::error::ConsoleResult;
use crate::model::{Account, SchoolId};
use crate::transport::{ContentType, HttpRequest, Transport};
use crate::wire::normalize_array;
use log::{debug, info, warn};

impl<T: Transport> ConsoleClient<T> {
    /// Full account roster of a school.
    ///
    /// Served from the roster cache unless `force_refresh` is set or the
    /// cache cannot be used, in which case the roster is downloaded once,
    /// written to the cache verbatim and returned.
    pub async fn get_roster(
        &self,
        school: impl AsRef<str>,
        force_refresh: bool,
    ) -> ConsoleResult<Vec<Account>> {
        let (school, _) = self.school_scope(school.as_ref())?;

        match self.cache().lookup(&school, force_refresh).await {
            CacheLookup::Hit(accounts) => Ok(accounts),
            CacheLookup::Miss(reason) => {
                debug!("Roster for school {} not cached: {}", school, reason);
                self.download_roster(&school).await
            }
        }
    }

    async fn download_roster(&self, school: &SchoolId) -> ConsoleResult<Vec<Account>> {
        let label = format!("Downloading roster for school {}", school);
        self.progress().report(&label, 0);

        let raw = self
            .fetch_text(HttpRequest::get(paths::students(school)), ContentType::Xml)
            .await?;
        // Parse before writing so a bad download never replaces a good cache.
        let accounts = parse_roster(&raw)?;

        if let Err(e) = self.cache().store(school, &raw).await {
            warn!("Failed to write roster cache for school {}: {}", school, e);
        }

        self.progress().report(&label, 100);
        info!(
            "Downloaded roster for school {} ({} accounts)",
            school,
            accounts.len()
        );
        Ok(accounts)
    }

    /// Find an account by exact, case-sensitive username.
    pub async fn lookup_account(
        &self,
        school: impl AsRef<str>,
        identity: &str,
        force_refresh: bool,
    ) -> ConsoleResult<Option<Account>> {
        Ok(self
            .get_roster(school, force_refresh)
            .await?
            .into_iter()
            .find(|account| account.matches_identity(identity)))
    }

    /// Service accounts of a school.
    pub async fn list_service_accounts(&self, school: impl AsRef<str>) -> ConsoleResult<Vec<Account>> {
        let (school, _) = self.school_scope(school.as_ref())?;
        let value = self
            .fetch_json(HttpRequest::get(paths::service_accounts(&school)))
            .await?;

        Ok(normalize_array(&value)?
            .iter()
            .map(Account::from_record)
            .collect())
    }

    /// Drop the cached roster of a school. Returns whether one existed.
    pub async fn invalidate_roster(&self, school: impl AsRef<str>) -> ConsoleResult<bool> {
        let school = SchoolId::new(school.as_ref())?;
        Ok(self.cache().invalidate(&school).await?)
    }
}
