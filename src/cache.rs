//! On-disk roster cache.
//!
//! Downloading a school's full roster is slow, so the raw roster document is
//! kept on disk, one file per school:
//!
//! ```text
//! {cache_root}/{schoolId}-Students.xml
//! ```
//!
//! The file holds the roster exactly as the console sent it. There is no
//! expiry: a cached roster is used until the caller asks for a forced
//! refresh. Reading the cache is best-effort. A missing, unreadable or
//! corrupt file is reported as a [`CacheLookup::Miss`] and never as an error,
//! so a damaged cache can always be repaired by downloading again.
//!
//! Writes overwrite the file in place. Concurrent writers race and the last
//! one wins.

use crate::error::ConsoleResult;
use crate::model::{Account, SchoolId};
use crate::wire::parse_array_of;
use log::{debug, trace, warn};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const ROSTER_SUFFIX: &str = "-Students";
const ROSTER_EXTENSION: &str = "xml";

/// Why a cache lookup did not produce a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// No cache file for the school
    Absent,
    /// The caller forced a refresh
    Bypassed,
    /// The file exists but could not be read
    Unreadable(String),
    /// The file was read but is not a valid roster document
    Corrupt(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::Absent => write!(f, "no cached roster"),
            MissReason::Bypassed => write!(f, "refresh forced"),
            MissReason::Unreadable(e) => write!(f, "cache unreadable: {}", e),
            MissReason::Corrupt(e) => write!(f, "cache corrupt: {}", e),
        }
    }
}

/// Outcome of consulting the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Vec<Account>),
    Miss(MissReason),
}

/// Parse a raw roster document into accounts.
pub fn parse_roster(raw: &str) -> ConsoleResult<Vec<Account>> {
    Ok(parse_array_of(raw)?
        .iter()
        .map(Account::from_record)
        .collect())
}

/// File-backed roster cache rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterCache {
    root: PathBuf,
}

impl RosterCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the cache file for a school.
    pub fn cache_path(&self, school: &SchoolId) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", school, ROSTER_SUFFIX, ROSTER_EXTENSION))
    }

    /// Consult the cache. Never fails.
    pub async fn lookup(&self, school: &SchoolId, force_refresh: bool) -> CacheLookup {
        if force_refresh {
            return CacheLookup::Miss(MissReason::Bypassed);
        }

        let path = self.cache_path(school);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return CacheLookup::Miss(MissReason::Absent);
            }
            Err(e) => {
                warn!("Failed to read roster cache {}: {}", path.display(), e);
                return CacheLookup::Miss(MissReason::Unreadable(e.to_string()));
            }
        };

        match parse_roster(&raw) {
            Ok(accounts) => {
                debug!(
                    "Roster cache hit for school {} ({} accounts)",
                    school,
                    accounts.len()
                );
                CacheLookup::Hit(accounts)
            }
            Err(e) => {
                warn!("Roster cache {} is corrupt: {}", path.display(), e);
                CacheLookup::Miss(MissReason::Corrupt(e.to_string()))
            }
        }
    }

    /// Write a raw roster document, replacing any previous one.
    pub async fn store(&self, school: &SchoolId, raw: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.cache_path(school);
        tokio::fs::write(&path, raw).await?;
        trace!("Wrote {} bytes to {}", raw.len(), path.display());
        Ok(path)
    }

    /// Remove the cache file for a school. Returns whether a file existed.
    pub async fn invalidate(&self, school: &SchoolId) -> std::io::Result<bool> {
        match tokio::fs::remove_file(self.cache_path(school)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ROSTER: &str = "<ArrayOfStudent><Student><UserName>ab1234</UserName></Student>\
                          <Student><UserName>cd5678</UserName></Student></ArrayOfStudent>";

    fn school() -> SchoolId {
        SchoolId::new("1234").unwrap()
    }

    #[test]
    fn test_cache_path_layout() {
        let cache = RosterCache::new("/var/cache/rosters");
        assert_eq!(
            cache.cache_path(&school()),
            PathBuf::from("/var/cache/rosters/1234-Students.xml")
        );
    }

    #[tokio::test]
    async fn test_absent_then_hit() {
        let dir = TempDir::new().unwrap();
        let cache = RosterCache::new(dir.path().join("nested"));

        assert_eq!(
            cache.lookup(&school(), false).await,
            CacheLookup::Miss(MissReason::Absent)
        );

        cache.store(&school(), ROSTER).await.unwrap();
        match cache.lookup(&school(), false).await {
            CacheLookup::Hit(accounts) => assert_eq!(accounts.len(), 2),
            other => panic!("expected hit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_valid_file() {
        let dir = TempDir::new().unwrap();
        let cache = RosterCache::new(dir.path());
        cache.store(&school(), ROSTER).await.unwrap();

        assert_eq!(
            cache.lookup(&school(), true).await,
            CacheLookup::Miss(MissReason::Bypassed)
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = RosterCache::new(dir.path());
        cache.store(&school(), "<ArrayOfStudent><Student>").await.unwrap();

        assert!(matches!(
            cache.lookup(&school(), false).await,
            CacheLookup::Miss(MissReason::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = RosterCache::new(dir.path());
        // A directory where the file should be cannot be read as text.
        std::fs::create_dir_all(cache.cache_path(&school())).unwrap();

        assert!(matches!(
            cache.lookup(&school(), false).await,
            CacheLookup::Miss(MissReason::Unreadable(_))
        ));
    }

    #[tokio::test]
    async fn test_invalidate() {
        let dir = TempDir::new().unwrap();
        let cache = RosterCache::new(dir.path());
        assert!(!cache.invalidate(&school()).await.unwrap());

        cache.store(&school(), ROSTER).await.unwrap();
        assert!(cache.invalidate(&school()).await.unwrap());
        assert_eq!(
            cache.lookup(&school(), false).await,
            CacheLookup::Miss(MissReason::Absent)
        );
    }

    #[test]
    fn test_parse_roster() {
        let accounts = parse_roster(ROSTER).unwrap();
        assert_eq!(accounts[1].username, "cd5678");
        assert!(parse_roster("<Students/>").is_err());
    }
}
