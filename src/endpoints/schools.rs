//! Schools visible to the session.

use super::paths;
use crate::client::ConsoleClient;
use crate::error::ConsoleResult;
use crate::model::{School, SchoolId};
use crate::transport::{HttpRequest, Transport};
use crate::wire::normalize_array;
use log::{debug, warn};

impl<T: Transport> ConsoleClient<T> {
    /// Schools the signed-in user may administer.
    ///
    /// Fetched once per session and served from memory afterwards.
    pub async fn list_schools(&self) -> ConsoleResult<Vec<School>> {
        let session = self.session()?;
        let schools = session
            .schools()
            .get_or_try_init(|| async {
                let value = self.fetch_json(HttpRequest::get(paths::SCHOOLS)).await?;
                let records = normalize_array(&value)?;
                let schools: Vec<School> = records
                    .iter()
                    .filter_map(|record| {
                        let school = School::from_record(record);
                        if school.is_none() {
                            warn!("Skipping school record without a valid id: {:?}", record);
                        }
                        school
                    })
                    .collect();
                debug!("Loaded {} school(s)", schools.len());
                Ok::<_, crate::error::ConsoleError>(schools)
            })
            .await?;
        Ok(schools.clone())
    }

    /// Look up one school by id in the session's school list.
    pub async fn get_school(&self, school: impl AsRef<str>) -> ConsoleResult<Option<School>> {
        let (school, _) = self.school_scope(school.as_ref())?;
        Ok(self
            .list_schools()
            .await?
            .into_iter()
            .find(|s| s.id == school))
    }

    /// Whether the session may administer the given school.
    pub async fn has_school(&self, school: &SchoolId) -> ConsoleResult<bool> {
        Ok(self.get_school(school).await?.is_some())
    }
}
