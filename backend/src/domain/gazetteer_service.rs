//! Gazetteer seeding and loading against a [`LocationRepository`].

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{LocationRepository, LocationRepositoryError};
use crate::domain::{Error, Gazetteer};

fn map_repository_error(error: LocationRepositoryError) -> Error {
    match error {
        LocationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("location repository unavailable: {message}"))
        }
        LocationRepositoryError::Query { message } => {
            Error::internal(format!("location repository error: {message}"))
        }
        LocationRepositoryError::InvalidRow { message } => {
            Error::internal(format!("stored location is invalid: {message}"))
        }
    }
}

/// Writes and reads the stored gazetteer.
#[derive(Clone)]
pub struct GazetteerService<L> {
    locations: Arc<L>,
}

impl<L> GazetteerService<L> {
    pub fn new(locations: Arc<L>) -> Self {
        Self { locations }
    }
}

impl<L> GazetteerService<L>
where
    L: LocationRepository,
{
    /// Destructively replace the stored gazetteer with `gazetteer`.
    ///
    /// Posts keep their `location_name` even when the name disappears.
    pub async fn reseed(&self, gazetteer: &Gazetteer) -> Result<(), Error> {
        self.locations
            .replace_all(gazetteer.list_all())
            .await
            .map_err(map_repository_error)?;
        info!(count = gazetteer.len(), "gazetteer reseeded");
        Ok(())
    }

    /// Load the stored gazetteer in insertion order.
    pub async fn load(&self) -> Result<Gazetteer, Error> {
        let entries = self
            .locations
            .list_all()
            .await
            .map_err(map_repository_error)?;
        let gazetteer = Gazetteer::new(entries)
            .map_err(|err| Error::internal(format!("stored gazetteer is invalid: {err}")))?;
        info!(count = gazetteer.len(), "gazetteer loaded");
        Ok(gazetteer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLocationRepository;
    use crate::domain::{ErrorCode, NamedLocation, campus_seed};
    use rstest::rstest;

    fn campus() -> Gazetteer {
        Gazetteer::from_seeds(&campus_seed()).expect("valid seed")
    }

    #[tokio::test]
    async fn reseed_passes_entries_in_order() {
        let mut repo = MockLocationRepository::new();
        repo.expect_replace_all()
            .withf(|entries: &[NamedLocation]| {
                entries.len() == 7 && entries[0].name().as_ref() == "Cocktail Lounge"
            })
            .times(1)
            .return_once(|_| Ok(()));

        GazetteerService::new(Arc::new(repo))
            .reseed(&campus())
            .await
            .expect("reseed succeeds");
    }

    #[tokio::test]
    async fn load_builds_gazetteer_from_rows() {
        let rows = campus().list_all().to_vec();
        let mut repo = MockLocationRepository::new();
        repo.expect_list_all()
            .times(1)
            .return_once(move || Ok(rows));

        let gazetteer = GazetteerService::new(Arc::new(repo))
            .load()
            .await
            .expect("load succeeds");
        assert_eq!(gazetteer, campus());
    }

    #[tokio::test]
    async fn load_rejects_duplicate_rows() {
        let entry = NamedLocation::try_from_parts("Slope", 42.1235, -76.5433).expect("valid");
        let mut repo = MockLocationRepository::new();
        repo.expect_list_all()
            .times(1)
            .return_once(move || Ok(vec![entry.clone(), entry]));

        let error = GazetteerService::new(Arc::new(repo))
            .load()
            .await
            .expect_err("duplicates");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(LocationRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(LocationRepositoryError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn reseed_maps_repository_errors(
        #[case] failure: LocationRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockLocationRepository::new();
        repo.expect_replace_all()
            .times(1)
            .return_once(move |_| Err(failure));

        let error = GazetteerService::new(Arc::new(repo))
            .reseed(&campus())
            .await
            .expect_err("failure");
        assert_eq!(error.code(), expected);
    }
}
