//! Nearest-location resolution over a gazetteer.

use std::sync::Arc;

use super::gazetteer::{Gazetteer, NamedLocation};
use super::geo::{Coordinate, haversine_km};

/// Failure modes of [`NearestLocationResolver::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The gazetteer has no entries, so no location can be chosen.
    #[error("no locations are available")]
    EmptyGazetteer,
}

/// A resolved location paired with its distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    pub location: &'a NamedLocation,
    pub distance_km: f64,
}

/// Maps arbitrary coordinates to the closest gazetteer entry.
///
/// Ties are broken in favour of the entry that appears first in the
/// gazetteer's insertion order. There is no distance cutoff.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use geopost::domain::{Coordinate, Gazetteer, NearestLocationResolver, campus_seed};
///
/// let gazetteer = Arc::new(Gazetteer::from_seeds(&campus_seed()).expect("valid seed"));
/// let resolver = NearestLocationResolver::new(gazetteer);
/// let nearest = resolver
///     .find_nearest(&Coordinate::new(42.12346, -76.54322))
///     .expect("gazetteer is not empty");
/// assert_eq!(nearest.name().as_ref(), "Olin Library");
/// ```
#[derive(Debug, Clone)]
pub struct NearestLocationResolver {
    gazetteer: Arc<Gazetteer>,
}

impl NearestLocationResolver {
    pub fn new(gazetteer: Arc<Gazetteer>) -> Self {
        Self { gazetteer }
    }

    /// The gazetteer this resolver scans.
    pub fn gazetteer(&self) -> &Arc<Gazetteer> {
        &self.gazetteer
    }

    /// Return the entry closest to `point`.
    pub fn find_nearest(&self, point: &Coordinate) -> Result<&NamedLocation, ResolveError> {
        self.resolve(point).map(|resolution| resolution.location)
    }

    /// Like [`find_nearest`](Self::find_nearest) but also reports the
    /// winning distance.
    pub fn resolve(&self, point: &Coordinate) -> Result<Resolution<'_>, ResolveError> {
        let mut entries = self.gazetteer.list_all().iter();
        let first = entries.next().ok_or(ResolveError::EmptyGazetteer)?;
        let mut best = Resolution {
            location: first,
            distance_km: haversine_km(point, &first.coordinate()),
        };
        for entry in entries {
            let distance_km = haversine_km(point, &entry.coordinate());
            // Strict comparison keeps the earliest entry on ties.
            if distance_km < best.distance_km {
                best = Resolution {
                    location: entry,
                    distance_km,
                };
            }
        }
        Ok(best)
    }
}
