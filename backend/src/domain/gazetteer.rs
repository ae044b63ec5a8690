//! Gazetteer: the ordered set of named locations posts can be tagged with.
//!
//! A [`Gazetteer`] is built once from a seed list and never mutated. It is
//! shared behind an `Arc` and handed to the
//! [`NearestLocationResolver`](crate::domain::NearestLocationResolver)
//! explicitly, so tests can supply fixture gazetteers without touching any
//! process-wide state.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::geo::{Coordinate, CoordinateValidationError};

/// Maximum length of a location name, in characters.
pub const LOCATION_NAME_MAX: usize = 100;

/// Validation errors for individual gazetteer entries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationValidationError {
    #[error("location name must not be empty")]
    EmptyName,
    #[error("location name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateValidationError),
}

/// Errors raised while building a gazetteer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GazetteerError {
    /// Two seed entries share a name.
    #[error("duplicate location name: {name}")]
    DuplicateName { name: String },
    /// A seed entry failed validation.
    #[error("invalid location at index {index}: {source}")]
    InvalidEntry {
        index: usize,
        source: LocationValidationError,
    },
    /// A seed document could not be decoded.
    #[error("malformed location seed document: {message}")]
    MalformedSeed { message: String },
    /// A seed file could not be read.
    #[error("failed to read location seed file {path}: {message}")]
    UnreadableSeed { path: String, message: String },
}

/// Unique, human-readable location name. Posts reference locations by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationName(String);

impl LocationName {
    /// Validate and construct a location name.
    pub fn new(name: impl Into<String>) -> Result<Self, LocationValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LocationValidationError::EmptyName);
        }
        if name.chars().count() > LOCATION_NAME_MAX {
            return Err(LocationValidationError::NameTooLong {
                max: LOCATION_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for LocationName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LocationName> for String {
    fn from(value: LocationName) -> Self {
        value.0
    }
}

impl TryFrom<String> for LocationName {
    type Error = LocationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A gazetteer entry: a unique name pinned to a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLocation {
    name: LocationName,
    coordinate: Coordinate,
}

impl NamedLocation {
    /// Build an entry from validated parts.
    pub fn new(name: LocationName, coordinate: Coordinate) -> Self {
        Self { name, coordinate }
    }

    /// Build an entry from raw parts, validating name and coordinate range.
    pub fn try_from_parts(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, LocationValidationError> {
        let name = LocationName::new(name)?;
        let coordinate = Coordinate::try_new(latitude, longitude)?;
        Ok(Self::new(name, coordinate))
    }

    /// Location name.
    pub fn name(&self) -> &LocationName {
        &self.name
    }

    /// Location coordinate.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// Raw seed triple as found in configuration or seed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSeed {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationSeed {
    pub fn new(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_owned(),
            latitude,
            longitude,
        }
    }
}

impl From<&NamedLocation> for LocationSeed {
    fn from(value: &NamedLocation) -> Self {
        Self {
            name: value.name.to_string(),
            latitude: value.coordinate.latitude(),
            longitude: value.coordinate.longitude(),
        }
    }
}

/// Immutable, insertion-ordered set of named locations.
///
/// ## Invariants
/// - Names are unique.
/// - Iteration order is the order entries were supplied in.
///
/// # Examples
/// ```
/// use geopost::domain::{Gazetteer, campus_seed};
///
/// let gazetteer = Gazetteer::from_seeds(&campus_seed()).expect("built-in seed is valid");
/// assert_eq!(gazetteer.list_all()[0].name().as_ref(), "Cocktail Lounge");
/// assert!(gazetteer.get("Slope").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gazetteer {
    entries: Vec<NamedLocation>,
}

impl Gazetteer {
    /// A gazetteer with no entries. Every lookup against it resolves to
    /// nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a gazetteer from validated entries, rejecting duplicate names.
    pub fn new(entries: Vec<NamedLocation>) -> Result<Self, GazetteerError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_ref()) {
                return Err(GazetteerError::DuplicateName {
                    name: entry.name.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Validate raw seed triples and build a gazetteer in seed order.
    pub fn from_seeds(seeds: &[LocationSeed]) -> Result<Self, GazetteerError> {
        let entries = seeds
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                NamedLocation::try_from_parts(seed.name.clone(), seed.latitude, seed.longitude)
                    .map_err(|source| GazetteerError::InvalidEntry { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// All entries in insertion order.
    pub fn list_all(&self) -> &[NamedLocation] {
        &self.entries
    }

    /// Look an entry up by its exact name.
    pub fn get(&self, name: &str) -> Option<&NamedLocation> {
        self.entries.iter().find(|entry| entry.name.as_ref() == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gazetteer has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a JSON array of `{name, latitude, longitude}` objects.
pub fn parse_seed_json(document: &str) -> Result<Vec<LocationSeed>, GazetteerError> {
    serde_json::from_str(document).map_err(|err| GazetteerError::MalformedSeed {
        message: err.to_string(),
    })
}

/// Build the gazetteer from a JSON seed file, or from [`campus_seed`] when
/// no file is given.
pub fn load_gazetteer(file: Option<&Path>) -> Result<Gazetteer, GazetteerError> {
    let seeds = match file {
        Some(path) => {
            let document =
                std::fs::read_to_string(path).map_err(|err| GazetteerError::UnreadableSeed {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
            parse_seed_json(&document)?
        }
        None => campus_seed(),
    };
    Gazetteer::from_seeds(&seeds)
}

/// The built-in campus seed list.
pub fn campus_seed() -> Vec<LocationSeed> {
    vec![
        LocationSeed::new("Cocktail Lounge", 42.12345, -76.54321),
        LocationSeed::new("Olin Library", 42.12346, -76.54322),
        LocationSeed::new("Slope", 42.12350, -76.54330),
        LocationSeed::new("Duffield Hall", 42.44301, -76.48410),
        LocationSeed::new("Tang Hall", 42.44857, -76.48399),
        LocationSeed::new("Statler Hall", 42.44410, -76.48240),
        LocationSeed::new("Kennedy Hall", 42.44750, -76.48480),
    ]
}
